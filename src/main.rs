//! Neon Snake entry point
//!
//! Handles platform-specific initialization and runs the dual game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_snake::best_score;
    use neon_snake::hud::{HudStrings, format_padded};
    use neon_snake::input::{self, Intent, SwipeGesture};
    use neon_snake::scheduler::{LogicTimer, Redraw, animation_frame};
    use neon_snake::sim::{GamePhase, SimState, TickEvent, tick};

    // JS binding to the page-provided canvas renderer
    #[wasm_bindgen(inline_js = "
        export function render_frame(snapshot, full) {
            if (window.renderFrame) window.renderFrame(JSON.parse(snapshot), full);
        }
    ")]
    extern "C" {
        fn render_frame(snapshot: &str, full: bool);
    }

    /// Game instance holding all state
    struct Game {
        state: SimState,
        timer: LogicTimer,
        touch_start: Option<(f32, f32)>,
        last_hud: Option<HudStrings>,
    }

    impl Game {
        fn new() -> Self {
            let seed = js_sys::Date::now() as u64;
            let best = best_score::load();
            // Grid-full at construction means a misconfigured board
            let state = SimState::new(seed, best).expect("initial food placement failed");
            Self {
                state,
                timer: LogicTimer::new(),
                touch_start: None,
                last_hud: None,
            }
        }

        /// Start a game, or restart after death
        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            if let Err(e) = self.state.start(seed) {
                log::error!("Cannot start game: {}", e);
                return;
            }
            self.timer.start(now_ms(), self.state.speed_ms);
            hide_overlay();
            self.push_redraw(Redraw::Full);
            self.update_hud();
            log::info!("Game started with seed {}", seed);
        }

        /// One frame callback: poll the logic timer, then run the
        /// animation loop
        fn on_frame(&mut self, now: f64) {
            if let Some(fire) = self.timer.poll(now) {
                if self.timer.accepts(fire) && self.state.phase == GamePhase::Playing {
                    match tick(&mut self.state) {
                        Ok(events) => {
                            self.handle_events(&events, now);
                            self.push_redraw(Redraw::Full);
                        }
                        Err(e) => {
                            log::error!("Tick failed: {}", e);
                            self.timer.stop();
                        }
                    }
                }
            }

            let redraw = animation_frame(&mut self.state);
            self.push_redraw(redraw);
        }

        fn handle_events(&mut self, events: &[TickEvent], now: f64) {
            for event in events {
                match *event {
                    TickEvent::Ate(_) => self.update_hud(),
                    TickEvent::SpeedChanged { speed_ms } => {
                        self.timer.restart(now, speed_ms);
                        log::debug!("Logic interval now {}ms", speed_ms);
                    }
                    TickEvent::NewBest(best) => {
                        best_score::save(best);
                        self.update_hud();
                    }
                    TickEvent::Died { score, best } => {
                        self.timer.stop();
                        show_game_over(score, best);
                        log::info!("Game over: score {}, best {}", score, best);
                    }
                }
            }
        }

        /// Hand the current snapshot to the external renderer
        fn push_redraw(&self, redraw: Redraw) {
            if redraw == Redraw::Skip {
                return;
            }
            if let Ok(json) = serde_json::to_string(&self.state.snapshot()) {
                render_frame(&json, redraw == Redraw::Full);
            }
        }

        fn update_hud(&mut self) {
            let hud = HudStrings::from_state(&self.state);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            set_text("score", &hud.score);
            set_text("best", &hud.best);
            set_text("level", &hud.level);
            self.last_hud = Some(hud);
        }

        fn apply_intent(&mut self, intent: Intent) {
            match intent {
                Intent::Turn(dir) => {
                    self.state.request_direction(dir);
                }
                Intent::Start => {
                    if self.state.phase != GamePhase::Playing {
                        self.start();
                    }
                }
            }
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn set_text(id: &str, text: &str) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn hide_overlay() {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id("overlay") {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn show_game_over(score: u32, best: u32) {
        set_text("overlay-title", "GAME OVER");
        set_text(
            "overlay-sub",
            &format!(
                "Score: {}  |  Best: {}",
                format_padded(score, 3),
                format_padded(best, 3)
            ),
        );
        set_text("startBtn", "RETRY");
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id("overlay") {
            let _ = el.set_attribute("class", "");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logging");

        let game = Rc::new(RefCell::new(Game::new()));

        setup_input_handlers(game.clone());
        setup_start_button(game.clone());
        setup_dpad(game.clone());

        // Attract-screen draw before the first start
        game.borrow().push_redraw(Redraw::Full);
        game.borrow_mut().update_hud();

        request_animation_frame(game);
        log::info!("Neon Snake running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        // Keyboard: arrows + WASD turn, Space/Enter starts
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(intent) = input::map_key(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().apply_intent(intent);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let canvas: Option<HtmlCanvasElement> = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("canvas"))
            .and_then(|el| el.dyn_into().ok());
        let Some(canvas) = canvas else {
            log::warn!("No #canvas element; touch input disabled");
            return;
        };

        // Touch start: remember where the finger went down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().touch_start =
                        Some((touch.client_x() as f32, touch.client_y() as f32));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: dominant-axis swipe, or tap to start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some((sx, sy)) = g.touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let dx = touch.client_x() as f32 - sx;
                let dy = touch.client_y() as f32 - sy;

                match input::swipe_intent(dx, dy) {
                    SwipeGesture::Tap => g.apply_intent(Intent::Start),
                    SwipeGesture::Swipe(dir) => g.apply_intent(Intent::Turn(dir)),
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(btn) = document.get_element_by_id("startBtn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().apply_intent(Intent::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_dpad(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Ok(buttons) = document.query_selector_all(".dpad-btn[data-dir]") else {
            return;
        };

        for i in 0..buttons.length() {
            let Some(el) = buttons
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(dir) = el.get_attribute("data-dir").and_then(|d| input::map_dpad(&d))
            else {
                continue;
            };

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().apply_intent(Intent::Turn(dir));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().on_frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Neon Snake (native) starting...");
    log::info!("The canvas front end is web-only - run with `trunk serve` for the playable version");

    println!("\nRunning headless demo game...");
    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive both loops over synthetic 60 fps frames with a greedy
/// food-chasing policy, then print the final scoreboard.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use neon_snake::hud::HudStrings;
    use neon_snake::scheduler::{LogicTimer, animation_frame};
    use neon_snake::sim::{Direction, GamePhase, SimState, TickEvent, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);

    let mut state = SimState::new(seed, 0).expect("initial food placement failed");
    state.start(seed).expect("food placement failed");

    let mut timer = LogicTimer::new();
    timer.start(0.0, state.speed_ms);

    let mut now = 0.0;
    for _ in 0..100_000 {
        now += 1000.0 / 60.0;

        // Greedy steering: close the x gap, then the y gap
        let head = state.snake.head();
        let food = state.food;
        let dir = if food.x != head.x {
            if food.x > head.x {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if food.y > head.y {
            Direction::Down
        } else {
            Direction::Up
        };
        state.request_direction(dir);

        if let Some(fire) = timer.poll(now) {
            if timer.accepts(fire) {
                let events = tick(&mut state).expect("tick failed");
                for event in events {
                    match event {
                        TickEvent::SpeedChanged { speed_ms } => timer.restart(now, speed_ms),
                        TickEvent::Died { .. } => timer.stop(),
                        _ => {}
                    }
                }
            }
        }
        animation_frame(&mut state);

        if state.phase == GamePhase::Dead {
            break;
        }
    }

    let hud = HudStrings::from_state(&state);
    println!(
        "Score {}  |  Best {}  |  Level {}",
        hud.score, hud.best, hud.level
    );
}
