//! Best-score persistence.
//!
//! A single LocalStorage key holding the best score as a plain integer,
//! read once at startup and written whenever the in-memory best improves.

/// LocalStorage key (used only in wasm32)
#[allow(dead_code)]
const STORAGE_KEY: &str = "neon_snake_best";

/// Load the persisted best score, 0 if absent or unreadable (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load() -> u32 {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(Some(raw)) = storage.get_item(STORAGE_KEY) {
            if let Ok(best) = serde_json::from_str::<u32>(&raw) {
                log::info!("Loaded best score {}", best);
                return best;
            }
        }
    }

    log::info!("No best score found, starting at 0");
    0
}

/// Persist the best score (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save(best: u32) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    if let Some(storage) = storage {
        if let Ok(raw) = serde_json::to_string(&best) {
            let _ = storage.set_item(STORAGE_KEY, &raw);
            log::info!("Best score saved ({})", best);
        }
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> u32 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(_best: u32) {
    // No-op for native
}
