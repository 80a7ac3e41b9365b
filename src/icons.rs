//! Process-wide icon registry.
//!
//! Icons are registered once at application startup and looked up by name
//! while rendering. Registration never overwrites an existing entry and there
//! is no teardown.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Glyph used for the menu trigger.
pub const MENU: &str = "menu";

static REGISTRY: OnceLock<Mutex<HashMap<&'static str, &'static str>>> = OnceLock::new();

fn registry() -> &'static Mutex<HashMap<&'static str, &'static str>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Registers `glyph` under `name` unless the name is already taken.
/// Returns `true` if this call inserted it.
pub fn register_if_absent(name: &'static str, glyph: &'static str) -> bool {
    let Ok(mut icons) = registry().lock() else {
        log::error!("Icon registry lock poisoned; skipping {}", name);
        return false;
    };

    if icons.contains_key(name) {
        return false;
    }
    icons.insert(name, glyph);
    log::debug!("Registered icon '{}'", name);
    true
}

/// Registers every icon the toolbar renders.
pub fn register_defaults() {
    register_if_absent(MENU, "☰");
}

pub fn lookup(name: &str) -> Option<&'static str> {
    registry().lock().ok()?.get(name).copied()
}
