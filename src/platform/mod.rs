//! Platform glue
//!
//! Key mapping, clock and the one-shot host readiness signal. Everything here
//! is thin I/O; the key tables are pure so they can be tested natively.

use crate::input::{Action, Upgrade};
use crate::sim::Direction;

/// Arrow keys and WASD (either case)
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Keyboard shortcuts for the menu and upgrade screens
pub fn key_action(key: &str) -> Option<Action> {
    match key {
        " " | "Enter" => Some(Action::Start),
        "r" | "R" => Some(Action::Restart),
        "1" => Some(Action::ChooseUpgrade(Upgrade::BulletSpeed)),
        "2" => Some(Action::ChooseUpgrade(Upgrade::Armor)),
        "3" => Some(Action::ChooseUpgrade(Upgrade::Ricochet)),
        _ => None,
    }
}

/// Wall-clock milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Seed for a fresh game context
pub fn clock_seed() -> u64 {
    now_ms() as u64
}

#[cfg(target_arch = "wasm32")]
mod host {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(inline_js = "
        export function notify_host_ready() {
            try {
                const sdk = globalThis.hostSdk;
                if (sdk && sdk.actions && typeof sdk.actions.ready === 'function') {
                    sdk.actions.ready();
                }
            } catch (e) {
                console.warn('host sdk ready() failed', e);
            }
            if (window.parent && window.parent !== window) {
                window.parent.postMessage({ type: 'ready' }, '*');
            }
        }
    ")]
    extern "C" {
        pub fn notify_host_ready();
    }
}

/// Tell an embedding host the game can be shown. Fire-and-forget.
pub fn signal_host_ready() {
    #[cfg(target_arch = "wasm32")]
    host::notify_host_ready();
    log::info!("Host readiness signalled");
}
