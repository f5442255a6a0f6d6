//! Pinelight - particle Christmas tree with snow, confetti and a countdown, in WASM

use wasm_bindgen::prelude::*;
use web_sys::console;

// Console logging is only wired up in the browser; native builds (unit tests)
// still type-check the format arguments.
macro_rules! console_log {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!($($t)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        if false {
            let _ = format!($($t)*);
        }
    }};
}

macro_rules! console_warn {
    ($($t:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!($($t)*).into());
        #[cfg(not(target_arch = "wasm32"))]
        if false {
            let _ = format!($($t)*);
        }
    }};
}

pub mod camera;
pub mod celebration;
pub mod confetti;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod draw;
pub mod pipeline;
pub mod projection;
pub mod random;
pub mod renderer;
pub mod schedule;
pub mod scene;
pub mod snow;

pub use config::TreeConfig;
pub use constants::*;
pub use pipeline::{Frame, Scene, Surfaces};
pub use renderer::{CelebrationInfo, ChristmasTree, CountdownDisplay, RenderResult};

#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let mode = if RUNTIME_CONFIGURABLE {
        "configurable"
    } else {
        "release"
    };
    console::log_1(&format!("[Pinelight] WASM loaded ({mode})").into());
}

#[wasm_bindgen]
pub fn is_runtime_configurable() -> bool {
    RUNTIME_CONFIGURABLE
}

/// How often the page should call `tick_countdown`.
#[wasm_bindgen]
pub fn countdown_interval_ms() -> u32 {
    COUNTDOWN_INTERVAL_MS
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
