//! Browser module for the glancefin now-playing overlay.
//!
//! Injects a "Now Playing" button next to the web client's cast button and
//! shows an overlay of active playback sessions on click. Loaded by a small
//! bootstrap script in the web client:
//!
//! ```js
//! import init, { init as glancefin } from "./glancefin_web.js";
//! await init();
//! glancefin({ show_user_names: true });
//! ```
//!
//! The options object is optional; recognized keys are `show_user_names` and
//! `now_playing_url`.

mod app;
mod fetch;
mod overlay;
mod watcher;

use wasm_bindgen::prelude::*;

/// Wire the overlay into the current page.
///
/// Pass `undefined` (or nothing) for default configuration. Scanning for the
/// header anchor starts immediately and re-arms on home-button navigation.
#[wasm_bindgen]
pub fn init(options: JsValue) -> Result<(), JsValue> {
    app::boot(options)
}
