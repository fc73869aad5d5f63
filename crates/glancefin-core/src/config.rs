//! Overlay configuration.

use serde::Deserialize;

/// Recognized options for the now-playing overlay.
///
/// Deserialized from an optional options object handed to the wasm entry
/// point; absent fields take the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Show a "Playing for: {user}" line on each card.
    pub show_user_names: bool,
    /// Path to the sessions JSON resource.
    pub now_playing_url: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_user_names: false,
            now_playing_url: "/web/custom-now-playing-secure.json".to_string(),
        }
    }
}
