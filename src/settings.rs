//! Player preferences
//!
//! Persisted in LocalStorage. Holds only presentation and control
//! preferences; run results are never stored here.

use serde::{Deserialize, Serialize};

use crate::platform::SWIPE_THRESHOLD_PX;
use crate::tuning::TrackConfig;

/// Which track layout to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackPreset {
    /// Obstacles and coins
    #[default]
    Classic,
    /// Adds moving traffic
    Highway,
}

impl TrackPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackPreset::Classic => "Classic",
            TrackPreset::Highway => "Highway",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(TrackPreset::Classic),
            "highway" | "traffic" => Some(TrackPreset::Highway),
            _ => None,
        }
    }

    pub fn config(&self) -> TrackConfig {
        match self {
            TrackPreset::Classic => TrackConfig::classic(),
            TrackPreset::Highway => TrackConfig::highway(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub track: TrackPreset,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Pause when the tab is hidden or loses focus
    pub pause_on_blur: bool,
    pub muted: bool,

    // === Controls ===
    /// Horizontal travel needed for a swipe (CSS px)
    pub swipe_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            track: TrackPreset::Classic,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            pause_on_blur: true,
            muted: false,
            swipe_threshold: SWIPE_THRESHOLD_PX,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_runner_settings";

    /// Parse stored JSON, falling back to defaults on anything unreadable
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Flip mute and persist; returns the new value
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.save();
        self.muted
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
