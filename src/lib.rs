//! Lane Runner - An endless three-lane arcade runner
//!
//! Core modules:
//! - `sim`: Endless-world runtime (pools, lanes, spawning, scrolling, collisions)
//! - `tuning`: Data-driven track layout and spawn balance
//! - `snapshot`: Per-frame transforms handed to the presentation layer
//! - `audio`: Maps simulation events to sound cues
//! - `platform`: Browser input translation and the demo autopilot
//! - `settings`: Player preferences

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use settings::{Settings, TrackPreset};
pub use tuning::{ConfigError, TrackConfig};

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep used by the native demo and tests
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Clamp for host frame deltas (tab switches produce huge gaps)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Lateral offsets of the three lanes, left to right
    pub const LANES: [f32; 3] = [-3.0, 0.0, 3.0];
    /// Lane the player starts every run in
    pub const START_LANE: usize = 1;
    /// Lateral smoothing applied once per tick (not time-scaled)
    pub const LANE_SMOOTHING: f32 = 0.2;

    /// Forward speed in units per second
    pub const PLAYER_SPEED: f32 = 15.0;
    /// Player capsule center height
    pub const PLAYER_HEIGHT: f32 = 1.5;

    /// Ground slice length and how many slices are live at once
    pub const SEGMENT_LENGTH: f32 = 50.0;
    pub const SEGMENT_COUNT: usize = 3;

    pub const OBSTACLE_COUNT: usize = 10;
    pub const COIN_COUNT: usize = 30;
    pub const TRAFFIC_COUNT: usize = 8;

    /// Coin spin rate (radians/sec)
    pub const COIN_SPIN_RATE: f32 = 2.0;

    /// Camera trails the player by this much (z) at this height
    pub const CAMERA_TRAIL: f32 = 10.0;
    pub const CAMERA_HEIGHT: f32 = 5.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
