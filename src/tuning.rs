//! Data-driven track balance
//!
//! Everything the world runtime needs to know about lane layout, pool sizes,
//! and spawn odds lives in a `TrackConfig`. Two presets cover the shipped
//! tracks: `classic()` (obstacles and coins) and `highway()` (adds traffic).

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading a track config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse track config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid track config: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Weighted outcome table for one stride slot
///
/// A single uniform roll `r` in [0, 1) picks the first band it falls below:
/// obstacle, traffic (traffic-enabled tracks only), coin cluster, nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTable {
    /// Longitudinal distance between slots
    pub stride: f32,
    pub obstacle_below: f32,
    pub traffic_below: f32,
    pub coins_below: f32,
    /// Coins per cluster
    pub cluster_size: usize,
    /// Distance between consecutive coins in a cluster
    pub coin_spacing: f32,
    /// Magnitude of traffic speed (sign is rolled per car)
    pub traffic_speed: f32,
    pub obstacle_height: f32,
    pub coin_height: f32,
    pub traffic_height: f32,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            stride: 10.0,
            // Two chained rolls (0.3, then 0.7 of the rest) flattened into one
            obstacle_below: 0.3,
            traffic_below: 0.3,
            coins_below: 0.79,
            cluster_size: 3,
            coin_spacing: 1.5,
            traffic_speed: 8.0,
            obstacle_height: 1.0,
            coin_height: 1.5,
            traffic_height: 0.75,
        }
    }
}

/// Half extents of every collidable volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extents {
    /// Capsule radius 0.5, total height 2
    pub player: Vec3,
    /// 2x2x2 crate
    pub obstacle: Vec3,
    /// Torus (radius 0.5, tube 0.2) standing edge-on to the lane
    pub coin: Vec3,
    pub traffic: Vec3,
}

impl Default for Extents {
    fn default() -> Self {
        Self {
            player: Vec3::new(0.5, 1.0, 0.5),
            obstacle: Vec3::new(1.0, 1.0, 1.0),
            coin: Vec3::new(0.2, 0.7, 0.7),
            traffic: Vec3::new(1.0, 0.75, 2.0),
        }
    }
}

/// Complete track description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Lateral lane offsets, left to right
    pub lanes: Vec<f32>,
    pub start_lane: usize,
    pub lane_smoothing: f32,
    pub player_speed: f32,
    pub player_height: f32,

    pub segment_length: f32,
    pub segment_count: usize,
    /// Lateral offsets of neon edge strips (one strip per offset per slice)
    pub decoration_offsets: Vec<f32>,

    pub obstacle_capacity: usize,
    pub coin_capacity: usize,
    pub traffic_capacity: usize,
    /// Traffic capability flag; the traffic band is skipped when false
    pub traffic_enabled: bool,

    pub spawn: SpawnTable,
    /// Active entities this far behind the player are released
    pub cull_distance: f32,
    pub extents: Extents,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl TrackConfig {
    /// Obstacles and coins only
    pub fn classic() -> Self {
        Self {
            lanes: LANES.to_vec(),
            start_lane: START_LANE,
            lane_smoothing: LANE_SMOOTHING,
            player_speed: PLAYER_SPEED,
            player_height: PLAYER_HEIGHT,
            segment_length: SEGMENT_LENGTH,
            segment_count: SEGMENT_COUNT,
            decoration_offsets: vec![-5.5, 5.5],
            obstacle_capacity: OBSTACLE_COUNT,
            coin_capacity: COIN_COUNT,
            traffic_capacity: 0,
            traffic_enabled: false,
            spawn: SpawnTable::default(),
            cull_distance: 20.0,
            extents: Extents::default(),
        }
    }

    /// Wider stride, longer coin runs, oncoming and outgoing traffic
    pub fn highway() -> Self {
        Self {
            traffic_capacity: TRAFFIC_COUNT,
            traffic_enabled: true,
            spawn: SpawnTable {
                stride: 15.0,
                obstacle_below: 0.2,
                traffic_below: 0.4,
                coins_below: 0.8,
                cluster_size: 5,
                ..SpawnTable::default()
            },
            ..Self::classic()
        }
    }

    /// Parse and validate a JSON track description
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if self.lanes.is_empty() {
            return invalid("lanes", "must contain at least one lane");
        }
        if self.start_lane >= self.lanes.len() {
            return invalid("start_lane", "must index into lanes");
        }
        if !(self.lane_smoothing > 0.0 && self.lane_smoothing <= 1.0) {
            return invalid("lane_smoothing", "must be in (0, 1]");
        }
        if self.segment_length <= 0.0 {
            return invalid("segment_length", "must be positive");
        }
        if self.segment_count == 0 {
            return invalid("segment_count", "must be non-zero");
        }
        if self.spawn.stride <= 0.0 {
            return invalid("spawn.stride", "must be positive");
        }
        let s = &self.spawn;
        let bands = [s.obstacle_below, s.traffic_below, s.coins_below];
        if bands.iter().any(|b| !(0.0..=1.0).contains(b)) {
            return invalid("spawn", "thresholds must lie in [0, 1]");
        }
        if !(s.obstacle_below <= s.traffic_below && s.traffic_below <= s.coins_below) {
            return invalid("spawn", "thresholds must be non-decreasing");
        }
        if self.cull_distance < 0.0 {
            return invalid("cull_distance", "must not be negative");
        }
        Ok(())
    }
}
