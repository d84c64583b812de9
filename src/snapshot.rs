//! Render snapshot handed to the presentation layer each frame
//!
//! The host copies `instances` straight into a GPU instance buffer, so every
//! record is `#[repr(C)]` and `Pod`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::consts::{CAMERA_HEIGHT, CAMERA_TRAIL};
use crate::sim::{EntityKind, Facing, GameState, PooledEntity, RandomSource, SegmentKind};

/// Instance tags understood by the renderer
pub mod tags {
    pub const PLAYER: u32 = 0;
    pub const OBSTACLE: u32 = 1;
    pub const TRAFFIC: u32 = 2;
    pub const COIN: u32 = 3;
    pub const GROUND: u32 = 4;
    pub const NEON_STRIP: u32 = 5;
}

/// One drawable transform
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub position: [f32; 3],
    /// Rotation about the vertical axis (radians)
    pub yaw: f32,
    /// Rotation about the facing axis (coin spin)
    pub roll: f32,
    pub tag: u32,
    pub _pad: [u32; 2],
}

impl Instance {
    pub fn new(position: Vec3, yaw: f32, roll: f32, tag: u32) -> Self {
        Self {
            position: position.to_array(),
            yaw,
            roll,
            tag,
            _pad: [0; 2],
        }
    }

    fn from_entity(entity: &PooledEntity) -> Self {
        let (tag, yaw) = match entity.kind {
            EntityKind::Obstacle => (tags::OBSTACLE, 0.0),
            EntityKind::Traffic => {
                let yaw = match entity.facing {
                    Facing::Toward => std::f32::consts::PI,
                    Facing::Away => 0.0,
                };
                (tags::TRAFFIC, yaw)
            }
            // Coins stand edge-on to the lane
            EntityKind::Coin => (tags::COIN, std::f32::consts::FRAC_PI_2),
        };
        Self::new(entity.pos, yaw, entity.spin, tag)
    }
}

/// Everything the presentation layer reads for one frame
#[derive(Debug, Clone, Default)]
pub struct RenderSnapshot {
    /// Player (if attached), segments, then active entities
    pub instances: Vec<Instance>,
    /// Camera trails the runner; the host decides how to use it
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
    pub score: u64,
}

impl RenderSnapshot {
    pub fn capture<R: RandomSource>(state: &GameState<R>) -> Self {
        let mut snapshot = Self::default();
        snapshot.fill(state);
        snapshot
    }

    /// Refill in place, reusing the instance allocation
    pub fn fill<R: RandomSource>(&mut self, state: &GameState<R>) {
        self.instances.clear();

        if state.player.attached {
            self.instances
                .push(Instance::new(state.player.pos, 0.0, 0.0, tags::PLAYER));
        }
        for segment in state.world.segments() {
            let tag = match segment.kind {
                SegmentKind::Ground => tags::GROUND,
                SegmentKind::Decoration => tags::NEON_STRIP,
            };
            let pos = Vec3::new(segment.x, 0.0, segment.z);
            self.instances.push(Instance::new(pos, 0.0, 0.0, tag));
        }
        self.instances.extend(
            state
                .pools
                .iter()
                .filter(|e| e.active)
                .map(Instance::from_entity),
        );

        let player = state.player.pos;
        self.camera_eye = Vec3::new(0.0, CAMERA_HEIGHT, player.z + CAMERA_TRAIL);
        self.camera_target = player;
        self.score = state.score;
    }

    /// Raw bytes for an instance buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn count(&self, tag: u32) -> usize {
        self.instances.iter().filter(|i| i.tag == tag).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedRandom;
    use crate::tuning::TrackConfig;

    #[test]
    fn test_instance_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Instance>(), 32);
    }

    #[test]
    fn test_snapshot_lists_only_active_entities() {
        let mut state =
            GameState::with_random(TrackConfig::highway(), ScriptedRandom::constant(0.99, 1));
        state.start();
        state.pools.traffic.spawn(Vec3::new(-3.0, 0.75, -40.0), 8.0);
        let coin = state.pools.coins.spawn(Vec3::new(0.0, 1.5, -30.0), 0.0).unwrap();
        state.pools.release(coin);

        let snapshot = RenderSnapshot::capture(&state);

        assert_eq!(snapshot.count(tags::PLAYER), 1);
        assert_eq!(snapshot.count(tags::GROUND), 3);
        assert_eq!(snapshot.count(tags::NEON_STRIP), 6);
        assert_eq!(snapshot.count(tags::TRAFFIC), 1);
        assert_eq!(snapshot.count(tags::COIN), 0);
        assert_eq!(snapshot.instance_bytes().len(), snapshot.instances.len() * 32);
    }

    #[test]
    fn test_camera_follows_runner() {
        let mut state =
            GameState::with_random(TrackConfig::classic(), ScriptedRandom::constant(0.99, 1));
        state.start();
        state.player.pos.z = -80.0;

        let snapshot = RenderSnapshot::capture(&state);
        assert_eq!(snapshot.camera_eye, Vec3::new(0.0, 5.0, -70.0));
        assert_eq!(snapshot.camera_target.z, -80.0);
    }

    #[test]
    fn test_detached_player_not_drawn() {
        let mut state = GameState::new(TrackConfig::classic(), 3);
        // Never started: runner not in the world yet
        let snapshot = RenderSnapshot::capture(&state);
        assert_eq!(snapshot.count(tags::PLAYER), 0);

        state.start();
        assert_eq!(RenderSnapshot::capture(&state).count(tags::PLAYER), 1);
    }
}
