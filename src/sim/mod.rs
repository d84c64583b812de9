//! Endless-world simulation
//!
//! All gameplay logic lives here. This module must stay presentation-agnostic:
//! - One tick per frame, no suspension points
//! - Randomness only through `RandomSource`
//! - Stable iteration order (pool declaration order, then slot)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod lane;
pub mod pool;
pub mod random;
pub mod scroller;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionOutcome};
pub use lane::{LaneModel, LaneShift};
pub use pool::{EntityKind, EntityRef, Facing, Pool, PooledEntity, Pools};
pub use random::{RandomSource, ScriptedRandom};
pub use scroller::{GroundSegment, ScrollReport, SegmentKind, WorldScroller};
pub use spawner::{SlotOutcome, SpawnReport, Spawner};
pub use state::{GameEvent, GamePhase, GameState, Player};
pub use tick::tick;
