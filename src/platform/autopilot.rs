//! Demo-mode input source
//!
//! Plays the game by emitting the same lane intents a player would. Used by
//! the attract loop and the native headless run.

use crate::sim::{EntityKind, GameState, LaneShift, RandomSource};

/// Lane intent that steers away from the nearest hazard, if any
///
/// Looks `lookahead` units ahead of the runner. Only ever moves one lane at a
/// time, preferring the free neighbour with a coin in it.
pub fn steer<R: RandomSource>(state: &GameState<R>, lookahead: f32) -> Option<LaneShift> {
    if !state.is_playing() {
        return None;
    }
    let lanes = &state.lanes;
    let count = lanes.lane_count();
    let z = state.player.pos.z;

    let occupied = |lane: usize, kind: EntityKind| {
        let x = lanes.offset(lane);
        state.pools.pool(kind).iter().any(|e| {
            e.active && (e.pos.x - x).abs() < 1.0 && e.pos.z <= z + 1.0 && e.pos.z >= z - lookahead
        })
    };
    let blocked =
        |lane: usize| occupied(lane, EntityKind::Obstacle) || occupied(lane, EntityKind::Traffic);

    let current = lanes.target();
    if !blocked(current) {
        return None;
    }

    let mut options = Vec::with_capacity(2);
    if current > 0 && !blocked(current - 1) {
        options.push((LaneShift::Left, current - 1));
    }
    if current + 1 < count && !blocked(current + 1) {
        options.push((LaneShift::Right, current + 1));
    }
    options
        .iter()
        .find(|(_, lane)| occupied(*lane, EntityKind::Coin))
        .or(options.first())
        .map(|(shift, _)| *shift)
}
