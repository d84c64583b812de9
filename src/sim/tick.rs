//! Per-frame simulation step
//!
//! One call per rendered frame. Order matters: collisions must see positions
//! after movement and scrolling.

use super::random::RandomSource;
use super::scroller::cull_passed;
use super::state::{GamePhase, GameState};
use crate::consts::COIN_SPIN_RATE;

/// Advance the world by `dt` seconds
///
/// No-op unless the run is playing.
pub fn tick<R: RandomSource>(state: &mut GameState<R>, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    // Forward motion is toward -z
    state.player.pos.z -= state.speed * dt;
    state.player.pos.x = state.lanes.step(state.player.pos.x);

    for car in state.pools.traffic.iter_mut().filter(|e| e.active) {
        car.pos.z += car.speed * dt;
    }

    let player_z = state.player.pos.z;
    state
        .world
        .tick(player_z, &state.spawner, &mut state.pools, &mut state.rng);
    let culled = cull_passed(&mut state.pools, player_z, state.config.cull_distance);
    if culled > 0 {
        log::trace!("released {} entities behind z={:.1}", culled, player_z);
    }

    state.check_collisions();

    // Cosmetic, runs even on the frame the run ends
    for coin in state.pools.coins.iter_mut().filter(|e| e.active) {
        coin.spin += dt * COIN_SPIN_RATE;
    }
}
