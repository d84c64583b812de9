//! Game state and lifecycle
//!
//! `GameState` owns the runner, the pools, the segment layout, and the random
//! source. Only the methods here change `phase`.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{self, Aabb};
use super::lane::{LaneModel, LaneShift};
use super::pool::Pools;
use super::random::{self, RandomSource};
use super::scroller::WorldScroller;
use super::spawner::Spawner;
use crate::tuning::TrackConfig;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, never started
    Idle,
    /// Ticking
    Playing,
    /// Suspended by the player or the host
    Paused,
    /// Run ended by a crash
    GameOver,
}

/// Events for hosts (audio, HUD, menus) to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    CoinCollected { score: u64 },
    GameOver { score: u64 },
    Paused,
    Resumed,
}

/// The runner avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lateral x (smoothed), height y, longitudinal z
    pub pos: Vec3,
    /// Half extents of the collision box
    pub half_extents: Vec3,
    /// False once the runner has crashed out of the world
    pub attached: bool,
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_extents)
    }
}

/// Complete runtime state for one track
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub config: TrackConfig,
    pub phase: GamePhase,
    pub player: Player,
    pub lanes: LaneModel,
    pub pools: Pools,
    pub world: WorldScroller,
    pub spawner: Spawner,
    /// Coins collected this run
    pub score: u64,
    /// Forward speed (units/sec), frozen on game over
    pub speed: f32,
    /// Runs started since construction
    pub runs: u32,
    pub rng: R,
    events: Vec<GameEvent>,
}

impl GameState<Pcg32> {
    /// Create a world with a seeded PCG stream
    pub fn new(config: TrackConfig, seed: u64) -> Self {
        Self::with_random(config, random::seeded(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a world with a caller-supplied random source
    pub fn with_random(config: TrackConfig, rng: R) -> Self {
        let lanes = LaneModel::new(config.lanes.clone(), config.start_lane, config.lane_smoothing);
        let player = Player {
            pos: Vec3::new(lanes.target_offset(), config.player_height, 0.0),
            half_extents: config.extents.player,
            attached: false,
        };
        let pools = Pools::new(
            config.obstacle_capacity,
            config.traffic_capacity,
            config.coin_capacity,
        );
        Self {
            world: WorldScroller::new(&config),
            spawner: Spawner::new(&config),
            phase: GamePhase::Idle,
            player,
            lanes,
            pools,
            score: 0,
            speed: config.player_speed,
            runs: 0,
            rng,
            events: Vec::new(),
            config,
        }
    }

    /// Reset everything and begin a run
    ///
    /// Valid from any phase; this is also the only way out of `GameOver`.
    pub fn start(&mut self) {
        self.reset_world();
        let spawned =
            self.world
                .populate_ahead(self.player.pos.z, &self.spawner, &mut self.pools, &mut self.rng);
        self.runs += 1;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::GameStarted);
        log::info!(
            "Run {} started ({} entities placed ahead)",
            self.runs,
            spawned.placed()
        );
    }

    /// Clear the run without populating
    fn reset_world(&mut self) {
        self.lanes.reset();
        self.player.pos = Vec3::new(self.lanes.target_offset(), self.config.player_height, 0.0);
        self.player.attached = true;
        self.score = 0;
        self.speed = self.config.player_speed;
        self.pools.clear();
        self.world.reset();
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.events.push(GameEvent::Paused);
            log::info!("Paused at z={:.1}", self.player.pos.z);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::Resumed);
            log::info!("Resumed");
        }
    }

    /// Host-facing pause toggle (Escape, pause button)
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Request a lane change; ignored unless playing
    pub fn move_lane(&mut self, shift: LaneShift) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.lanes.shift(shift)
    }

    /// Run the collision pass against the current positions
    ///
    /// Applies coin pickups and ends the run on a hazard hit. Does nothing
    /// unless playing.
    pub fn check_collisions(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let outcome = collision::resolve(&self.player.bounds(), &mut self.pools, &self.config.extents);
        for _ in &outcome.collected {
            self.score += 1;
            self.events.push(GameEvent::CoinCollected { score: self.score });
        }
        if outcome.crashed {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.player.attached = false;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {} at z={:.1}",
            self.score,
            self.player.pos.z
        );
    }

    /// Events raised since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn current_lane(&self) -> usize {
        self.lanes.target()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Distance covered this run
    pub fn distance(&self) -> f32 {
        -self.player.pos.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandom;

    /// Track whose spawner never places anything
    fn empty_track() -> GameState<ScriptedRandom> {
        GameState::with_random(TrackConfig::classic(), ScriptedRandom::constant(0.99, 1))
    }

    #[test]
    fn test_new_is_idle() {
        let state = GameState::new(TrackConfig::classic(), 1);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.pools.active_count(), 0);
        assert_eq!(state.current_lane(), 1);
        assert!(!state.is_playing());
    }

    #[test]
    fn test_start_emits_event_and_plays() {
        let mut state = empty_track();
        state.start();
        assert!(state.is_playing());
        assert!(state.player.attached);
        assert_eq!(state.take_events(), vec![GameEvent::GameStarted]);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_start_populates_only_ahead() {
        let mut state =
            GameState::with_random(TrackConfig::classic(), ScriptedRandom::constant(0.0, 0));
        state.start();
        assert_eq!(state.pools.obstacles.active_count(), 10);
        assert!(
            state
                .pools
                .iter()
                .filter(|e| e.active)
                .all(|e| e.pos.z < state.player.pos.z)
        );
    }

    #[test]
    fn test_start_with_zero_stride_returns() {
        let mut config = TrackConfig::classic();
        config.spawn.stride = 0.0;
        let mut state = GameState::new(config, 1);
        state.start();
        assert!(state.is_playing());
        assert_eq!(state.pools.active_count(), 0);
    }

    #[test]
    fn test_pause_resume_only_from_valid_phases() {
        let mut state = empty_track();
        state.pause();
        assert_eq!(state.phase, GamePhase::Idle);
        state.resume();
        assert_eq!(state.phase, GamePhase::Idle);

        state.start();
        state.pause();
        assert!(state.is_paused());
        state.pause();
        assert!(state.is_paused());
        state.toggle_pause();
        assert!(state.is_playing());

        let events = state.take_events();
        assert_eq!(
            events,
            vec![GameEvent::GameStarted, GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_move_lane_ignored_unless_playing() {
        let mut state = empty_track();
        assert!(!state.move_lane(LaneShift::Left));
        assert_eq!(state.current_lane(), 1);

        state.start();
        assert!(state.move_lane(LaneShift::Left));
        assert_eq!(state.current_lane(), 0);

        state.pause();
        assert!(!state.move_lane(LaneShift::Right));
        assert_eq!(state.current_lane(), 0);
    }

    #[test]
    fn test_obstacle_hit_ends_run_once() {
        let mut state = empty_track();
        state.start();
        state.take_events();

        let pos = state.player.pos;
        state.pools.obstacles.spawn(Vec3::new(pos.x, 1.0, pos.z), 0.0);
        state.pools.obstacles.spawn(Vec3::new(pos.x, 1.0, pos.z - 0.5), 0.0);

        state.check_collisions();
        assert!(state.is_game_over());
        assert!(!state.player.attached);
        state.check_collisions();

        assert_eq!(state.take_events(), vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_restart_after_game_over_resets() {
        let mut state = empty_track();
        state.start();
        state.move_lane(LaneShift::Right);
        state.player.pos.z = -420.0;
        state.score = 12;
        state.pools.coins.spawn(Vec3::new(3.0, 1.5, -430.0), 0.0);
        let pos = state.player.pos;
        state.pools.obstacles.spawn(Vec3::new(pos.x, 1.0, pos.z), 0.0);
        state.check_collisions();
        assert!(state.is_game_over());

        state.start();
        assert!(state.is_playing());
        assert_eq!(state.score, 0);
        assert_eq!(state.current_lane(), 1);
        assert_eq!(state.player.pos, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(state.pools.active_count(), 0);
        assert_eq!(state.runs, 2);
        assert!(state.world.segments().iter().any(|s| s.z == 0.0));
    }
}
