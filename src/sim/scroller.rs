//! Endless track via segment recycling
//!
//! A handful of fixed-length slices are laid out ahead of the runner. Once the
//! runner is a full slice past one, it jumps forward by the whole layout
//! length and, for ground, gets freshly populated.

use serde::{Deserialize, Serialize};

use super::pool::Pools;
use super::random::RandomSource;
use super::spawner::{SpawnReport, Spawner};
use crate::tuning::TrackConfig;

/// Whether a recycled segment triggers spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Spawn-eligible floor
    Ground,
    /// Neon edge strip, recycles in lockstep but never spawns
    Decoration,
}

/// A recyclable slice of track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSegment {
    pub kind: SegmentKind,
    /// Lateral offset (0 for ground, strip position for decoration)
    pub x: f32,
    /// Longitudinal center
    pub z: f32,
    pub length: f32,
}

impl GroundSegment {
    pub fn new(kind: SegmentKind, x: f32, z: f32, length: f32) -> Self {
        Self { kind, x, z, length }
    }

    /// Half-open longitudinal span `[near, far)` in increasing z
    pub fn bounds(&self) -> (f32, f32) {
        let half = self.length / 2.0;
        (self.z - half, self.z + half)
    }

    /// Runner is more than a full slice past this segment
    pub fn is_passed(&self, player_z: f32) -> bool {
        player_z < self.z - self.length
    }
}

/// Summary of one scroller step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollReport {
    /// Segments moved ahead (ground and decoration)
    pub recycled: usize,
    /// Ground segments handed to the spawner
    pub populated: usize,
    pub spawned: SpawnReport,
}

/// Owns the segment layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldScroller {
    segments: Vec<GroundSegment>,
    length: f32,
    count: usize,
    decoration_offsets: Vec<f32>,
}

impl WorldScroller {
    pub fn new(config: &TrackConfig) -> Self {
        let mut scroller = Self {
            segments: Vec::new(),
            length: config.segment_length,
            count: config.segment_count,
            decoration_offsets: config.decoration_offsets.clone(),
        };
        scroller.reset();
        scroller
    }

    /// Lay segments out from z=0 forward (toward -z)
    pub fn reset(&mut self) {
        self.segments.clear();
        for i in 0..self.count {
            let z = -self.length * i as f32;
            self.segments
                .push(GroundSegment::new(SegmentKind::Ground, 0.0, z, self.length));
        }
        for &x in &self.decoration_offsets {
            for i in 0..self.count {
                let z = -self.length * i as f32;
                self.segments
                    .push(GroundSegment::new(SegmentKind::Decoration, x, z, self.length));
            }
        }
    }

    pub fn segments(&self) -> &[GroundSegment] {
        &self.segments
    }

    pub fn wrap_distance(&self) -> f32 {
        self.length * self.count as f32
    }

    /// Populate every ground segment strictly ahead of the runner
    pub fn populate_ahead<R: RandomSource>(
        &self,
        player_z: f32,
        spawner: &Spawner,
        pools: &mut Pools,
        rng: &mut R,
    ) -> SpawnReport {
        let mut total = SpawnReport::default();
        for segment in self
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Ground && s.z < player_z)
        {
            accumulate(&mut total, spawner.populate(segment, pools, rng));
        }
        total
    }

    /// Recycle passed segments and populate the ground ones
    pub fn tick<R: RandomSource>(
        &mut self,
        player_z: f32,
        spawner: &Spawner,
        pools: &mut Pools,
        rng: &mut R,
    ) -> ScrollReport {
        let wrap = self.wrap_distance();
        let mut report = ScrollReport::default();

        for segment in &mut self.segments {
            if !segment.is_passed(player_z) {
                continue;
            }
            segment.z -= wrap;
            report.recycled += 1;

            if segment.kind == SegmentKind::Ground {
                let spawned = spawner.populate(segment, pools, rng);
                log::debug!(
                    "recycled ground to z={} ({} placed, {} dropped)",
                    segment.z,
                    spawned.placed(),
                    spawned.dropped
                );
                accumulate(&mut report.spawned, spawned);
                report.populated += 1;
            }
        }
        report
    }
}

/// Release active entities more than `distance` behind the runner
pub fn cull_passed(pools: &mut Pools, player_z: f32, distance: f32) -> usize {
    let mut released = 0;
    for entity in pools.iter_mut().filter(|e| e.active) {
        if entity.pos.z > player_z + distance {
            entity.active = false;
            released += 1;
        }
    }
    released
}

fn accumulate(total: &mut SpawnReport, next: SpawnReport) {
    total.obstacles += next.obstacles;
    total.traffic += next.traffic;
    total.coins += next.coins;
    total.dropped += next.dropped;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{ScriptedRandom, seeded};
    use glam::Vec3;

    fn setup() -> (TrackConfig, WorldScroller, Spawner, Pools) {
        let config = TrackConfig::classic();
        let scroller = WorldScroller::new(&config);
        let spawner = Spawner::new(&config);
        let pools = Pools::new(
            config.obstacle_capacity,
            config.traffic_capacity,
            config.coin_capacity,
        );
        (config, scroller, spawner, pools)
    }

    #[test]
    fn test_initial_layout() {
        let (_, scroller, _, _) = setup();
        let ground: Vec<f32> = scroller
            .segments()
            .iter()
            .filter(|s| s.kind == SegmentKind::Ground)
            .map(|s| s.z)
            .collect();
        assert_eq!(ground, vec![0.0, -50.0, -100.0]);
        // Two strips per slice
        assert_eq!(scroller.segments().len(), 9);
    }

    #[test]
    fn test_no_recycle_before_full_slice() {
        let (_, mut scroller, spawner, mut pools) = setup();
        let mut rng = seeded(1);
        let report = scroller.tick(-50.0, &spawner, &mut pools, &mut rng);
        assert_eq!(report.recycled, 0);
        let report = scroller.tick(-50.01, &spawner, &mut pools, &mut rng);
        assert_eq!(report.recycled, 3); // ground + two strips at z=0
        assert_eq!(report.populated, 1);
    }

    #[test]
    fn test_full_wrap_recycles_each_segment_once() {
        let (_, mut scroller, spawner, mut pools) = setup();
        let mut rng = ScriptedRandom::constant(0.99, 0);
        let before: Vec<f32> = scroller.segments().iter().map(|s| s.z).collect();

        let mut recycled = 0;
        let mut populated = 0;
        let mut z = 0.0;
        // `is_passed` is strict: at exactly -150 the last ground slice
        // (z=-100) has not recycled yet, so run just past it
        while z > -150.5 {
            z -= 0.25;
            let report = scroller.tick(z, &spawner, &mut pools, &mut rng);
            recycled += report.recycled;
            populated += report.populated;
        }

        assert_eq!(recycled, 9);
        assert_eq!(populated, 3);
        for (segment, start) in scroller.segments().iter().zip(before) {
            assert_eq!(segment.z, start - 150.0);
        }
    }

    #[test]
    fn test_decoration_never_spawns() {
        let mut config = TrackConfig::classic();
        config.decoration_offsets = vec![-5.5, 5.5, 7.0];
        let mut scroller = WorldScroller::new(&config);
        let spawner = Spawner::new(&config);
        let mut pools = Pools::new(10, 0, 30);
        // Every slot would place an obstacle
        let mut rng = ScriptedRandom::constant(0.0, 1);

        let report = scroller.tick(-50.5, &spawner, &mut pools, &mut rng);

        assert_eq!(report.recycled, 4);
        assert_eq!(report.populated, 1);
        assert_eq!(report.spawned.obstacles, 5);
    }

    #[test]
    fn test_populate_ahead_skips_segment_under_runner() {
        let (_, scroller, spawner, mut pools) = setup();
        let mut rng = ScriptedRandom::constant(0.0, 1);
        let report = scroller.populate_ahead(0.0, &spawner, &mut pools, &mut rng);
        // z=-50 and z=-100 only
        assert_eq!(report.obstacles, 10);
        assert!(pools.obstacles.iter().all(|e| e.pos.z < -20.0));
    }

    #[test]
    fn test_cull_passed() {
        let (_, _, _, mut pools) = setup();
        pools.coins.spawn(Vec3::new(0.0, 1.5, -10.0), 0.0);
        pools.coins.spawn(Vec3::new(0.0, 1.5, -75.0), 0.0);
        pools.obstacles.spawn(Vec3::new(3.0, 1.0, -35.0), 0.0);

        let released = cull_passed(&mut pools, -60.0, 20.0);
        assert_eq!(released, 2);
        assert_eq!(pools.active_count(), 1);
    }
}
