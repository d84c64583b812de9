//! Procedural placement on freshly recycled ground
//!
//! Each ground segment is walked at a fixed stride. Every slot picks a lane
//! and makes one weighted roll: obstacle, traffic, coin cluster, or nothing.

use glam::Vec3;

use super::pool::Pools;
use super::random::RandomSource;
use super::scroller::GroundSegment;
use crate::tuning::{SpawnTable, TrackConfig};

/// Outcome of one slot roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Obstacle,
    Traffic,
    CoinCluster,
    Empty,
}

/// What a single `populate` pass placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub obstacles: usize,
    pub traffic: usize,
    pub coins: usize,
    /// Placements lost to exhausted pools
    pub dropped: usize,
}

impl SpawnReport {
    pub fn placed(&self) -> usize {
        self.obstacles + self.traffic + self.coins
    }
}

/// Placement policy for one track
#[derive(Debug, Clone)]
pub struct Spawner {
    table: SpawnTable,
    lanes: Vec<f32>,
    traffic_enabled: bool,
}

impl Spawner {
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            table: config.spawn.clone(),
            lanes: config.lanes.clone(),
            traffic_enabled: config.traffic_enabled,
        }
    }

    /// Map a uniform roll to an outcome using the cumulative bands
    pub fn classify(&self, roll: f32) -> SlotOutcome {
        let t = &self.table;
        if roll < t.obstacle_below {
            SlotOutcome::Obstacle
        } else if self.traffic_enabled && roll < t.traffic_below {
            SlotOutcome::Traffic
        } else if roll < t.coins_below {
            SlotOutcome::CoinCluster
        } else {
            SlotOutcome::Empty
        }
    }

    /// Fill `segment` with entities drawn from `pools`
    ///
    /// Each stride slot is visited once per pass, so two placements never
    /// share a slot z. The guarantee is per slot, not per lane: a coin run
    /// may reach into the next slot. A non-positive stride places nothing.
    pub fn populate<R: RandomSource>(
        &self,
        segment: &GroundSegment,
        pools: &mut Pools,
        rng: &mut R,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        let stride = self.table.stride;
        if self.lanes.is_empty() || !(stride > 0.0) {
            return report;
        }

        let (start, end) = segment.bounds();
        let mut index = 0u32;
        loop {
            let z = start + index as f32 * stride;
            if z >= end {
                break;
            }
            index += 1;

            let lane = rng.pick(self.lanes.len());
            let x = self.lanes[lane];
            match self.classify(rng.roll()) {
                SlotOutcome::Obstacle => {
                    let pos = Vec3::new(x, self.table.obstacle_height, z);
                    match pools.obstacles.spawn(pos, 0.0) {
                        Some(_) => report.obstacles += 1,
                        None => report.dropped += 1,
                    }
                }
                SlotOutcome::Traffic => {
                    let sign = if rng.flip() { 1.0 } else { -1.0 };
                    let pos = Vec3::new(x, self.table.traffic_height, z);
                    match pools.traffic.spawn(pos, sign * self.table.traffic_speed) {
                        Some(_) => report.traffic += 1,
                        None => report.dropped += 1,
                    }
                }
                SlotOutcome::CoinCluster => {
                    for i in 0..self.table.cluster_size {
                        let pos = Vec3::new(
                            x,
                            self.table.coin_height,
                            z + i as f32 * self.table.coin_spacing,
                        );
                        match pools.coins.spawn(pos, 0.0) {
                            Some(_) => report.coins += 1,
                            None => report.dropped += 1,
                        }
                    }
                }
                SlotOutcome::Empty => {}
            }
        }

        if report.dropped > 0 {
            log::trace!(
                "segment z={}: {} spawns dropped (pools exhausted)",
                segment.z,
                report.dropped
            );
        }
        report
    }
}
