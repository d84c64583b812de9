//! Axis-aligned collision pass between the runner and pooled entities

use glam::Vec3;

use super::pool::{EntityKind, EntityRef, Pool, Pools};
use crate::tuning::Extents;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Overlap test; touching faces count as a hit
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// What one collision pass found
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Runner touched an obstacle or a car
    pub crashed: bool,
    /// Coins deactivated this pass, in scan order
    pub collected: Vec<EntityRef>,
}

fn half_extents(extents: &Extents, kind: EntityKind) -> Vec3 {
    match kind {
        EntityKind::Obstacle => extents.obstacle,
        EntityKind::Traffic => extents.traffic,
        EntityKind::Coin => extents.coin,
    }
}

/// Test every active entity against the runner box
///
/// Coins that overlap are deactivated here; hazards only set `crashed`.
/// Pools are scanned in declaration order and a crash does not stop the
/// scan, so coins touched on the same frame still count.
pub fn resolve(player: &Aabb, pools: &mut Pools, extents: &Extents) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    let hazards = [&pools.obstacles, &pools.traffic];
    outcome.crashed = hazards
        .into_iter()
        .any(|pool| first_hit(pool, player, extents).is_some());

    let coin_extents = extents.coin;
    for (slot, coin) in pools.coins.iter_mut().enumerate() {
        if !coin.active {
            continue;
        }
        if player.intersects(&Aabb::from_center(coin.pos, coin_extents)) {
            coin.active = false;
            outcome.collected.push(EntityRef {
                kind: EntityKind::Coin,
                slot,
            });
        }
    }
    outcome
}

fn first_hit(pool: &Pool, player: &Aabb, extents: &Extents) -> Option<usize> {
    let half = half_extents(extents, pool.kind());
    pool.iter()
        .position(|e| e.active && player.intersects(&Aabb::from_center(e.pos, half)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_box(pos: Vec3) -> Aabb {
        Aabb::from_center(pos, Extents::default().player)
    }

    #[test]
    fn test_aabb_separated_on_one_axis() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        assert!(a.intersects(&Aabb::from_center(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE)));
        assert!(a.intersects(&Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE)));
        assert!(!a.intersects(&Aabb::from_center(Vec3::new(2.1, 0.0, 0.0), Vec3::ONE)));
        assert!(!a.intersects(&Aabb::from_center(Vec3::new(0.0, 0.0, -5.0), Vec3::ONE)));
    }

    #[test]
    fn test_adjacent_lane_does_not_hit() {
        let mut pools = Pools::new(1, 0, 0);
        pools.obstacles.spawn(Vec3::new(3.0, 1.0, 0.0), 0.0);
        let outcome = resolve(&player_box(Vec3::new(0.0, 1.5, 0.0)), &mut pools, &Extents::default());
        assert!(!outcome.crashed);
    }

    #[test]
    fn test_inactive_entities_ignored() {
        let mut pools = Pools::new(1, 1, 1);
        let rock = pools.obstacles.spawn(Vec3::new(0.0, 1.0, 0.0), 0.0).unwrap();
        let coin = pools.coins.spawn(Vec3::new(0.0, 1.5, 0.0), 0.0).unwrap();
        pools.release(rock);
        pools.release(coin);

        let outcome = resolve(&player_box(Vec3::new(0.0, 1.5, 0.0)), &mut pools, &Extents::default());
        assert_eq!(outcome, CollisionOutcome::default());
    }

    #[test]
    fn test_coin_collected_once() {
        let mut pools = Pools::new(0, 0, 2);
        pools.coins.spawn(Vec3::new(0.0, 1.5, -0.5), 0.0);
        let player = player_box(Vec3::new(0.0, 1.5, 0.0));

        let first = resolve(&player, &mut pools, &Extents::default());
        assert_eq!(first.collected.len(), 1);
        assert_eq!(pools.coins.active_count(), 0);

        let second = resolve(&player, &mut pools, &Extents::default());
        assert!(second.collected.is_empty());
    }

    #[test]
    fn test_crash_does_not_roll_back_coins() {
        let mut pools = Pools::new(1, 1, 1);
        pools.traffic.spawn(Vec3::new(0.0, 0.75, -1.0), 8.0);
        pools.coins.spawn(Vec3::new(0.0, 1.5, 0.0), 0.0);

        let outcome = resolve(&player_box(Vec3::new(0.0, 1.5, 0.0)), &mut pools, &Extents::default());
        assert!(outcome.crashed);
        assert_eq!(outcome.collected.len(), 1);
    }
}
