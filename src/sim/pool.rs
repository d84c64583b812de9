//! Fixed-capacity entity pools
//!
//! Pools are allocated once when the world is built. Nothing is allocated or
//! freed while running: entities are toggled active and repositioned. The
//! `active` flag is the only recycling signal.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What a pooled entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static crate blocking a lane
    Obstacle,
    /// Car moving along a lane
    Traffic,
    /// Collectible worth one point
    Coin,
}

/// Which way a traffic car points relative to the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Oncoming (moving toward the runner)
    #[default]
    Toward,
    /// Same direction as the runner
    Away,
}

impl Facing {
    /// Runner travels toward -z, so positive speed is oncoming
    pub fn from_speed(speed: f32) -> Self {
        if speed > 0.0 { Facing::Toward } else { Facing::Away }
    }
}

/// A reusable world entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PooledEntity {
    pub kind: EntityKind,
    pub active: bool,
    /// Lane offset (x), height (y), longitudinal (z)
    pub pos: Vec3,
    /// Cosmetic rotation, coins only
    pub spin: f32,
    /// Signed z speed, traffic only
    pub speed: f32,
    pub facing: Facing,
}

impl PooledEntity {
    fn dormant(kind: EntityKind) -> Self {
        Self {
            kind,
            active: false,
            pos: Vec3::ZERO,
            spin: 0.0,
            speed: 0.0,
            facing: Facing::default(),
        }
    }
}

/// Stable handle to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub slot: usize,
}

/// Fixed-size collection of one entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    kind: EntityKind,
    entities: Vec<PooledEntity>,
}

impl Pool {
    pub fn new(kind: EntityKind, capacity: usize) -> Self {
        Self {
            kind,
            entities: (0..capacity).map(|_| PooledEntity::dormant(kind)).collect(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// First inactive slot in scan order, or `None` when exhausted
    ///
    /// The returned slot is still inactive; the caller positions it and then
    /// flips `active`.
    pub fn acquire(&mut self) -> Option<EntityRef> {
        let slot = self.entities.iter().position(|e| !e.active)?;
        Some(EntityRef {
            kind: self.kind,
            slot,
        })
    }

    /// Acquire, overwrite every per-entity field, and activate
    pub fn spawn(&mut self, pos: Vec3, speed: f32) -> Option<EntityRef> {
        let handle = self.acquire()?;
        let entity = &mut self.entities[handle.slot];
        entity.pos = pos;
        entity.spin = 0.0;
        entity.speed = speed;
        entity.facing = Facing::from_speed(speed);
        entity.active = true;
        Some(handle)
    }

    /// Deactivate a slot; releasing twice is harmless
    pub fn release(&mut self, slot: usize) {
        if let Some(entity) = self.entities.get_mut(slot) {
            entity.active = false;
        }
    }

    pub fn clear(&mut self) {
        for entity in &mut self.entities {
            entity.active = false;
        }
    }

    pub fn get(&self, slot: usize) -> Option<&PooledEntity> {
        self.entities.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut PooledEntity> {
        self.entities.get_mut(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PooledEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PooledEntity> {
        self.entities.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.active).count()
    }
}

/// All world pools, in declaration (and collision) order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pools {
    pub obstacles: Pool,
    pub traffic: Pool,
    pub coins: Pool,
}

impl Pools {
    pub fn new(obstacles: usize, traffic: usize, coins: usize) -> Self {
        Self {
            obstacles: Pool::new(EntityKind::Obstacle, obstacles),
            traffic: Pool::new(EntityKind::Traffic, traffic),
            coins: Pool::new(EntityKind::Coin, coins),
        }
    }

    pub fn pool(&self, kind: EntityKind) -> &Pool {
        match kind {
            EntityKind::Obstacle => &self.obstacles,
            EntityKind::Traffic => &self.traffic,
            EntityKind::Coin => &self.coins,
        }
    }

    pub fn pool_mut(&mut self, kind: EntityKind) -> &mut Pool {
        match kind {
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Traffic => &mut self.traffic,
            EntityKind::Coin => &mut self.coins,
        }
    }

    pub fn get(&self, handle: EntityRef) -> Option<&PooledEntity> {
        self.pool(handle.kind).get(handle.slot)
    }

    pub fn get_mut(&mut self, handle: EntityRef) -> Option<&mut PooledEntity> {
        self.pool_mut(handle.kind).get_mut(handle.slot)
    }

    pub fn release(&mut self, handle: EntityRef) {
        self.pool_mut(handle.kind).release(handle.slot);
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.traffic.clear();
        self.coins.clear();
    }

    /// Every entity in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &PooledEntity> {
        self.obstacles
            .iter()
            .chain(self.traffic.iter())
            .chain(self.coins.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PooledEntity> {
        self.obstacles
            .iter_mut()
            .chain(self.traffic.iter_mut())
            .chain(self.coins.iter_mut())
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|e| e.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_returns_first_inactive() {
        let mut pool = Pool::new(EntityKind::Coin, 3);
        let a = pool.spawn(Vec3::new(0.0, 1.5, -10.0), 0.0).unwrap();
        let b = pool.spawn(Vec3::new(3.0, 1.5, -20.0), 0.0).unwrap();
        assert_eq!((a.slot, b.slot), (0, 1));

        pool.release(a.slot);
        // Stable scan order, not nearest position
        assert_eq!(pool.acquire().unwrap().slot, 0);
    }

    #[test]
    fn test_exhausted_pool_drops_spawn() {
        let mut pool = Pool::new(EntityKind::Obstacle, 2);
        assert!(pool.spawn(Vec3::ZERO, 0.0).is_some());
        assert!(pool.spawn(Vec3::ZERO, 0.0).is_some());
        assert!(pool.acquire().is_none());
        assert!(pool.spawn(Vec3::ZERO, 0.0).is_none());
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut pool = Pool::new(EntityKind::Traffic, 0);
        assert!(pool.spawn(Vec3::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = Pool::new(EntityKind::Coin, 2);
        let a = pool.spawn(Vec3::ZERO, 0.0).unwrap();
        pool.release(a.slot);
        pool.release(a.slot);
        pool.release(99);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_spawn_overwrites_previous_state() {
        let mut pool = Pool::new(EntityKind::Traffic, 1);
        let car = pool.spawn(Vec3::new(-3.0, 0.75, -40.0), 8.0).unwrap();
        pool.get_mut(car.slot).unwrap().spin = 4.0;
        pool.release(car.slot);

        let car = pool.spawn(Vec3::new(3.0, 0.75, -90.0), -8.0).unwrap();
        let entity = pool.get(car.slot).unwrap();
        assert_eq!(entity.pos, Vec3::new(3.0, 0.75, -90.0));
        assert_eq!(entity.spin, 0.0);
        assert_eq!(entity.facing, Facing::Away);
        assert!(entity.active);
    }

    #[test]
    fn test_pools_iterate_in_declaration_order() {
        let pools = Pools::new(1, 1, 1);
        let kinds: Vec<_> = pools.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Obstacle, EntityKind::Traffic, EntityKind::Coin]
        );
    }
}
