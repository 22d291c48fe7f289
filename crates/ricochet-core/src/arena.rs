//! Arena: owned collections of tanks and projectiles.
//!
//! The Arena is the container the driver loop steps. It provides:
//! - Tank and projectile storage with deterministic iteration order (`BTreeMap`)
//! - A single monotonically increasing ID space for both kinds
//! - Spawn, despawn and the projectile spawn sink
//! - Removal of projectiles that left play
//!
//! # Example
//!
//! ```
//! use ricochet_core::arena::Arena;
//! use ricochet_core::config::{ProjectileSpec, TankTuning};
//! use ricochet_core::math::Vector2;
//!
//! let mut arena = Arena::new();
//! let tank = arena
//!     .spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), Some(ProjectileSpec::default()))
//!     .unwrap();
//!
//! let shot = arena.tank_mut(tank).unwrap().fire(Vector2::new(100.0, 0.0)).unwrap();
//! let shot_id = arena.insert_projectile(shot);
//!
//! assert!(tank < shot_id);
//! assert_eq!(arena.projectile_count(), 1);
//! ```

use std::collections::BTreeMap;

use crate::config::{ProjectileSpec, TankTuning};
use crate::entity::{EntityId, EntityKind};
use crate::error::ConfigError;
use crate::math::Vector2;
use crate::projectile::Projectile;
use crate::tank::Tank;

/// Container for all simulated entities.
///
/// # Determinism
///
/// Entities are stored in `BTreeMap`s keyed by [`EntityId`], and IDs are
/// assigned monotonically, so iteration order is spawn order on every
/// platform.
#[derive(Debug, Default)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    tanks: BTreeMap<EntityId, Tank>,
    projectiles: BTreeMap<EntityId, Projectile>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns a tank and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `tuning` or `projectile_template` fails
    /// validation. No ID is consumed in that case.
    pub fn spawn_tank(
        &mut self,
        position: Vector2,
        heading: f64,
        tuning: TankTuning,
        projectile_template: Option<ProjectileSpec>,
    ) -> Result<EntityId, ConfigError> {
        let tank = Tank::new(EntityId::new(self.next_id), position, heading, tuning, projectile_template)?;
        let id = self.allocate_id();
        self.tanks.insert(id, tank);
        Ok(id)
    }

    /// Spawns a tank whose tuning the caller has already validated.
    pub(crate) fn spawn_validated_tank(
        &mut self,
        position: Vector2,
        heading: f64,
        tuning: TankTuning,
        projectile_template: Option<ProjectileSpec>,
    ) -> EntityId {
        let id = self.allocate_id();
        self.tanks
            .insert(id, Tank::assemble(id, position, heading, tuning, projectile_template));
        id
    }

    /// Takes ownership of a newly fired projectile and returns its ID.
    pub fn insert_projectile(&mut self, projectile: Projectile) -> EntityId {
        let id = self.allocate_id();
        self.projectiles.insert(id, projectile);
        id
    }

    /// Removes a tank, returning it if it existed.
    pub fn despawn_tank(&mut self, id: EntityId) -> Option<Tank> {
        self.tanks.remove(&id)
    }

    /// Removes a projectile, returning it if it existed.
    pub fn despawn_projectile(&mut self, id: EntityId) -> Option<Projectile> {
        self.projectiles.remove(&id)
    }

    /// Removes every projectile that is no longer alive and returns their IDs.
    pub fn remove_dead_projectiles(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .projectiles
            .iter()
            .filter(|(_, projectile)| !projectile.is_alive())
            .map(|(id, _)| *id)
            .collect();
        for id in &dead {
            self.projectiles.remove(id);
        }
        dead
    }

    /// Which collection `id` lives in, if any.
    #[must_use]
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        if self.tanks.contains_key(&id) {
            Some(EntityKind::Tank)
        } else if self.projectiles.contains_key(&id) {
            Some(EntityKind::Projectile)
        } else {
            None
        }
    }

    /// Returns a tank by ID.
    #[must_use]
    pub fn tank(&self, id: EntityId) -> Option<&Tank> {
        self.tanks.get(&id)
    }

    /// Returns a mutable tank by ID.
    #[must_use]
    pub fn tank_mut(&mut self, id: EntityId) -> Option<&mut Tank> {
        self.tanks.get_mut(&id)
    }

    /// Returns a projectile by ID.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Returns a mutable projectile by ID.
    #[must_use]
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut Projectile> {
        self.projectiles.get_mut(&id)
    }

    /// Tank IDs in deterministic order.
    pub fn tank_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.tanks.keys().copied()
    }

    /// Projectile IDs in deterministic order.
    pub fn projectile_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.projectiles.keys().copied()
    }

    /// Tanks in deterministic order.
    pub fn tanks(&self) -> impl Iterator<Item = &Tank> + '_ {
        self.tanks.values()
    }

    /// Projectiles with their IDs in deterministic order.
    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> + '_ {
        self.projectiles.iter().map(|(id, projectile)| (*id, projectile))
    }

    /// Mutable access to a projectile and a tank at the same time.
    pub(crate) fn projectile_and_tank_mut(
        &mut self,
        projectile: EntityId,
        tank: EntityId,
    ) -> Option<(&mut Projectile, &mut Tank)> {
        let projectile = self.projectiles.get_mut(&projectile)?;
        let tank = self.tanks.get_mut(&tank)?;
        Some((projectile, tank))
    }

    /// Mutable access to two distinct projectiles at the same time.
    pub(crate) fn projectile_pair_mut(
        &mut self,
        first: EntityId,
        second: EntityId,
    ) -> Option<(&mut Projectile, &mut Projectile)> {
        if first == second {
            return None;
        }
        let mut first_ref = None;
        let mut second_ref = None;
        for (id, projectile) in &mut self.projectiles {
            if *id == first {
                first_ref = Some(projectile);
            } else if *id == second {
                second_ref = Some(projectile);
            }
        }
        Some((first_ref?, second_ref?))
    }

    /// Number of tanks.
    #[must_use]
    pub fn tank_count(&self) -> usize {
        self.tanks.len()
    }

    /// Number of projectiles, dead or alive.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Returns true if the arena holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tanks.is_empty() && self.projectiles.is_empty()
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(position: Vector2) -> Projectile {
        Projectile::spawn(None, position, Vector2::X, ProjectileSpec::default()).unwrap()
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn new_arena_is_empty() {
            let arena = Arena::new();
            assert!(arena.is_empty());
            assert_eq!(arena.current_tick(), 0);
        }

        #[test]
        fn ids_are_shared_and_monotonic() {
            let mut arena = Arena::new();
            let a = arena.spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), None).unwrap();
            let p = arena.insert_projectile(shot(Vector2::ZERO));
            let b = arena.spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), None).unwrap();
            assert!(a < p && p < b);
            assert_eq!(arena.kind_of(a), Some(EntityKind::Tank));
            assert_eq!(arena.kind_of(p), Some(EntityKind::Projectile));
            assert_eq!(arena.kind_of(EntityId::new(99)), None);
        }

        #[test]
        fn spawned_tank_knows_its_id() {
            let mut arena = Arena::new();
            let id = arena.spawn_tank(Vector2::new(1.0, 2.0), 0.0, TankTuning::default(), None).unwrap();
            let tank = arena.tank(id).unwrap();
            assert_eq!(tank.id(), id);
            assert_eq!(tank.position(), Vector2::new(1.0, 2.0));
        }

        #[test]
        fn invalid_tuning_is_rejected_without_consuming_an_id() {
            let mut arena = Arena::new();
            let bad = TankTuning {
                move_speed: -300.0,
                ..Default::default()
            };
            assert!(arena.spawn_tank(Vector2::ZERO, 0.0, bad, None).is_err());
            assert!(arena
                .spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), Some(ProjectileSpec::with_speed(f64::NAN)))
                .is_err());
            assert!(arena.is_empty());

            let id = arena.spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), None).unwrap();
            assert_eq!(id, EntityId::new(0));
        }

        #[test]
        fn iteration_is_in_id_order() {
            let mut arena = Arena::new();
            let ids: Vec<_> = (0..5)
                .map(|i| arena.spawn_tank(Vector2::splat(f64::from(i)), 0.0, TankTuning::default(), None).unwrap())
                .collect();
            assert_eq!(arena.tank_ids().collect::<Vec<_>>(), ids);
        }
    }

    mod despawn_tests {
        use super::*;

        #[test]
        fn despawn_removes() {
            let mut arena = Arena::new();
            let t = arena.spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), None).unwrap();
            let p = arena.insert_projectile(shot(Vector2::ZERO));
            assert!(arena.despawn_tank(t).is_some());
            assert!(arena.despawn_projectile(p).is_some());
            assert!(arena.despawn_tank(t).is_none());
            assert!(arena.is_empty());
        }

        #[test]
        fn remove_dead_projectiles_only_removes_dead() {
            let mut arena = Arena::new();
            let live = arena.insert_projectile(shot(Vector2::ZERO));
            let dead = arena.insert_projectile(shot(Vector2::ONE));
            arena.projectile_mut(dead).unwrap().on_exit_bounds();

            assert_eq!(arena.remove_dead_projectiles(), vec![dead]);
            assert!(arena.projectile(live).is_some());
            assert_eq!(arena.projectile_count(), 1);
        }
    }

    mod borrow_tests {
        use super::*;

        #[test]
        fn projectile_pair_requires_distinct_ids() {
            let mut arena = Arena::new();
            let a = arena.insert_projectile(shot(Vector2::ZERO));
            let b = arena.insert_projectile(shot(Vector2::ONE));
            assert!(arena.projectile_pair_mut(a, a).is_none());
            let (first, second) = arena.projectile_pair_mut(b, a).unwrap();
            assert_eq!(first.position(), Vector2::ONE);
            assert_eq!(second.position(), Vector2::ZERO);
        }

        #[test]
        fn projectile_and_tank_lookup() {
            let mut arena = Arena::new();
            let t = arena.spawn_tank(Vector2::ZERO, 0.0, TankTuning::default(), None).unwrap();
            let p = arena.insert_projectile(shot(Vector2::ONE));
            assert!(arena.projectile_and_tank_mut(p, t).is_some());
            assert!(arena.projectile_and_tank_mut(t, p).is_none());
        }
    }

    #[test]
    fn advance_tick_increments() {
        let mut arena = Arena::new();
        arena.advance_tick();
        arena.advance_tick();
        assert_eq!(arena.current_tick(), 2);
    }
}
