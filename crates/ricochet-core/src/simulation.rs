//! Simulation driver: one explicit loop over an owned [`Arena`].
//!
//! The host owns the clock, the input devices and the collision geometry.
//! Each frame it calls [`Simulation::step`] with the elapsed time, the
//! control input for each tank and its [`SpatialMover`]. One tick runs:
//!
//! 1. **INPUT**: apply control vectors; tanks that fire hand their new
//!    projectile to the arena (new projectiles start moving next tick)
//! 2. **TANKS**: step every tank, then let the mover clip its move
//! 3. **PROJECTILES**: step every projectile, let the mover sweep it and
//!    resolve the reported collision, if any
//! 4. **CLEANUP**: remove projectiles that left play, advance the tick
//!
//! Death signals fire synchronously inside phase 2 or 3, so every listener
//! sees them before `step` returns. Respawning goes through
//! [`Simulation::respawn`], which takes `&mut self` and therefore can only
//! run between ticks.
//!
//! # Example
//!
//! ```
//! use ricochet_core::config::SimulationConfig;
//! use ricochet_core::math::Vector2;
//! use ricochet_core::simulation::{ControlInput, ControlInputs, OpenField, Simulation};
//!
//! let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
//! let tank = sim.spawn_tank(Vector2::ZERO, 0.0);
//!
//! let mut inputs = ControlInputs::new();
//! inputs.insert(tank, ControlInput::drive(0.0, 1.0));
//! let report = sim.step(1.0, &inputs, &mut OpenField);
//!
//! assert_eq!(report.tick, 0);
//! assert!((sim.arena().tank(tank).unwrap().position().y - 300.0).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::arena::Arena;
use crate::config::SimulationConfig;
use crate::entity::{EntityId, EntityKind};
use crate::error::ConfigError;
use crate::math::Vector2;
use crate::projectile::Projectile;
use crate::resolver::{CollisionTarget, ResolutionOutcome};
use crate::signal::{CombatSignal, ListenerId};
use crate::tank::Tank;

// =============================================================================
// Host boundary
// =============================================================================

/// Control input for one tank for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    /// Turn intent in `[-1, 1]`.
    pub turn: f64,
    /// Throttle in `[-1, 1]`.
    pub throttle: f64,
    /// World point to fire at this tick, if the trigger was pulled.
    pub fire_at: Option<Vector2>,
}

impl ControlInput {
    /// Input that only drives.
    #[must_use]
    pub const fn drive(turn: f64, throttle: f64) -> Self {
        Self {
            turn,
            throttle,
            fire_at: None,
        }
    }

    /// Adds a fire command aimed at `aim_point`.
    #[must_use]
    pub fn firing_at(mut self, aim_point: Vector2) -> Self {
        self.fire_at = Some(aim_point);
        self
    }
}

/// Per-tick inputs keyed by tank. A map, so each tank gets at most one.
pub type ControlInputs = BTreeMap<EntityId, ControlInput>;

/// What a moving entity ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTarget {
    /// Static geometry or anything else the arena does not own.
    Surface,
    /// A tank or projectile owned by the arena.
    Entity(EntityId),
}

/// A collision reported by the mover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Surface normal at the contact, pointing toward the mover.
    pub normal: Vector2,
    /// What was hit.
    pub target: ContactTarget,
}

/// Something that happened during a swept move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveEvent {
    /// The move was stopped by a contact.
    Collision(Contact),
    /// The entity left the playable bounds.
    ExitedBounds,
}

/// A proposed move handed to the mover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    /// The entity being moved.
    pub id: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Position at the start of the tick.
    pub from: Vector2,
    /// Position the entity proposes to end the tick at.
    pub to: Vector2,
}

/// The mover's verdict on a [`MoveRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveReport {
    /// Authoritative end-of-tick position.
    pub position: Vector2,
    /// At most one event per entity per tick.
    pub event: Option<MoveEvent>,
}

impl MoveReport {
    /// The move went through unobstructed.
    #[must_use]
    pub const fn clear(position: Vector2) -> Self {
        Self {
            position,
            event: None,
        }
    }

    /// The move ended in a collision at `position`.
    #[must_use]
    pub const fn collision(position: Vector2, normal: Vector2, target: ContactTarget) -> Self {
        Self {
            position,
            event: Some(MoveEvent::Collision(Contact { normal, target })),
        }
    }

    /// The move crossed the playable bounds.
    #[must_use]
    pub const fn exited(position: Vector2) -> Self {
        Self {
            position,
            event: Some(MoveEvent::ExitedBounds),
        }
    }
}

/// The host's spatial system: performs swept moves against world geometry.
pub trait SpatialMover {
    /// Sweeps `request.from -> request.to` and reports where the entity ends
    /// up and what, if anything, it hit.
    fn sweep(&mut self, request: &MoveRequest) -> MoveReport;
}

/// A mover with no geometry: every move succeeds and nothing is ever hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl SpatialMover for OpenField {
    fn sweep(&mut self, request: &MoveRequest) -> MoveReport {
        MoveReport::clear(request.to)
    }
}

// =============================================================================
// Reports and snapshots
// =============================================================================

/// A resolved projectile collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// The projectile that collided.
    pub projectile: EntityId,
    /// What it collided with.
    pub target: ContactTarget,
    /// How the collision was resolved.
    pub outcome: ResolutionOutcome,
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// The tick that was executed.
    pub tick: u64,
    /// Projectiles fired this tick.
    pub spawned: Vec<EntityId>,
    /// Projectile collisions resolved this tick.
    pub collisions: Vec<CollisionRecord>,
    /// Death signals fired this tick.
    pub deaths: Vec<CombatSignal>,
    /// Projectiles removed from the arena this tick.
    pub removed: Vec<EntityId>,
}

/// Serializable view of a tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankState {
    /// Tank ID.
    pub id: EntityId,
    /// Position.
    pub position: Vector2,
    /// Heading.
    pub heading: f64,
    /// Velocity.
    pub velocity: Vector2,
    /// Alive flag.
    pub alive: bool,
    /// Death count.
    pub deaths: u32,
}

/// Serializable view of the whole arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Next tick to execute.
    pub tick: u64,
    /// Tanks in ID order.
    pub tanks: Vec<TankState>,
    /// Projectiles in ID order.
    pub projectiles: Vec<(EntityId, Projectile)>,
}

// =============================================================================
// Simulation
// =============================================================================

/// The driver loop.
#[derive(Debug)]
pub struct Simulation {
    arena: Arena,
    config: SimulationConfig,
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            arena: Arena::new(),
            config,
        })
    }

    /// Spawns a tank with the configured tuning and projectile template.
    pub fn spawn_tank(&mut self, position: Vector2, heading: f64) -> EntityId {
        // the config passed validation in `new` and is never mutated
        let id = self.arena.spawn_validated_tank(
            position,
            heading,
            self.config.tank,
            Some(self.config.projectile),
        );
        debug!(%id, ?position, "tank spawned");
        id
    }

    /// Registers a death listener on a tank. Returns `None` for unknown IDs.
    pub fn subscribe<F>(&mut self, tank: EntityId, listener: F) -> Option<ListenerId>
    where
        F: FnMut(&CombatSignal) + Send + 'static,
    {
        self.arena.tank_mut(tank).map(|t| t.subscribe(listener))
    }

    /// Revives a dead (or live) tank. Returns `false` for unknown IDs.
    pub fn respawn(&mut self, tank: EntityId, position: Vector2, heading: f64) -> bool {
        match self.arena.tank_mut(tank) {
            Some(t) => {
                t.reset(position, heading);
                true
            }
            None => false,
        }
    }

    /// Runs one tick of length [`SimulationConfig::fixed_dt`].
    pub fn step_fixed(&mut self, inputs: &ControlInputs, mover: &mut dyn SpatialMover) -> TickReport {
        self.step(self.config.fixed_dt, inputs, mover)
    }

    /// Runs one tick of length `dt`. See the module docs for the phases.
    pub fn step(&mut self, dt: f64, inputs: &ControlInputs, mover: &mut dyn SpatialMover) -> TickReport {
        let tick = self.arena.current_tick();
        let _span = debug_span!("tick", tick).entered();
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        let in_flight: Vec<EntityId> = self.arena.projectile_ids().collect();
        let alive_before: Vec<EntityId> = self
            .arena
            .tanks()
            .filter(|t| t.is_alive())
            .map(Tank::id)
            .collect();

        self.apply_inputs(inputs, &mut report);
        self.move_tanks(dt, mover, &mut report);
        self.move_projectiles(&in_flight, dt, mover, &mut report);

        for id in alive_before {
            if self.arena.tank(id).is_some_and(|t| !t.is_alive()) {
                report.deaths.push(CombatSignal { victim: id });
            }
        }

        report.removed = self.arena.remove_dead_projectiles();
        self.arena.advance_tick();
        trace!(
            spawned = report.spawned.len(),
            collisions = report.collisions.len(),
            deaths = report.deaths.len(),
            "tick done"
        );
        report
    }

    fn apply_inputs(&mut self, inputs: &ControlInputs, report: &mut TickReport) {
        for (&id, input) in inputs {
            let Some(tank) = self.arena.tank_mut(id) else {
                debug!(%id, "input for unknown tank dropped");
                continue;
            };
            tank.set_control_vector(input.turn, input.throttle);
            let shot = input.fire_at.and_then(|aim| tank.fire(aim));
            if let Some(projectile) = shot {
                report.spawned.push(self.arena.insert_projectile(projectile));
            }
        }
    }

    fn move_tanks(&mut self, dt: f64, mover: &mut dyn SpatialMover, report: &mut TickReport) {
        let ids: Vec<EntityId> = self.arena.tank_ids().collect();
        for id in ids {
            let Some(tank) = self.arena.tank_mut(id) else {
                continue;
            };
            if !tank.is_alive() {
                continue;
            }
            let from = tank.position();
            tank.step(dt);
            let request = MoveRequest {
                id,
                kind: EntityKind::Tank,
                from,
                to: tank.position(),
            };
            let sweep = mover.sweep(&request);
            tank.place(sweep.position);

            // A tank driving into a projectile is the projectile hitting the tank.
            if let Some(MoveEvent::Collision(Contact {
                normal,
                target: ContactTarget::Entity(other),
            })) = sweep.event
            {
                if let Some((projectile, tank)) = self.arena.projectile_and_tank_mut(other, id) {
                    let outcome = projectile.on_collision(-normal, CollisionTarget::Hittable(tank));
                    report.collisions.push(CollisionRecord {
                        projectile: other,
                        target: ContactTarget::Entity(id),
                        outcome,
                    });
                }
            }
        }
    }

    fn move_projectiles(
        &mut self,
        ids: &[EntityId],
        dt: f64,
        mover: &mut dyn SpatialMover,
        report: &mut TickReport,
    ) {
        for &id in ids {
            let Some(projectile) = self.arena.projectile_mut(id) else {
                continue;
            };
            if !projectile.is_alive() {
                continue;
            }
            let from = projectile.position();
            projectile.step(dt);
            if !projectile.is_alive() {
                continue;
            }
            let request = MoveRequest {
                id,
                kind: EntityKind::Projectile,
                from,
                to: projectile.position(),
            };
            let sweep = mover.sweep(&request);
            projectile.place(sweep.position);

            match sweep.event {
                None => {}
                Some(MoveEvent::ExitedBounds) => projectile.on_exit_bounds(),
                Some(MoveEvent::Collision(contact)) => {
                    let outcome = self.resolve_projectile_contact(id, contact);
                    report.collisions.push(CollisionRecord {
                        projectile: id,
                        target: contact.target,
                        outcome,
                    });
                }
            }
        }
    }

    fn resolve_projectile_contact(&mut self, id: EntityId, contact: Contact) -> ResolutionOutcome {
        let Contact { normal, target } = contact;
        let other = match target {
            ContactTarget::Surface => None,
            ContactTarget::Entity(other) => self.arena.kind_of(other).map(|kind| (other, kind)),
        };

        match other {
            Some((other, EntityKind::Tank)) => match self.arena.projectile_and_tank_mut(id, other) {
                Some((projectile, tank)) => projectile.on_collision(normal, CollisionTarget::Hittable(tank)),
                None => ResolutionOutcome::Ignored,
            },
            Some((other, EntityKind::Projectile)) => match self.arena.projectile_pair_mut(id, other) {
                Some((projectile, struck)) => {
                    projectile.on_collision(normal, CollisionTarget::Hittable(struck))
                }
                None => ResolutionOutcome::Ignored,
            },
            None => match self.arena.projectile_mut(id) {
                Some(projectile) => projectile.on_collision(normal, CollisionTarget::Surface),
                None => ResolutionOutcome::Ignored,
            },
        }
    }

    /// Serializable view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.arena.current_tick(),
            tanks: self
                .arena
                .tanks()
                .map(|t| TankState {
                    id: t.id(),
                    position: t.position(),
                    heading: t.heading(),
                    velocity: t.velocity(),
                    alive: t.is_alive(),
                    deaths: t.deaths(),
                })
                .collect(),
            projectiles: self
                .arena
                .projectiles()
                .map(|(id, p)| (id, p.clone()))
                .collect(),
        }
    }

    /// The arena.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable access to the arena, for hosts that spawn custom entities.
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Next tick to execute.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.arena.current_tick()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            config: SimulationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let config = SimulationConfig {
            fixed_dt: 0.0,
            ..Default::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn step_advances_tick() {
        let mut sim = Simulation::default();
        assert_eq!(sim.step_fixed(&ControlInputs::new(), &mut OpenField).tick, 0);
        assert_eq!(sim.step_fixed(&ControlInputs::new(), &mut OpenField).tick, 1);
        assert_eq!(sim.tick(), 2);
    }

    #[test]
    fn input_for_unknown_tank_is_dropped() {
        let mut sim = Simulation::default();
        let mut inputs = ControlInputs::new();
        inputs.insert(EntityId::new(42), ControlInput::drive(1.0, 1.0).firing_at(Vector2::X));
        let report = sim.step(0.1, &inputs, &mut OpenField);
        assert!(report.spawned.is_empty());
    }

    #[test]
    fn fired_projectile_waits_one_tick_to_move() {
        let mut sim = Simulation::default();
        let tank = sim.spawn_tank(Vector2::ZERO, 0.0);
        let mut inputs = ControlInputs::new();
        inputs.insert(tank, ControlInput::default().firing_at(Vector2::new(10.0, 0.0)));

        let report = sim.step(0.1, &inputs, &mut OpenField);
        let shot = report.spawned[0];
        assert!((sim.arena().projectile(shot).unwrap().position() - Vector2::new(20.0, 0.0)).length() < 1e-9);

        sim.step(0.1, &ControlInputs::new(), &mut OpenField);
        assert!((sim.arena().projectile(shot).unwrap().position() - Vector2::new(30.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn respawn_unknown_tank_is_false() {
        let mut sim = Simulation::default();
        assert!(!sim.respawn(EntityId::new(3), Vector2::ZERO, 0.0));
        assert!(sim.subscribe(EntityId::new(3), |_| {}).is_none());
    }

    #[test]
    fn snapshot_is_serializable() {
        let mut sim = Simulation::default();
        let tank = sim.spawn_tank(Vector2::new(1.0, 2.0), 0.5);
        let mut inputs = ControlInputs::new();
        inputs.insert(tank, ControlInput::drive(0.0, 1.0).firing_at(Vector2::new(50.0, 2.0)));
        sim.step_fixed(&inputs, &mut OpenField);

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.tanks.len(), 1);
        assert_eq!(snapshot.projectiles.len(), 1);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick, snapshot.tick);
        assert_eq!(back.tanks[0].id, tank);
        assert!((back.tanks[0].position - snapshot.tanks[0].position).length() < 1e-9);
        assert_eq!(back.projectiles[0].0, snapshot.projectiles[0].0);
    }
}
