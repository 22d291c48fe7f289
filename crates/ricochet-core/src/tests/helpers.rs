//! Test helper functions for setting up simulations and entities.
//!
//! This module provides factory functions and two [`SpatialMover`]s that
//! stand in for the host's collision system:
//!
//! - [`ScriptedMover`]: passes every move through and injects events queued
//!   per entity, for precise scenario control
//! - [`WallBox`]: a square room centred on the origin; tanks are clipped at
//!   the walls and projectiles bounce off them

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config::{ProjectileSpec, SimulationConfig};
use crate::entity::EntityId;
use crate::math::Vector2;
use crate::signal::CombatSignal;
use crate::simulation::{
    Contact, ContactTarget, MoveEvent, MoveReport, MoveRequest, Simulation, SpatialMover,
};

// =============================================================================
// Factories
// =============================================================================

/// Projectile spec that arms immediately.
pub fn armed_spec(speed: f64) -> ProjectileSpec {
    ProjectileSpec {
        speed,
        arming_delay: 0.0,
        ..Default::default()
    }
}

/// Simulation whose tanks fire projectiles with the given spec.
pub fn simulation_with(projectile: ProjectileSpec) -> Simulation {
    Simulation::new(SimulationConfig {
        projectile,
        ..Default::default()
    })
    .expect("test config is valid")
}

/// Sets up two tanks facing each other along the X axis, `distance` apart.
///
/// # Returns
///
/// A tuple of (`shooter_id`, `target_id`).
pub fn setup_duel(sim: &mut Simulation, distance: f64) -> (EntityId, EntityId) {
    let shooter = sim.spawn_tank(Vector2::ZERO, 0.0);
    let target = sim.spawn_tank(Vector2::new(distance, 0.0), 0.0);
    (shooter, target)
}

/// Subscribes a recording listener to `tank` and returns its log.
pub fn death_log(sim: &mut Simulation, tank: EntityId) -> Arc<Mutex<Vec<CombatSignal>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    sim.subscribe(tank, move |signal| sink.lock().unwrap().push(*signal))
        .expect("tank exists");
    log
}

// =============================================================================
// Movers
// =============================================================================

/// Passes moves through unchanged, injecting queued events.
#[derive(Debug, Default)]
pub struct ScriptedMover {
    scripted: HashMap<EntityId, VecDeque<MoveEvent>>,
    /// Every request seen, in order.
    pub requests: Vec<MoveRequest>,
}

impl ScriptedMover {
    /// Queues `event` for the next sweep of `id`.
    pub fn push(&mut self, id: EntityId, event: MoveEvent) {
        self.scripted.entry(id).or_default().push_back(event);
    }

    /// Queues a collision for the next sweep of `id`.
    pub fn push_collision(&mut self, id: EntityId, normal: Vector2, target: ContactTarget) {
        self.push(id, MoveEvent::Collision(Contact { normal, target }));
    }
}

impl SpatialMover for ScriptedMover {
    fn sweep(&mut self, request: &MoveRequest) -> MoveReport {
        self.requests.push(*request);
        let event = self
            .scripted
            .get_mut(&request.id)
            .and_then(VecDeque::pop_front);
        MoveReport {
            position: request.to,
            event,
        }
    }
}

/// Square room of half-size `half_extent` centred on the origin.
#[derive(Debug, Clone, Copy)]
pub struct WallBox {
    /// Distance from the origin to each wall.
    pub half_extent: f64,
}

impl SpatialMover for WallBox {
    fn sweep(&mut self, request: &MoveRequest) -> MoveReport {
        let h = self.half_extent;
        let to = request.to;
        let clamped = Vector2::new(to.x.clamp(-h, h), to.y.clamp(-h, h));
        if clamped == to {
            return MoveReport::clear(to);
        }

        let normal = if to.x > h {
            Vector2::NEG_X
        } else if to.x < -h {
            Vector2::X
        } else if to.y > h {
            Vector2::NEG_Y
        } else {
            Vector2::Y
        };
        MoveReport::collision(clamped, normal, ContactTarget::Surface)
    }
}
