//! # Ricochet Core
//!
//! Real-time movement and combat simulation for a top-down tank game.
//!
//! Tanks turn, drive and fire; projectiles fly at constant speed, ricochet
//! off terrain and destroy whatever they hit that can be hit. The crate owns
//! the numerical and state-machine logic only. Rendering, input devices,
//! scene management and collision *detection* belong to the host, which
//! talks to the core through a narrow boundary:
//!
//! - the host clock calls [`Simulation::step`] (or steps entities directly)
//! - the host input layer supplies [`ControlInput`]s
//! - the host spatial system implements [`SpatialMover`]
//! - the host UI subscribes to [`CombatSignal`]s and calls
//!   [`Simulation::respawn`], optionally through a [`RespawnQueue`]
//!
//! ## Modules
//!
//! - [`math`]: vector helpers on `glam::DVec2`
//! - [`tank`]: the mobile entity
//! - [`projectile`]: shots and their arming/lifetime rules
//! - [`resolver`]: reflection and hit dispatch
//! - [`signal`]: death notification and lifecycle
//! - [`arena`] and [`simulation`]: the driver loop
//!
//! ## Usage
//!
//! ```
//! use ricochet_core::{ControlInput, ControlInputs, OpenField, Simulation, Vector2};
//!
//! let mut sim = Simulation::default();
//! let red = sim.spawn_tank(Vector2::new(0.0, 0.0), 0.0);
//! let blue = sim.spawn_tank(Vector2::new(0.0, 200.0), 0.0);
//!
//! let mut inputs = ControlInputs::new();
//! inputs.insert(red, ControlInput::drive(0.0, 0.0).firing_at(Vector2::new(0.0, 200.0)));
//! let report = sim.step_fixed(&inputs, &mut OpenField);
//! assert_eq!(report.spawned.len(), 1);
//! # let _ = blue;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod math;
pub mod projectile;
pub mod resolver;
pub mod respawn;
pub mod signal;
pub mod simulation;
pub mod tank;

pub use arena::Arena;
pub use config::{ProjectileSpec, SimulationConfig, TankTuning, TurnMode};
pub use entity::{EntityId, EntityKind};
pub use error::{ConfigError, FireError};
pub use math::Vector2;
pub use projectile::Projectile;
pub use resolver::{CollisionResolver, CollisionTarget, HitTarget, ResolutionOutcome};
pub use respawn::RespawnQueue;
pub use signal::{CombatSignal, Lifecycle, SignalChannel};
pub use simulation::{
    ControlInput, ControlInputs, MoveReport, MoveRequest, OpenField, Simulation, SpatialMover,
    TickReport,
};
pub use tank::Tank;

#[cfg(test)]
mod tests;
