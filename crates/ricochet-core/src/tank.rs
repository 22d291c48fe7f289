//! Tanks: mobile entities that turn, drive and fire.
//!
//! A tank turns control intent into motion. The host sets intent with
//! [`Tank::set_control_vector`] and advances time with [`Tank::step`]; the
//! tank proposes a velocity and moves itself along it, and the host's
//! spatial system may clip the result with [`Tank::place`].
//!
//! # Motion Model
//!
//! - Heading turns at `turn_rate` while the turn intent is non-zero (see
//!   [`TurnMode`]) and always stays in `(-pi, pi]`.
//! - With throttle, velocity is `heading_vector * throttle * move_speed`.
//! - Without throttle, each velocity axis brakes linearly toward zero at
//!   `move_speed` units/s, reaching exactly zero without overshooting.
//!
//! # Death
//!
//! [`Tank::on_hit`] kills the tank and fires one
//! [`CombatSignal`](crate::signal::CombatSignal). A dead tank ignores all
//! input until the host calls [`Tank::reset`] between ticks.
//!
//! # Example
//!
//! ```
//! use ricochet_core::config::{ProjectileSpec, TankTuning};
//! use ricochet_core::entity::EntityId;
//! use ricochet_core::math::Vector2;
//! use ricochet_core::tank::Tank;
//!
//! let mut tank = Tank::new(
//!     EntityId::new(1),
//!     Vector2::ZERO,
//!     0.0,
//!     TankTuning::default(),
//!     Some(ProjectileSpec::default()),
//! )
//! .unwrap();
//! tank.set_control_vector(0.0, 1.0);
//! tank.step(1.0);
//! assert!((tank.position() - Vector2::new(0.0, 300.0)).length() < 1e-9);
//!
//! let shot = tank.fire(Vector2::new(100.0, 300.0)).unwrap();
//! assert!((shot.position() - Vector2::new(20.0, 300.0)).length() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{ProjectileSpec, TankTuning, TurnMode};
use crate::entity::EntityId;
use crate::error::{ConfigError, FireError};
use crate::math::{
    clamp_unit, heading_vector, move_toward_vec, sign, try_normalize, wrap_angle, Vector2,
};
use crate::projectile::Projectile;
use crate::resolver::HitTarget;
use crate::signal::{CombatSignal, Lifecycle, ListenerId};

/// Latest control intent of a tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlVector {
    /// Turn intent in `[-1, 1]`; positive turns counter-clockwise.
    pub turn: f64,
    /// Throttle in `[-1, 1]`; positive drives forward.
    pub throttle: f64,
}

/// A mobile combat entity.
#[derive(Debug)]
pub struct Tank {
    id: EntityId,
    position: Vector2,
    heading: f64,
    velocity: Vector2,
    tuning: TankTuning,
    control: ControlVector,
    aim_target: Option<Vector2>,
    projectile_template: Option<ProjectileSpec>,
    lifecycle: Lifecycle,
}

impl Tank {
    /// Creates a live, stationary tank.
    ///
    /// `heading` is wrapped into `(-pi, pi]`. A tank without a projectile
    /// template drives normally but cannot fire.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `tuning` or `projectile_template` fails
    /// validation.
    pub fn new(
        id: EntityId,
        position: Vector2,
        heading: f64,
        tuning: TankTuning,
        projectile_template: Option<ProjectileSpec>,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        if let Some(spec) = &projectile_template {
            spec.validate()?;
        }
        Ok(Self::assemble(id, position, heading, tuning, projectile_template))
    }

    /// Builds a tank from tuning that was already validated, for instance as
    /// part of a [`SimulationConfig`](crate::config::SimulationConfig).
    pub(crate) fn assemble(
        id: EntityId,
        position: Vector2,
        heading: f64,
        tuning: TankTuning,
        projectile_template: Option<ProjectileSpec>,
    ) -> Self {
        Self {
            id,
            position,
            heading: wrap_angle(heading),
            velocity: Vector2::ZERO,
            tuning,
            control: ControlVector::default(),
            aim_target: None,
            projectile_template,
            lifecycle: Lifecycle::new(id),
        }
    }

    /// Stores the latest control intent. Values are clamped into `[-1, 1]`
    /// (NaN becomes `0`). Nothing moves until the next [`step`](Self::step).
    ///
    /// Ignored while the tank is dead.
    pub fn set_control_vector(&mut self, turn: f64, throttle: f64) {
        if !self.is_alive() {
            return;
        }
        self.control = ControlVector {
            turn: clamp_unit(turn),
            throttle: clamp_unit(throttle),
        };
    }

    /// Advances the tank by `dt` seconds: turn, update velocity, move.
    ///
    /// Does nothing while dead or for a non-positive or non-finite `dt`.
    pub fn step(&mut self, dt: f64) {
        if !self.is_alive() || !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        let ControlVector { turn, throttle } = self.control;

        if turn != 0.0 {
            let rate = match self.tuning.turn_mode {
                TurnMode::Discrete => sign(turn),
                TurnMode::Continuous => turn,
            };
            self.heading = wrap_angle(self.heading + rate * self.tuning.turn_rate * dt);
        }

        self.velocity = if throttle == 0.0 {
            move_toward_vec(self.velocity, Vector2::ZERO, self.tuning.move_speed * dt)
        } else {
            heading_vector(self.heading) * throttle * self.tuning.move_speed
        };

        self.position += self.velocity * dt;
        trace!(id = %self.id, position = ?self.position, heading = self.heading, "tank step");
    }

    /// Writes back the position decided by the host's spatial system.
    pub fn place(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Fires toward `aim_point`, returning the new projectile.
    ///
    /// The projectile spawns `spawn_offset` units from the tank along the
    /// aim direction and travels at the template speed. The tank keeps no
    /// reference to it.
    ///
    /// # Errors
    ///
    /// - [`FireError::Dead`] while the tank is dead
    /// - [`FireError::MissingTemplate`] without a projectile template
    /// - [`FireError::DegenerateAim`] when `aim_point` is the tank position
    pub fn try_fire(&mut self, aim_point: Vector2) -> Result<Projectile, FireError> {
        if !self.is_alive() {
            return Err(FireError::Dead);
        }
        let spec = self.projectile_template.ok_or(FireError::MissingTemplate)?;
        let direction = try_normalize(aim_point - self.position).ok_or(FireError::DegenerateAim)?;

        self.aim_target = Some(aim_point);
        let muzzle = self.position + direction * self.tuning.spawn_offset;
        debug!(id = %self.id, ?muzzle, ?direction, "fired");
        Projectile::spawn(Some(self.id), muzzle, direction, spec).ok_or(FireError::DegenerateAim)
    }

    /// Fires toward `aim_point`, or returns `None` if the tank cannot fire.
    ///
    /// Failures are logged and otherwise silent; see [`try_fire`](Self::try_fire).
    pub fn fire(&mut self, aim_point: Vector2) -> Option<Projectile> {
        match self.try_fire(aim_point) {
            Ok(projectile) => Some(projectile),
            Err(FireError::MissingTemplate) => {
                warn!(id = %self.id, "fire requested without a projectile template");
                None
            }
            Err(err) => {
                debug!(id = %self.id, %err, "fire ignored");
                None
            }
        }
    }

    /// Kills the tank and fires one [`CombatSignal`]. A second hit while
    /// dead does nothing.
    pub fn on_hit(&mut self) {
        if self.lifecycle.kill() {
            self.velocity = Vector2::ZERO;
            debug!(id = %self.id, "tank destroyed");
        }
    }

    /// Revives the tank at `position` facing `heading`, stationary and with
    /// no control intent.
    ///
    /// Only the host calls this, between ticks.
    pub fn reset(&mut self, position: Vector2, heading: f64) {
        self.position = position;
        self.heading = wrap_angle(heading);
        self.velocity = Vector2::ZERO;
        self.control = ControlVector::default();
        self.aim_target = None;
        self.lifecycle.revive();
        debug!(id = %self.id, ?position, "tank reset");
    }

    /// Registers a death listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CombatSignal) + Send + 'static,
    {
        self.lifecycle.subscribe(listener)
    }

    /// Removes a death listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.lifecycle.unsubscribe(id)
    }

    /// Changes the top speed, clamping the current velocity to it.
    ///
    /// Non-positive or non-finite speeds are ignored.
    pub fn set_move_speed(&mut self, move_speed: f64) {
        if !(move_speed > 0.0 && move_speed.is_finite()) {
            warn!(id = %self.id, move_speed, "invalid move speed ignored");
            return;
        }
        self.tuning.move_speed = move_speed;
        self.velocity = self.velocity.clamp_length_max(move_speed);
    }

    /// Replaces the projectile template; `None` disarms the tank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `template` fails validation. The previous
    /// template stays in place.
    pub fn set_projectile_template(&mut self, template: Option<ProjectileSpec>) -> Result<(), ConfigError> {
        if let Some(spec) = &template {
            if let Err(err) = spec.validate() {
                warn!(id = %self.id, %err, "invalid projectile template ignored");
                return Err(err);
            }
        }
        self.projectile_template = template;
        Ok(())
    }

    /// Identity of this tank.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Heading in `(-pi, pi]`; `0` faces `+Y`.
    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Velocity derived in the last step.
    #[must_use]
    pub const fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Latest control intent.
    #[must_use]
    pub const fn control(&self) -> ControlVector {
        self.control
    }

    /// Point of the last successful fire, cleared on reset.
    #[must_use]
    pub const fn aim_target(&self) -> Option<Vector2> {
        self.aim_target
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn tuning(&self) -> &TankTuning {
        &self.tuning
    }

    /// Projectile template, if any.
    #[must_use]
    pub const fn projectile_template(&self) -> Option<&ProjectileSpec> {
        self.projectile_template.as_ref()
    }

    /// Whether the tank is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.lifecycle.is_alive()
    }

    /// Number of times this tank has died.
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.lifecycle.deaths()
    }
}

impl HitTarget for Tank {
    fn on_hit(&mut self) {
        Tank::on_hit(self);
    }
}
