//! Projectiles: constant-speed shots that ricochet off terrain.
//!
//! A projectile is created by [`Tank::fire`](crate::tank::Tank::fire) and then
//! owned by the host world. Each tick the host calls [`Projectile::step`],
//! lets its spatial system sweep the proposed move, and reports at most one
//! collision through [`Projectile::on_collision`].
//!
//! # Arming
//!
//! For `arming_delay` seconds after spawn the projectile ignores collisions,
//! so it cannot hit the tank that fired it. A delay of zero arms it at spawn.
//!
//! # Lifetime
//!
//! A projectile leaves play when it hits something with a hit capability,
//! when it is itself hit, when the host reports it left the playable bounds,
//! or when it outlives `max_lifetime`. Leaving play only clears the `alive`
//! flag; removing it from the world is the host's job.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ProjectileSpec;
use crate::entity::EntityId;
use crate::math::{angle_of, try_normalize, wrap_angle, Vector2};
use crate::resolver::{Collidable, CollisionResolver, CollisionTarget, HitTarget, ResolutionOutcome};

/// An in-flight projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    owner: Option<EntityId>,
    position: Vector2,
    velocity: Vector2,
    orientation: f64,
    spec: ProjectileSpec,
    age: f64,
    armed: bool,
    alive: bool,
}

impl Projectile {
    /// Creates a projectile at `position` travelling along `direction` at
    /// `spec.speed`. `direction` need not be unit length.
    ///
    /// `owner` is the tank that fired it, if any. Returns `None` for a zero
    /// or non-finite direction, or a spec that fails
    /// [`ProjectileSpec::validate`].
    #[must_use]
    pub fn spawn(
        owner: Option<EntityId>,
        position: Vector2,
        direction: Vector2,
        spec: ProjectileSpec,
    ) -> Option<Self> {
        let Some(direction) = try_normalize(direction) else {
            debug!(?direction, "projectile spawn with degenerate direction refused");
            return None;
        };
        if let Err(err) = spec.validate() {
            debug!(%err, "projectile spawn with invalid spec refused");
            return None;
        }
        let velocity = direction * spec.speed;
        Some(Self {
            owner,
            position,
            velocity,
            orientation: wrap_angle(angle_of(direction) + spec.orientation_offset),
            spec,
            age: 0.0,
            armed: spec.arming_delay <= 0.0,
            alive: true,
        })
    }

    /// Advances the projectile by `dt` seconds.
    ///
    /// Updates the arming timer and lifetime and moves the projectile along
    /// its velocity. The host's spatial system may then correct the position
    /// with [`place`](Self::place). A dead projectile or a non-positive `dt`
    /// does nothing.
    pub fn step(&mut self, dt: f64) {
        if !self.alive || !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        self.age += dt;
        if !self.armed && self.age >= self.spec.arming_delay {
            self.armed = true;
            trace!(age = self.age, "projectile armed");
        }
        if let Some(lifetime) = self.spec.max_lifetime {
            if self.age >= lifetime {
                self.alive = false;
                debug!(age = self.age, "projectile expired");
                return;
            }
        }

        self.position += self.velocity * dt;
    }

    /// Displacement the projectile proposes for a tick of length `dt`.
    #[must_use]
    pub fn proposed_displacement(&self, dt: f64) -> Vector2 {
        if self.alive {
            self.velocity * dt
        } else {
            Vector2::ZERO
        }
    }

    /// Writes back the position decided by the host's spatial system.
    pub fn place(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Responds to a collision reported by the host.
    ///
    /// See [`CollisionResolver`] for the rules. After a bounce the render
    /// orientation follows the new direction of travel.
    pub fn on_collision(&mut self, normal: Vector2, target: CollisionTarget<'_>) -> ResolutionOutcome {
        CollisionResolver::resolve(self, normal, target)
    }

    /// Marks the projectile dead after it left the playable bounds.
    pub fn on_exit_bounds(&mut self) {
        if self.alive {
            debug!(position = ?self.position, "projectile left bounds");
        }
        self.alive = false;
    }

    /// The tank that fired this projectile, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Current velocity. Its length is always `spec().speed`.
    #[must_use]
    pub const fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Render orientation: velocity angle plus `ProjectileSpec::orientation_offset`.
    #[must_use]
    pub const fn orientation(&self) -> f64 {
        self.orientation
    }

    /// The template this projectile was built from.
    #[must_use]
    pub const fn spec(&self) -> &ProjectileSpec {
        &self.spec
    }

    /// Seconds since spawn.
    #[must_use]
    pub const fn age(&self) -> f64 {
        self.age
    }

    /// Whether collisions are being processed yet.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the projectile is still in play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Collidable for Projectile {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn velocity(&self) -> Vector2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector2) {
        self.velocity = velocity;
        self.orientation = wrap_angle(angle_of(velocity) + self.spec.orientation_offset);
    }

    fn consume(&mut self) {
        self.alive = false;
    }
}

/// A projectile struck by another projectile is consumed.
impl HitTarget for Projectile {
    fn on_hit(&mut self) {
        if self.alive {
            debug!(owner = ?self.owner, "projectile shot down");
        }
        self.alive = false;
    }
}
