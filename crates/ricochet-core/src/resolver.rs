//! Collision response: reflection and hit dispatch.
//!
//! The [`CollisionResolver`] turns a collision reported by the host's
//! spatial system into a state change on the moving body. It owns no state;
//! the same rules apply to anything implementing [`Collidable`].
//!
//! # Rules
//!
//! 1. A dead or unarmed body ignores the collision entirely
//!    ([`ResolutionOutcome::Ignored`]).
//! 2. A zero-length or non-finite normal is degenerate input: nothing is
//!    reflected and nothing is hit (`Ignored`).
//! 3. Otherwise the velocity is reflected about the (re-normalized) contact
//!    normal, preserving speed.
//! 4. If the target has a hit capability, it is hit and the body is consumed
//!    ([`ResolutionOutcome::Destroyed`]); plain surfaces leave the body
//!    bouncing ([`ResolutionOutcome::Bounced`]).
//!
//! Destruction depends on the capability of what was struck, not on its
//! type: anything implementing [`HitTarget`] consumes the projectile.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::math::{reflect, try_normalize, Vector2};

/// Tolerance on the length of externally supplied normals before a warning.
const NORMAL_TOLERANCE: f64 = 1e-6;

/// Capability of a world object to receive damage.
pub trait HitTarget {
    /// Notifies the object that it was struck.
    fn on_hit(&mut self);
}

/// The other side of a reported collision.
pub enum CollisionTarget<'a> {
    /// Terrain or any object without a hit capability.
    Surface,
    /// An object that can be hit.
    Hittable(&'a mut dyn HitTarget),
}

impl CollisionTarget<'_> {
    /// Whether the target exposes a hit capability.
    #[must_use]
    pub fn is_hittable(&self) -> bool {
        matches!(self, Self::Hittable(_))
    }
}

impl std::fmt::Debug for CollisionTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surface => write!(f, "Surface"),
            Self::Hittable(_) => write!(f, "Hittable"),
        }
    }
}

/// A moving body that the resolver can bounce and consume.
pub trait Collidable {
    /// Whether the body is still in play.
    fn is_alive(&self) -> bool;
    /// Whether the body reacts to collisions yet.
    fn is_armed(&self) -> bool;
    /// Current velocity.
    fn velocity(&self) -> Vector2;
    /// Replaces the velocity after a bounce.
    fn set_velocity(&mut self, velocity: Vector2);
    /// Removes the body from play after a damaging hit.
    fn consume(&mut self);
}

/// Result of resolving one collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// Nothing changed: the body was unarmed or dead, or the normal was degenerate.
    Ignored,
    /// The velocity was reflected and the body is still in play.
    Bounced,
    /// The target was hit and the body was consumed.
    Destroyed,
}

/// Stateless collision response.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Resolves a collision of `subject` against `target` with the given
    /// contact normal. See the module docs for the rules.
    ///
    /// # Example
    ///
    /// ```
    /// use ricochet_core::config::ProjectileSpec;
    /// use ricochet_core::math::Vector2;
    /// use ricochet_core::projectile::Projectile;
    /// use ricochet_core::resolver::{CollisionResolver, CollisionTarget, ResolutionOutcome};
    ///
    /// let spec = ProjectileSpec { arming_delay: 0.0, ..ProjectileSpec::with_speed(100.0) };
    /// let mut shot = Projectile::spawn(None, Vector2::ZERO, Vector2::X, spec).unwrap();
    ///
    /// let outcome = CollisionResolver::resolve(&mut shot, Vector2::NEG_X, CollisionTarget::Surface);
    /// assert_eq!(outcome, ResolutionOutcome::Bounced);
    /// assert!((shot.velocity() - Vector2::new(-100.0, 0.0)).length() < 1e-9);
    /// ```
    pub fn resolve<C>(subject: &mut C, normal: Vector2, target: CollisionTarget<'_>) -> ResolutionOutcome
    where
        C: Collidable + ?Sized,
    {
        if !subject.is_alive() || !subject.is_armed() {
            return ResolutionOutcome::Ignored;
        }

        let Some(unit_normal) = try_normalize(normal) else {
            debug!(?normal, "degenerate contact normal, collision ignored");
            return ResolutionOutcome::Ignored;
        };
        if (normal.length() - 1.0).abs() > NORMAL_TOLERANCE {
            warn!(?normal, "non-unit contact normal re-normalized");
        }

        let incoming = subject.velocity();
        subject.set_velocity(reflect(incoming, unit_normal));

        match target {
            CollisionTarget::Surface => {
                debug!(?incoming, outgoing = ?subject.velocity(), "bounced");
                ResolutionOutcome::Bounced
            }
            CollisionTarget::Hittable(hit) => {
                hit.on_hit();
                subject.consume();
                debug!("target hit, projectile consumed");
                ResolutionOutcome::Destroyed
            }
        }
    }
}
