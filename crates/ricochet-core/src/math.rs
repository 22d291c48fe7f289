//! 2D vector helpers for the simulation.
//!
//! The simulation works in `f64` throughout, so [`Vector2`] is an alias for
//! [`glam::DVec2`]. glam already covers addition, subtraction, scaling and
//! magnitude; this module adds the operations whose edge cases the simulation
//! cares about:
//!
//! - [`try_normalize`]: returns `None` for zero-length or non-finite input
//!   instead of producing NaN
//! - [`reflect`]: elastic reflection about a unit normal
//! - [`move_toward`] / [`move_toward_vec`]: linear damping that never overshoots
//! - [`wrap_angle`]: normalizes angles into `(-pi, pi]`
//!
//! # Heading Convention
//!
//! A heading of `0.0` faces `+Y`. Positive headings rotate counter-clockwise,
//! so a heading of `pi/2` faces `-X`. [`heading_vector`] and [`heading_of`]
//! convert between the two representations.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Two-dimensional `f64` vector used for positions, velocities and normals.
pub type Vector2 = DVec2;

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_EPSILON_SQ: f64 = 1e-18;

/// Returns the unit vector in the direction of `v`, or `None` when `v` has
/// (near) zero length or contains non-finite components.
///
/// # Example
///
/// ```
/// use ricochet_core::math::{try_normalize, Vector2};
///
/// assert_eq!(try_normalize(Vector2::new(3.0, 0.0)), Some(Vector2::X));
/// assert_eq!(try_normalize(Vector2::ZERO), None);
/// ```
#[must_use]
pub fn try_normalize(v: Vector2) -> Option<Vector2> {
    let len_sq = v.length_squared();
    if !len_sq.is_finite() || len_sq <= DEGENERATE_EPSILON_SQ {
        return None;
    }
    Some(v / len_sq.sqrt())
}

/// Angle of `v` measured from `+X` (atan2 convention), in radians.
#[must_use]
pub fn angle_of(v: Vector2) -> f64 {
    v.y.atan2(v.x)
}

/// Rotates `v` counter-clockwise by `angle` radians.
#[must_use]
pub fn rotated(v: Vector2, angle: f64) -> Vector2 {
    let (sin, cos) = angle.sin_cos();
    Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Reflects `v` about the unit normal `normal`: `v - 2 (v . n) n`.
///
/// `normal` must already be unit length; callers that receive normals from
/// an external source should pass them through [`try_normalize`] first.
#[must_use]
pub fn reflect(v: Vector2, normal: Vector2) -> Vector2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Moves `current` toward `target` by at most `max_delta`, never overshooting.
///
/// # Example
///
/// ```
/// use ricochet_core::math::move_toward;
///
/// assert_eq!(move_toward(10.0, 0.0, 4.0), 6.0);
/// assert_eq!(move_toward(3.0, 0.0, 4.0), 0.0);
/// assert_eq!(move_toward(-3.0, 0.0, 1.0), -2.0);
/// ```
#[must_use]
pub fn move_toward(current: f64, target: f64, max_delta: f64) -> f64 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Applies [`move_toward`] to each axis independently.
#[must_use]
pub fn move_toward_vec(current: Vector2, target: Vector2, max_delta: f64) -> Vector2 {
    Vector2::new(
        move_toward(current.x, target.x, max_delta),
        move_toward(current.y, target.y, max_delta),
    )
}

/// Wraps an angle into the half-open range `(-pi, pi]`.
///
/// Non-finite input wraps to `0.0`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Unit forward vector for a heading (heading `0` faces `+Y`).
#[must_use]
pub fn heading_vector(heading: f64) -> Vector2 {
    let (sin, cos) = heading.sin_cos();
    Vector2::new(-sin, cos)
}

/// Heading that faces along `direction`; inverse of [`heading_vector`].
#[must_use]
pub fn heading_of(direction: Vector2) -> f64 {
    wrap_angle((-direction.x).atan2(direction.y))
}

/// Returns `-1`, `0` or `1` according to the sign of `value`. NaN maps to `0`.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamps a control intent into `[-1, 1]`; NaN becomes `0`.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}
