//! Error types.
//!
//! Nothing in the simulation core is fatal. Gameplay-level failures (firing
//! while dead, aiming at yourself) are reported as [`FireError`] values that
//! the non-fallible APIs turn into a logged no-op. [`ConfigError`] is the
//! only error a host is expected to surface, when loading tuning values.

use thiserror::Error;

/// Reasons a tank could not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FireError {
    /// The tank is dead and ignores input until it is reset.
    #[error("tank is dead")]
    Dead,
    /// The tank has no projectile template to build shots from.
    #[error("tank has no projectile template")]
    MissingTemplate,
    /// The aim point coincides with the tank position, so there is no direction.
    #[error("aim point coincides with tank position")]
    DegenerateAim,
}

/// Tuning values rejected by validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive and finite was not.
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A value that must be zero or greater and finite was not.
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A value that must be finite was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Checks that `value` is strictly positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] otherwise.
    pub fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::NotPositive { field, value })
        }
    }

    /// Checks that `value` is zero or positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Negative`] otherwise.
    pub fn require_non_negative(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { field, value })
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
