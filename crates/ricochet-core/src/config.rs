//! Gameplay tuning.
//!
//! Tuning is kept separate from the entities that use it so it can be loaded
//! from a JSON document and validated once, up front. Every struct has
//! defaults that match the reference game:
//!
//! | value | default |
//! |---|---|
//! | tank move speed | 300 units/s |
//! | tank turn rate | 3.0 rad/s |
//! | muzzle spawn offset | 20 units |
//! | projectile speed | 100 units/s |
//! | projectile arming delay | 0.05 s |
//! | projectile orientation offset | pi/2 |
//! | respawn delay | 1.0 s |

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default fixed timestep (60 ticks per second).
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// How a tank interprets its turn intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    /// Only the sign of the intent matters; any non-zero input turns at the
    /// full turn rate.
    #[default]
    Discrete,
    /// The turn rate is scaled by the intent magnitude (analog stick).
    Continuous,
}

/// Tuning for a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    /// Top speed in distance units per second. Also the braking rate.
    pub move_speed: f64,
    /// Turn rate in radians per second.
    pub turn_rate: f64,
    /// Turn intent interpretation.
    pub turn_mode: TurnMode,
    /// Distance in front of the tank at which projectiles spawn.
    pub spawn_offset: f64,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            move_speed: 300.0,
            turn_rate: 3.0,
            turn_mode: TurnMode::Discrete,
            spawn_offset: 20.0,
        }
    }
}

impl TankTuning {
    /// Validates the tuning values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive move speed or a negative
    /// turn rate or spawn offset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("tank.move_speed", self.move_speed)?;
        ConfigError::require_non_negative("tank.turn_rate", self.turn_rate)?;
        ConfigError::require_non_negative("tank.spawn_offset", self.spawn_offset)
    }
}

/// Immutable descriptor used to build new projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSpec {
    /// Speed in distance units per second.
    pub speed: f64,
    /// Seconds after spawn during which collisions are ignored.
    pub arming_delay: f64,
    /// Age in seconds after which the projectile expires; `None` for never.
    pub max_lifetime: Option<f64>,
    /// Added to the velocity angle to produce the render orientation.
    ///
    /// Sprites drawn facing `-Y` need `pi/2`; sprites facing `+X` need `0`.
    pub orientation_offset: f64,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            speed: 100.0,
            arming_delay: 0.05,
            max_lifetime: None,
            orientation_offset: FRAC_PI_2,
        }
    }
}

impl ProjectileSpec {
    /// Creates a spec with the given speed and default everything else.
    #[must_use]
    pub fn with_speed(speed: f64) -> Self {
        Self {
            speed,
            ..Default::default()
        }
    }

    /// Validates the projectile template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive speed, negative arming
    /// delay, non-positive lifetime or non-finite orientation offset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_positive("projectile.speed", self.speed)?;
        ConfigError::require_non_negative("projectile.arming_delay", self.arming_delay)?;
        if let Some(lifetime) = self.max_lifetime {
            ConfigError::require_positive("projectile.max_lifetime", lifetime)?;
        }
        if !self.orientation_offset.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "projectile.orientation_offset",
                value: self.orientation_offset,
            });
        }
        Ok(())
    }
}

/// Top-level configuration for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Default tuning for spawned tanks.
    pub tank: TankTuning,
    /// Default projectile template for spawned tanks.
    pub projectile: ProjectileSpec,
    /// Timestep used by [`Simulation::step_fixed`](crate::simulation::Simulation::step_fixed).
    pub fixed_dt: f64,
    /// Seconds between a death and the scheduled reset.
    pub respawn_delay: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tank: TankTuning::default(),
            projectile: ProjectileSpec::default(),
            fixed_dt: FIXED_DT,
            respawn_delay: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// error for out-of-range values.
    ///
    /// # Example
    ///
    /// ```
    /// use ricochet_core::config::SimulationConfig;
    ///
    /// let config = SimulationConfig::from_json_str(r#"{"tank": {"move_speed": 120.0}}"#).unwrap();
    /// assert_eq!(config.tank.move_speed, 120.0);
    /// assert_eq!(config.tank.turn_rate, 3.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tank.validate()?;
        self.projectile.validate()?;
        ConfigError::require_positive("fixed_dt", self.fixed_dt)?;
        ConfigError::require_non_negative("respawn_delay", self.respawn_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn default_values() {
        let tuning = TankTuning::default();
        assert_eq!(tuning.move_speed, 300.0);
        assert_eq!(tuning.turn_rate, 3.0);
        assert_eq!(tuning.spawn_offset, 20.0);
        assert_eq!(tuning.turn_mode, TurnMode::Discrete);
        assert_eq!(ProjectileSpec::default().speed, 100.0);
    }

    #[test]
    fn rejects_zero_move_speed() {
        let tuning = TankTuning {
            move_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NotPositive {
                field: "tank.move_speed",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_arming_delay() {
        let spec = ProjectileSpec {
            arming_delay: -1.0,
            ..Default::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn rejects_zero_lifetime() {
        let spec = ProjectileSpec {
            max_lifetime: Some(0.0),
            ..Default::default()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn json_partial_document_uses_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{"projectile": {"speed": 250.0, "max_lifetime": 2.0}, "tank": {"turn_mode": "continuous"}}"#,
        )
        .unwrap();
        assert_eq!(config.projectile.speed, 250.0);
        assert_eq!(config.projectile.max_lifetime, Some(2.0));
        assert_eq!(config.tank.turn_mode, TurnMode::Continuous);
        assert_eq!(config.tank.move_speed, 300.0);
        assert!((config.fixed_dt - FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn json_invalid_values_rejected() {
        let err = SimulationConfig::from_json_str(r#"{"fixed_dt": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { field: "fixed_dt", .. }));
    }

    #[test]
    fn json_malformed_rejected() {
        let err = SimulationConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back = SimulationConfig::from_json_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
