//! Cross-module tests.
//!
//! - `integration.rs`: end-to-end scenarios through the driver loop
//! - `determinism.rs`: replaying the same seeded input script gives the same world
//! - `properties.rs`: proptest properties of damping, reflection and signals
//! - `helpers.rs`: factories and a scripted spatial mover

mod helpers;
mod properties;
