//! Entity identity for tanks and projectiles.
//!
//! - [`EntityId`]: Unique identifier for entities, allocated by the arena
//! - [`EntityKind`]: Which collection of the arena an entity lives in
//!
//! # Example
//!
//! ```
//! use ricochet_core::entity::EntityId;
//!
//! let id1 = EntityId::new(1);
//! let id2 = EntityId::new(2);
//!
//! assert!(id1 < id2);
//! assert_eq!(id1.as_u64(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. IDs are immutable once
/// assigned and unique within an arena; tanks and projectiles share one ID
/// space so a [`CombatSignal`](crate::signal::CombatSignal) victim is never
/// ambiguous.
///
/// # Ordering
///
/// IDs are ordered by their numeric value, which the arena uses for
/// deterministic iteration.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Kind of simulated entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Player- or host-controlled mobile entity.
    Tank,
    /// In-flight shot fired by a tank.
    Projectile,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tank => write!(f, "Tank"),
            Self::Projectile => write!(f, "Projectile"),
        }
    }
}
