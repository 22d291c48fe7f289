//! Delayed respawn scheduling for hosts.
//!
//! A death fires a [`CombatSignal`]; the game waits a moment and then puts
//! the tank back. The wait is host-side state, not something the simulation
//! suspends on: the host feeds signals into a [`RespawnQueue`], advances it
//! with simulated time between ticks, and calls
//! [`Simulation::respawn`](crate::simulation::Simulation::respawn) for every
//! tank it hands back.
//!
//! # Example
//!
//! ```
//! use ricochet_core::entity::EntityId;
//! use ricochet_core::respawn::RespawnQueue;
//! use ricochet_core::signal::CombatSignal;
//!
//! let mut queue = RespawnQueue::new(1.0);
//! queue.schedule(&CombatSignal { victim: EntityId::new(3) });
//!
//! assert!(queue.advance(0.5).is_empty());
//! assert_eq!(queue.advance(0.5), vec![EntityId::new(3)]);
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::entity::EntityId;
use crate::signal::CombatSignal;

/// Pending respawns keyed by victim, measured in simulated seconds.
#[derive(Debug, Clone, Default)]
pub struct RespawnQueue {
    delay: f64,
    clock: f64,
    pending: BTreeMap<EntityId, f64>,
}

impl RespawnQueue {
    /// Creates a queue that releases victims `delay` seconds after death.
    ///
    /// Negative or non-finite delays are treated as zero.
    #[must_use]
    pub fn new(delay: f64) -> Self {
        Self {
            delay: if delay.is_finite() { delay.max(0.0) } else { 0.0 },
            clock: 0.0,
            pending: BTreeMap::new(),
        }
    }

    /// Schedules a respawn for the signal's victim.
    ///
    /// A victim that is already pending keeps its original due time.
    pub fn schedule(&mut self, signal: &CombatSignal) {
        let due = self.clock + self.delay;
        self.pending.entry(signal.victim).or_insert_with(|| {
            debug!(victim = %signal.victim, due, "respawn scheduled");
            due
        });
    }

    /// Schedules every signal in `signals`.
    pub fn schedule_all<'a>(&mut self, signals: impl IntoIterator<Item = &'a CombatSignal>) {
        for signal in signals {
            self.schedule(signal);
        }
    }

    /// Advances the queue clock by `dt` and returns the victims now due, in
    /// ID order. Returned victims are no longer pending.
    pub fn advance(&mut self, dt: f64) -> Vec<EntityId> {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        let clock = self.clock;
        let due: Vec<EntityId> = self
            .pending
            .iter()
            .filter(|(_, due)| **due <= clock)
            .map(|(id, _)| *id)
            .collect();
        for id in &due {
            self.pending.remove(id);
        }
        due
    }

    /// Drops a pending respawn. Returns `false` if it was not pending.
    pub fn cancel(&mut self, victim: EntityId) -> bool {
        self.pending.remove(&victim).is_some()
    }

    /// Whether `victim` is waiting to respawn.
    #[must_use]
    pub fn is_pending(&self, victim: EntityId) -> bool {
        self.pending.contains_key(&victim)
    }

    /// Number of pending respawns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Configured delay in seconds.
    #[must_use]
    pub const fn delay(&self) -> f64 {
        self.delay
    }
}
