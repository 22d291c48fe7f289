//! Death notification: [`CombatSignal`], its broadcast [`SignalChannel`] and
//! the [`Lifecycle`] state machine that fires it.
//!
//! # Delivery
//!
//! A signal is fired exactly once per alive-to-dead transition. Delivery is
//! synchronous: every listener registered at the time of the transition has
//! run before the call that caused the death returns, so all of them observe
//! it within the same tick. Listeners receive the signal by shared reference
//! and have no access to the entity that died, so they cannot re-enter it;
//! a listener that wants to revive the entity records the victim and lets the
//! host call `reset` between ticks.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use ricochet_core::entity::EntityId;
//! use ricochet_core::signal::Lifecycle;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut lifecycle = Lifecycle::new(EntityId::new(1));
//! let sink = Arc::clone(&seen);
//! lifecycle.subscribe(move |signal| sink.lock().unwrap().push(signal.victim));
//!
//! assert!(lifecycle.kill());
//! assert!(!lifecycle.kill()); // already dead, nothing fired
//! assert_eq!(*seen.lock().unwrap(), vec![EntityId::new(1)]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::EntityId;

/// One-shot death event. Carries only the identity of the entity that died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatSignal {
    /// The entity that died.
    pub victim: EntityId,
}

/// Handle returned by [`SignalChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CombatSignal) + Send>;

/// Synchronous single-producer, multi-consumer broadcast of [`CombatSignal`]s.
///
/// Listeners are called in subscription order. Each listener is a plain
/// callback: it must return promptly and must not wait on anything, since
/// the producer is mid-tick while it runs.
#[derive(Default)]
pub struct SignalChannel {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl SignalChannel {
    /// Creates a channel with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CombatSignal) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if the handle was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Delivers `signal` to every listener, in subscription order.
    pub fn emit(&mut self, signal: &CombatSignal) {
        for (_, listener) in &mut self.listeners {
            listener(signal);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for SignalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalChannel")
            .field("listeners", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Alive/dead state machine for one entity, owning its death channel.
///
/// ```text
///        kill()            reset by host
/// Alive -------> Dead --------------------> Alive
///                 |  kill() is a no-op
///                 +--------+
/// ```
#[derive(Debug)]
pub struct Lifecycle {
    owner: EntityId,
    alive: bool,
    deaths: u32,
    channel: SignalChannel,
}

impl Lifecycle {
    /// Creates a live lifecycle for `owner`.
    #[must_use]
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            alive: true,
            deaths: 0,
            channel: SignalChannel::new(),
        }
    }

    /// The entity this lifecycle belongs to.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Whether the entity is alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of deaths since creation.
    #[must_use]
    pub const fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Transitions to dead and fires one [`CombatSignal`].
    ///
    /// Returns `true` if the transition happened; killing a dead entity does
    /// nothing and returns `false`.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.deaths += 1;
        let signal = CombatSignal { victim: self.owner };
        debug!(victim = %self.owner, deaths = self.deaths, listeners = self.channel.listener_count(), "combat signal");
        self.channel.emit(&signal);
        true
    }

    /// Transitions back to alive. Fires nothing.
    pub fn revive(&mut self) {
        self.alive = true;
    }

    /// Registers a death listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CombatSignal) + Send + 'static,
    {
        self.channel.subscribe(listener)
    }

    /// Removes a death listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.channel.unsubscribe(id)
    }
}
