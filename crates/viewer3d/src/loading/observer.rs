//! Load progress observers
//!
//! Observers are registered explicitly and get a key back; the key removes
//! them again. Dropping or cancelling the orchestrator clears every
//! registration, so nothing outlives the load it watched.

use super::session::LoadPhase;
use crate::foundation::collections::{ObserverKey, ObserverMap};

/// Something observable that happened during a load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// The phase changed
    PhaseChanged {
        /// New phase
        phase: LoadPhase,
        /// Detail label for the new phase
        detail: &'static str,
    },
    /// Bytes received by the current fetch
    Progress {
        /// Bytes received
        loaded: u64,
        /// Total size if known
        total: Option<u64>,
    },
    /// A recoverable or fatal problem
    Error {
        /// Phase the error happened in
        phase: LoadPhase,
        /// Human readable description
        message: String,
    },
    /// Geometry attached to the scene
    Completed {
        /// Name of the attached object
        object: String,
    },
}

/// Receives load events
pub trait LoadObserver {
    /// Handle an event
    fn on_event(&mut self, event: &LoadEvent);
}

impl<F: FnMut(&LoadEvent)> LoadObserver for F {
    fn on_event(&mut self, event: &LoadEvent) {
        self(event);
    }
}

/// Registered observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: ObserverMap<Box<dyn LoadObserver>>,
}

impl ObserverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn subscribe(&mut self, observer: Box<dyn LoadObserver>) -> ObserverKey {
        self.observers.insert(observer)
    }

    /// Remove an observer; `false` if the key was already gone
    pub fn unsubscribe(&mut self, key: ObserverKey) -> bool {
        self.observers.remove(key).is_some()
    }

    /// Deliver an event to every observer
    pub fn notify(&mut self, event: &LoadEvent) {
        for observer in self.observers.values_mut() {
            observer.on_event(event);
        }
    }

    /// Remove every observer
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    /// Number of observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether there are no observers
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry").field("observers", &self.observers.len()).finish()
    }
}
