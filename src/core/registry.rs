//! Listener registry
//!
//! Indexes registered listeners by owner and declared event kinds. Lookups
//! return a snapshot so handlers run without the registry lock held and may
//! themselves register or unregister listeners.

use super::error::Result;
use super::event::LogEvent;
use super::listener::{Listener, RegisteredListener};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: RwLock<Vec<Arc<RegisteredListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `owner` (`None` = receives every logger's events)
    ///
    /// Returns `Ok(false)` if this exact instance is already registered and
    /// `Err` if the listener declares no event kinds.
    pub fn register(&self, listener: Arc<dyn Listener>, owner: Option<Arc<str>>) -> Result<bool> {
        let registered = RegisteredListener::new(listener, owner)?;

        let mut entries = self.entries.write();
        if entries.iter().any(|e| e.is(registered.listener())) {
            return Ok(false);
        }
        entries.push(Arc::new(registered));
        Ok(true)
    }

    /// Remove a listener by identity
    pub fn unregister<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !e.is(listener));
        entries.len() != before
    }

    /// Remove every registration owned by `owner`; returns how many were removed
    pub fn unregister_owner(&self, owner: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| !e.is_owned_by(owner));
        before - entries.len()
    }

    pub fn contains<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> bool {
        self.entries.read().iter().any(|e| e.is(listener))
    }

    /// Registrations that accept `event`, in registration order
    pub fn handlers_for(&self, event: &LogEvent) -> Vec<Arc<RegisteredListener>> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.accepts(event))
            .cloned()
            .collect()
    }

    pub fn owned_by(&self, owner: &str) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.is_owned_by(owner))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
