//! Keyed side table attaching data to live game objects.
//!
//! The platform gives no place to hang arbitrary data on an entity, so the
//! store keeps a map of `object -> key -> actor`. One store instance is
//! shared by everything that records or reads provenance; independent
//! instances never see each other's entries.
//!
//! The reserved [`CAUSE_KEY`] holds the manually recorded parent of an
//! object, which the cause resolver walks backward.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{trace, warn};

use crate::actor::{ActorKey, ActorRef};
use crate::error::AttributionError;

/// Key under which a manually recorded parent cause is stored.
pub const CAUSE_KEY: &str = "regionward.cause";

/// Thread-safe attribution side table.
#[derive(Debug, Default)]
pub struct AttributionStore {
    inner: RwLock<HashMap<ActorKey, HashMap<String, ActorRef>>>,
}

impl AttributionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` to `target` under `key`, replacing any previous value.
    pub fn put(&self, target: &ActorRef, key: &str, value: ActorRef) -> Result<(), AttributionError> {
        let slot = trackable_key(target)?;
        let Ok(mut guard) = self.inner.write() else {
            warn!(key, "attribution store lock poisoned, dropping write");
            return Ok(());
        };
        guard
            .entry(slot)
            .or_default()
            .insert(String::from(key), value);
        Ok(())
    }

    /// Read the value attached to `target` under `key`.
    pub fn get(&self, target: &ActorRef, key: &str) -> Option<ActorRef> {
        let slot = target.key()?;
        let guard = self.inner.read().ok()?;
        guard.get(&slot).and_then(|entries| entries.get(key)).cloned()
    }

    /// Detach and return the value under `key`.
    pub fn remove(&self, target: &ActorRef, key: &str) -> Option<ActorRef> {
        let slot = target.key()?;
        let mut guard = self.inner.write().ok()?;
        let entries = guard.get_mut(&slot)?;
        let removed = entries.remove(key);
        if entries.is_empty() {
            guard.remove(&slot);
        }
        removed
    }

    /// Forget everything attached to `target`, e.g. after it was destroyed.
    pub fn remove_all(&self, target: &ActorRef) {
        let Some(slot) = target.key() else {
            return;
        };
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        guard.remove(&slot);
    }

    /// Number of objects with at least one entry.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |guard| guard.len())
    }

    /// Whether no object carries any entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record `parent` as the cause of `target`.
    ///
    /// # Errors
    ///
    /// Blocks and the unknown sentinel cannot carry data.
    pub fn track_parent_cause(
        &self,
        target: &ActorRef,
        parent: ActorRef,
    ) -> Result<(), AttributionError> {
        trace!(object = %target, parent = %parent, "tracking parent cause");
        self.put(target, CAUSE_KEY, parent)
    }

    /// Forget the recorded cause of `target`.
    pub fn untrack_parent_cause(&self, target: &ActorRef) {
        self.remove(target, CAUSE_KEY);
    }

    /// The recorded cause of `target`, if any.
    pub fn parent_cause(&self, target: &ActorRef) -> Option<ActorRef> {
        self.get(target, CAUSE_KEY)
    }
}

fn trackable_key(target: &ActorRef) -> Result<ActorKey, AttributionError> {
    match target {
        ActorRef::Block(block) => Err(AttributionError::BlockNotTrackable(block.pos)),
        ActorRef::Unknown => Err(AttributionError::UnknownTarget),
        ActorRef::Player(_) | ActorRef::OfflineUser(_) | ActorRef::Entity(_) => {
            target.key().ok_or(AttributionError::UnknownTarget)
        }
    }
}
