//! Background cache of player profiles.
//!
//! Filling the cache may touch slow storage in the host, so inserts are
//! pushed onto Tokio's blocking pool. Reads happen on the tick thread and
//! only ever see completed inserts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use regionward_types::EntityId;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// A player's id and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Player id.
    pub id: EntityId,
    /// Player name.
    pub name: String,
}

/// Shared `id -> name` cache.
#[derive(Debug, Clone, Default)]
pub struct ProfileCache {
    inner: Arc<RwLock<HashMap<EntityId, String>>>,
}

impl ProfileCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `profile`.
    ///
    /// Inside a Tokio runtime the insert runs on the blocking pool and the
    /// task handle is returned. Outside one it happens inline.
    pub fn submit(&self, profile: Profile) -> Option<JoinHandle<()>> {
        let inner = Arc::clone(&self.inner);
        match Handle::try_current() {
            Ok(handle) => Some(handle.spawn_blocking(move || insert(&inner, profile))),
            Err(_) => {
                insert(&inner, profile);
                None
            }
        }
    }

    /// Cached name of `id`.
    pub fn name(&self, id: EntityId) -> Option<String> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    /// Number of cached profiles.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |guard| guard.len())
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert(inner: &RwLock<HashMap<EntityId, String>>, profile: Profile) {
    let Ok(mut guard) = inner.write() else {
        warn!(id = %profile.id, "profile cache lock poisoned, dropping insert");
        return;
    };
    trace!(id = %profile.id, name = %profile.name, "caching profile");
    guard.insert(profile.id, profile.name);
}
