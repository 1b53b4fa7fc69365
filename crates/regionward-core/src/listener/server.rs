use std::collections::BTreeSet;

use tracing::info;

/// Tracks host dependencies that change how policy behaves.
///
/// Names are compared case-insensitively. A toggle of a watched dependency
/// tells the caller to re-synchronize every session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerListener {
    watched: Vec<String>,
    active: BTreeSet<String>,
}

impl ServerListener {
    /// Watch the given dependency names.
    pub fn new(watched: Vec<String>) -> Self {
        Self {
            watched,
            active: BTreeSet::new(),
        }
    }

    /// Whether `name` is watched.
    pub fn is_watched(&self, name: &str) -> bool {
        self.watched
            .iter()
            .any(|watched| watched.eq_ignore_ascii_case(name))
    }

    /// Whether the watched dependency `name` is currently enabled.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(&name.to_ascii_lowercase())
    }

    /// Record a dependency being enabled or disabled. Returns whether it is
    /// watched, in which case every session must be reset.
    pub fn on_dependency_toggled(&mut self, name: &str, enabled: bool) -> bool {
        if !self.is_watched(name) {
            return false;
        }
        let key = name.to_ascii_lowercase();
        if enabled {
            self.active.insert(key);
        } else {
            self.active.remove(&key);
        }
        info!(dependency = name, enabled, "watched dependency toggled");
        true
    }
}
