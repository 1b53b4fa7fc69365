//! Session tuning.

use serde::Deserialize;

/// Configuration for the session manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Server ticks between session ticks (default: 2).
    #[serde(default = "default_tick_interval_ticks")]
    pub tick_interval_ticks: u64,

    /// Seconds a session may go without being touched before
    /// [`expire_stale`](crate::SessionManager::expire_stale) drops it
    /// (default: 600).
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,

    /// Permission prefix granting bypass; the world id is appended
    /// (default: `regionward.region.bypass.`).
    #[serde(default = "default_bypass_permission_prefix")]
    pub bypass_permission_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ticks: default_tick_interval_ticks(),
            expiry_secs: default_expiry_secs(),
            bypass_permission_prefix: default_bypass_permission_prefix(),
        }
    }
}

impl SessionConfig {
    /// The full bypass permission for a world.
    pub fn bypass_permission(&self, world: &impl core::fmt::Display) -> String {
        format!("{}{world}", self.bypass_permission_prefix)
    }
}

const fn default_tick_interval_ticks() -> u64 {
    2
}

const fn default_expiry_secs() -> u64 {
    600
}

fn default_bypass_permission_prefix() -> String {
    String::from("regionward.region.bypass.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.tick_interval_ticks, 2);
        assert_eq!(config.expiry_secs, 600);
        assert_eq!(config.bypass_permission(&"nether"), "regionward.region.bypass.nether");
    }

    #[test]
    fn partial_input_keeps_other_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"tick_interval_ticks": 5}"#).unwrap_or_default();
        assert_eq!(config.tick_interval_ticks, 5);
        assert_eq!(config.expiry_secs, 600);
    }
}
