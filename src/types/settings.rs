use serde::{Deserialize, Serialize};

/// Settings of the guard daemon itself (not the kiosk policy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuardSettings {
    /// WebSocket URL of the configuration server.
    pub policy_source_url: String,
    /// SQLite file holding the last applied policy. `None` uses the platform data dir.
    pub database_path: Option<String>,
    /// `tracing` filter directive, e.g. `info` or `kiosk_guard=debug`.
    pub log_filter: String,
    pub reconnect_delay_secs: u64,
    pub browser_call_timeout_secs: u64,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            policy_source_url: "ws://127.0.0.1:5678/".to_string(),
            database_path: None,
            log_filter: "info".to_string(),
            reconnect_delay_secs: 5,
            browser_call_timeout_secs: 10,
        }
    }
}
