//! Chat relay engine configuration.

use serde::{Deserialize, Serialize};

/// Chat relay tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Room assigned to connections that do not request one.
    #[serde(default = "default_room")]
    pub default_room: String,
    /// Maximum retained messages per room log (FIFO eviction past this).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Number of backlog messages delivered on join/reconnect.
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,
    /// Rate limit window in milliseconds.
    #[serde(default = "default_rate_window")]
    pub rate_limit_window_ms: i64,
    /// Maximum accepted messages per session per window.
    #[serde(default = "default_rate_max")]
    pub rate_limit_max_messages: i64,
    /// Delay before a typing indicator auto-clears, in milliseconds.
    #[serde(default = "default_typing_clear")]
    pub typing_clear_ms: u64,
    /// Per-connection outbound channel buffer size.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            default_room: default_room(),
            history_capacity: default_history_capacity(),
            history_page_size: default_history_page_size(),
            rate_limit_window_ms: default_rate_window(),
            rate_limit_max_messages: default_rate_max(),
            typing_clear_ms: default_typing_clear(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_room() -> String {
    "general".to_string()
}

fn default_history_capacity() -> usize {
    1000
}

fn default_history_page_size() -> usize {
    50
}

fn default_rate_window() -> i64 {
    1000
}

fn default_rate_max() -> i64 {
    10
}

fn default_typing_clear() -> u64 {
    2000
}

fn default_channel_buffer() -> usize {
    256
}
