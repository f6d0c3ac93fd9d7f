//! Application state shared across all handlers.

use std::sync::Arc;

use chatrelay_core::config::AppConfig;
use chatrelay_realtime::ChatGateway;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Chat relay gateway.
    pub gateway: Arc<ChatGateway>,
}
