//! # chatrelay-api
//!
//! HTTP API layer for ChatRelay built on Axum.
//!
//! Provides the WebSocket upgrade endpoint, health endpoints, CORS and
//! trace middleware, and the server runner.

pub mod app;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
