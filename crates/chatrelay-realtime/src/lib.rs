//! # chatrelay-realtime
//!
//! Connection gateway for ChatRelay. Provides:
//!
//! - Session registry mapping live connections to connected-user state
//! - Bounded per-room history and per-pair direct message stores
//! - Per-session message rate limiting
//! - Presence and typing broadcast with generation-aware auto-clear
//! - The gateway orchestrating authentication, routing, and lifecycle

pub mod connection;
pub mod gateway;
pub mod history;
pub mod limiter;
pub mod message;
pub mod presence;
pub mod session;

pub use connection::authenticator::ConnectionAuthenticator;
pub use gateway::ChatGateway;
pub use history::direct::DirectMessageStore;
pub use history::room::RoomHistoryStore;
pub use limiter::RateLimiter;
pub use message::types::{ClientEvent, ServerEvent};
pub use presence::broadcaster::PresenceBroadcaster;
pub use session::registry::SessionRegistry;
