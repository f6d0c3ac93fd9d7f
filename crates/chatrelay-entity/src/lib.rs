//! # chatrelay-entity
//!
//! Domain entity models for ChatRelay: users, chat messages, and derived
//! presence entries.

pub mod message;
pub mod presence;
pub mod user;

pub use message::{ChatMessage, PairKey};
pub use presence::PresenceEntry;
pub use user::User;
