//! Presence and typing broadcast.

pub mod broadcaster;

pub use broadcaster::PresenceBroadcaster;
