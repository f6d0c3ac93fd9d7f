//! Derived presence types.

pub mod model;

pub use model::PresenceEntry;
