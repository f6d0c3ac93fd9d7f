//! Bounded in-memory message history stores.

pub mod direct;
pub mod room;

pub use direct::DirectMessageStore;
pub use room::RoomHistoryStore;
