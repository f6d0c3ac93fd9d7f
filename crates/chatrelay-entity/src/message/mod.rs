//! Chat message entity and direct-conversation pair key.

pub mod model;
pub mod pair;

pub use model::ChatMessage;
pub use pair::PairKey;
