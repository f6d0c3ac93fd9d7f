//! Live session state.

pub mod handle;
pub mod registry;

pub use handle::{ConnectionId, SessionHandle};
pub use registry::SessionRegistry;
