//! Connection-time authentication.

pub mod authenticator;

pub use authenticator::{AuthFailure, ConnectionAuthenticator};
