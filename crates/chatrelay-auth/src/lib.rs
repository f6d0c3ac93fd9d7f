//! # chatrelay-auth
//!
//! Authentication boundary for ChatRelay: JWT bearer token validation and
//! the read-only user directory lookup. Token issuance and refresh belong
//! to the external token issuer and are not implemented here.

pub mod directory;
pub mod jwt;

pub use directory::InMemoryUserDirectory;
pub use jwt::{Claims, TokenError, TokenValidator};
