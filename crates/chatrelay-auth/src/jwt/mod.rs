//! JWT claims and token validation.

pub mod claims;
pub mod validator;

pub use claims::Claims;
pub use validator::{TokenError, TokenValidator};
