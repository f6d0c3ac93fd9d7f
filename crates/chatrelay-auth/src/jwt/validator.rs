//! JWT bearer token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use chatrelay_core::config::auth::AuthConfig;
use chatrelay_core::error::AppError;

use super::claims::Claims;

/// Token validation failures.
///
/// `Expired` is a distinct variant because it is the contract signal for
/// the client-side refresh-and-retry flow; every other variant means the
/// token is unusable as presented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// No token was supplied on the handshake.
    #[error("missing token")]
    Missing,
    /// The token's expiry is in the past.
    #[error("jwt expired")]
    Expired,
    /// The signature does not match the shared secret.
    #[error("invalid signature")]
    InvalidSignature,
    /// The token is malformed or failed validation for another reason.
    #[error("jwt malformed")]
    Invalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::authentication(err.to_string())
    }
}

/// Verifies bearer tokens against the issuer's shared secret.
#[derive(Clone)]
pub struct TokenValidator {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string, returning its claims.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Expiration (with configured leeway)
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::InvalidSignature
                    }
                    _ => TokenError::Invalid,
                }
            })?;

        Ok(token_data.claims)
    }
}
