//! Connection authentication: token validation plus subject resolution.

use std::sync::Arc;

use thiserror::Error;

use chatrelay_auth::jwt::{TokenError, TokenValidator};
use chatrelay_core::error::AppError;
use chatrelay_core::traits::Directory;
use chatrelay_entity::user::User;

/// Why a connection attempt was refused.
///
/// Every variant is fatal to the attempt; the reason string is sent to
/// the client in an `auth_error` event before the connection closes.
/// `is_expired` lets callers tell apart the one failure that should
/// trigger the client's refresh-and-retry flow.
#[derive(Debug, Error)]
pub enum AuthFailure {
    /// The bearer token failed validation.
    #[error(transparent)]
    Token(#[from] TokenError),
    /// The token was valid but its subject is unknown to the directory.
    #[error("user not found")]
    UnknownSubject,
    /// The directory lookup itself failed.
    #[error("directory unavailable")]
    Directory(#[source] AppError),
}

impl AuthFailure {
    /// Whether this failure is a token expiry, the contract signal for
    /// the external issuer's refresh flow.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Token(TokenError::Expired))
    }

    /// The reason string carried by the `auth_error` event.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Authenticates incoming connections.
///
/// Validates the bearer token, then resolves the subject to a full user
/// record through the external directory.
#[derive(Clone)]
pub struct ConnectionAuthenticator {
    /// Token validator.
    validator: Arc<TokenValidator>,
    /// External users lookup.
    directory: Arc<dyn Directory<User>>,
}

impl std::fmt::Debug for ConnectionAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionAuthenticator").finish()
    }
}

impl ConnectionAuthenticator {
    /// Creates an authenticator from its collaborators.
    pub fn new(validator: Arc<TokenValidator>, directory: Arc<dyn Directory<User>>) -> Self {
        Self {
            validator,
            directory,
        }
    }

    /// Authenticates a connection attempt.
    ///
    /// `token` is whatever the transport extracted from the handshake
    /// (authorization header or explicit parameter); `None` means the
    /// client supplied nothing.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User, AuthFailure> {
        let token = token.ok_or(AuthFailure::Token(TokenError::Missing))?;
        let claims = self.validator.validate(token)?;

        let user = self
            .directory
            .find_by_id(claims.user_id())
            .await
            .map_err(AuthFailure::Directory)?;

        user.ok_or(AuthFailure::UnknownSubject)
    }
}
