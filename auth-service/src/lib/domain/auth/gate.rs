use std::sync::Arc;

use auth::Authenticator;
use auth::TokenKind;

use crate::domain::user::models::Principal;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; the token must be non-empty.
pub fn bearer_token(authorization: &str) -> Option<&str> {
    let (scheme, token) = authorization.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authorization gate for protected operations.
///
/// Fails closed: every rejection is `Unauthorized`, with the cause recorded
/// only in the `reason` log field. Tokens are never revoked; resolving the
/// subject against the store is what rejects tokens of deleted users.
pub struct AccessGate<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AccessGate<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Authorize a request from its raw `Authorization` header value.
    ///
    /// # Errors
    /// * `Unauthorized` - Header absent or not a bearer credential, or the token is rejected
    /// * `DatabaseError` - Principal lookup failed
    pub async fn authorize_header(&self, authorization: Option<&str>) -> Result<Principal, UserError> {
        let Some(header) = authorization else {
            tracing::warn!(reason = "missing_header", "Request rejected");
            return Err(UserError::Unauthorized);
        };

        let Some(token) = bearer_token(header) else {
            tracing::warn!(reason = "not_bearer", "Request rejected");
            return Err(UserError::Unauthorized);
        };

        self.authorize(token).await
    }

    /// Verify a bearer token and resolve the current principal.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, not an access token, or its subject no longer exists
    /// * `DatabaseError` - Principal lookup failed
    pub async fn authorize(&self, raw_token: &str) -> Result<Principal, UserError> {
        let claims = self.authenticator.validate_token(raw_token).map_err(|e| {
            tracing::warn!(reason = e.reason(), error = %e, "Token rejected");
            UserError::Unauthorized
        })?;

        if claims.kind != TokenKind::Access {
            tracing::warn!(reason = "wrong_kind", "Token rejected");
            return Err(UserError::Unauthorized);
        }

        let user_id = claims
            .subject()
            .and_then(|sub| UserId::from_string(sub).ok())
            .ok_or_else(|| {
                tracing::warn!(reason = "bad_subject", "Token rejected");
                UserError::Unauthorized
            })?;

        let user = self.repository.find_by_id(&user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, reason = "unknown_subject", "Token rejected");
            UserError::Unauthorized
        })?;

        Ok(user.into())
    }
}
