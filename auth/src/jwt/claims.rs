use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// What a token may be used for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bearer credential for protected requests.
    #[default]
    Access,
    /// One-shot proof of mailbox ownership sent after registration.
    EmailVerification,
}

/// Claims signed into every token.
///
/// `sub` is optional on the wire so that a token lacking it decodes and can be
/// rejected with a precise cause instead of a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Role of the subject at issuance time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject valid for `ttl` from now.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `role` - Role name carried alongside the subject
    /// * `kind` - Intended use of the token
    /// * `ttl` - Validity window, added to the issue time
    ///
    /// # Returns
    /// Claims with sub, role, kind, iat and exp set
    ///
    /// # Errors
    /// * `InvalidTtl` - Expiry falls outside the representable time range
    pub fn for_subject(
        subject: impl ToString,
        role: impl ToString,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(JwtError::InvalidTtl(ttl.num_seconds()))?;

        Ok(Self {
            sub: Some(subject.to_string()),
            role: Some(role.to_string()),
            kind,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Subject, if present.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid at the second it expires.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
