use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures keep their cause so it can be logged, but callers
/// outside this crate are expected to treat every `is_invalid_token` error the
/// same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret must be at least {min} bytes, got {actual}")]
    InvalidSecret { min: usize, actual: usize },

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token lifetime of {0} seconds is out of range")]
    InvalidTtl(i64),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),
}

impl JwtError {
    /// Short machine-readable cause, intended for structured log fields.
    pub fn reason(&self) -> &'static str {
        match self {
            JwtError::InvalidSecret { .. } => "invalid_secret",
            JwtError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            JwtError::InvalidTtl(_) => "invalid_ttl",
            JwtError::EncodingFailed(_) => "encoding_failed",
            JwtError::Malformed(_) => "malformed",
            JwtError::BadSignature => "bad_signature",
            JwtError::Expired => "expired",
            JwtError::MissingClaim(_) => "missing_claim",
        }
    }

    /// True for errors produced while verifying a presented token.
    pub fn is_invalid_token(&self) -> bool {
        matches!(
            self,
            JwtError::Malformed(_)
                | JwtError::BadSignature
                | JwtError::Expired
                | JwtError::MissingClaim(_)
        )
    }
}
