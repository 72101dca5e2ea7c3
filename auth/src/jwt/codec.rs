use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::JwtError;

/// Signs and verifies time-bound tokens.
///
/// The secret and algorithm are fixed at construction; the codec holds no
/// mutable state and is safe to share between any number of tasks.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenCodec {
    /// Minimum secret length accepted for HMAC signing.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a codec from a shared secret and an algorithm name.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (never logged)
    /// * `algorithm` - One of `HS256`, `HS384`, `HS512`
    ///
    /// # Errors
    /// * `InvalidSecret` - Secret shorter than 32 bytes
    /// * `UnsupportedAlgorithm` - Unknown or non-HMAC algorithm
    pub fn new(secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtError::InvalidSecret {
                min: Self::MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        let algorithm = match Algorithm::from_str(algorithm) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => return Err(JwtError::UnsupportedAlgorithm(algorithm.to_string())),
        };

        // Expiry is checked against `Claims::is_expired` with no leeway.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
        })
    }

    /// Issue a signed token for a subject.
    ///
    /// `ttl` is mandatory: there is no implicit default validity window.
    ///
    /// # Errors
    /// * `InvalidTtl` - Expiry falls outside the representable time range
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        subject: impl ToString,
        role: impl ToString,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.encode(&Claims::for_subject(subject, role, kind, ttl)?)
    }

    /// Sign prepared claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// A token is valid only when its signature verifies, it is not expired
    /// and it names a subject.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be decoded
    /// * `BadSignature` - Signature or algorithm does not match
    /// * `Expired` - Expiry is at or before the current time
    /// * `MissingClaim` - Required claim absent
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::BadSignature
                }
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::MissingRequiredClaim(_) => JwtError::MissingClaim("exp"),
                _ => JwtError::Malformed(e.to_string()),
            })?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::Expired);
        }

        if claims.subject().map_or(true, str::is_empty) {
            return Err(JwtError::MissingClaim("sub"));
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
