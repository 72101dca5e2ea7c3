use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Holds no state, so a single instance can be shared across tasks.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a fresh random salt for every call, so hashing the
    /// same password twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison of digests is constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed or uses unknown parameters
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));

        // Verify correct password
        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        // Verify incorrect password
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("correcthorse").expect("Failed to hash password");
        let second = hasher.hash("correcthorse").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(hasher.verify("correcthorse", &first).unwrap());
        assert!(hasher.verify("correcthorse", &second).unwrap());
    }

    #[test]
    fn test_hash_is_not_plaintext() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correcthorse").unwrap();
        assert!(!hash.contains("correcthorse"));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_foreign_algorithm_hash() {
        let hasher = PasswordHasher::new();
        // bcrypt strings are not PHC strings argon2 can check
        let result = hasher.verify(
            "password",
            "$2b$12$KIXQJQ1eYd2nC2b1Qb6u8uJ6mQ1hQH5Xf1p8b8y9Wm6lQv9k0Q7yW",
        );
        assert!(result.is_err());
    }

    proptest! {
        // Argon2 is deliberately slow, keep the case count small.
        #![proptest_config(ProptestConfig::with_cases(6))]

        #[test]
        fn prop_hash_verifies_own_plaintext(password in "[ -~]{1,40}") {
            let hasher = PasswordHasher::new();
            let hash = hasher.hash(&password).unwrap();
            prop_assert!(hasher.verify(&password, &hash).unwrap());
        }

        #[test]
        fn prop_hash_rejects_other_plaintext(
            first in "[a-z0-9]{8,24}",
            second in "[a-z0-9]{8,24}",
        ) {
            prop_assume!(first != second);
            let hasher = PasswordHasher::new();
            let hash = hasher.hash(&first).unwrap();
            prop_assert!(!hasher.verify(&second, &hash).unwrap());
        }
    }
}
