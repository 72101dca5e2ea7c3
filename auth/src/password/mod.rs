//! One-way credential hashing.
//!
//! Hashes are self-describing PHC strings, so parameters can change without
//! invalidating stored credentials.

pub mod argon2;
pub mod errors;

pub use self::argon2::PasswordHasher;
pub use errors::PasswordError;
