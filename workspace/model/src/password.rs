//! Salted one-way password hashing.
//!
//! Hashes are stored as Argon2id PHC strings, so the salt and cost parameters
//! travel with the hash and verification needs nothing else.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use tracing::{debug, warn};

use crate::error::{ModelError, Result};

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ModelError::PasswordHash(e.to_string()))
}

/// Check a plaintext password against a stored hash.
///
/// A stored value that is not a parseable hash never verifies.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Stored password is not a valid hash: {}", e);
            return false;
        }
    };

    let verified = Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok();
    debug!("Password verification result: {}", verified);
    verified
}
