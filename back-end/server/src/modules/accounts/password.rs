//! Argon2 password hashing for locally registered accounts.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::modules::error::ServiceError;

/// Stored in `hashed_password` for accounts whose credentials live with the
/// identity provider. Never verifies.
pub const PROVIDER_MANAGED: &str = "supabase_otp_managed";

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::internal(format!("Failed to hash password: {e}")))
}

/// Returns false for malformed hashes, including [`PROVIDER_MANAGED`].
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
