//! Password hashing and the password shape rule.

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

/// Bcrypt cost factor used for stored credentials.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_PASSWORD_LENGTH: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters")]
    InvalidLength,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Check the password shape rule (character count, not bytes).
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(PasswordError::InvalidLength);
    }
    Ok(())
}

/// Hash a password with bcrypt on the blocking pool.
pub async fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}

/// Verify a password against a stored bcrypt hash.
///
/// A malformed stored hash is an error, not a mismatch.
pub async fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &stored_hash).map_err(|e| PasswordError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| PasswordError::Hashing(format!("task join error: {e}")))?
}
