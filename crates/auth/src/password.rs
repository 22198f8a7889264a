//! Password hashing and verification using Argon2id.
//!
//! Hashes are produced in the PHC string format so parameters travel with
//! the hash and can be tightened later without invalidating stored
//! credentials.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Verification failed: password does not match")]
    VerificationFailed,

    #[error("Invalid hash format")]
    InvalidHashFormat,
}

/// Hashes a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns an error if the underlying hasher fails.
pub fn hash_password(password: &SecretString) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns [`PasswordError::VerificationFailed`] on mismatch and
/// [`PasswordError::InvalidHashFormat`] when the stored hash cannot be
/// parsed.
pub fn verify_password(password: &SecretString, expected_hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(expected_hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Errors for password strength validation.
#[derive(Debug, Error)]
pub enum PasswordValidationError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must be at most 256 characters long")]
    TooLong,

    #[error("Password must contain at least one letter")]
    MissingLetter,

    #[error("Password must contain at least one digit")]
    MissingDigit,
}

/// Checks if a password is strong enough for an interactively created
/// account.
pub fn validate_password_strength(password: &str) -> Result<(), Vec<PasswordValidationError>> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push(PasswordValidationError::TooShort);
    }

    if password.len() > 256 {
        errors.push(PasswordValidationError::TooLong);
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push(PasswordValidationError::MissingLetter);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(PasswordValidationError::MissingDigit);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
