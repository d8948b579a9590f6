// shop/src/services/auth_service.rs

//! Password hashing and verification.

use crate::errors::AppError;
use argon2::{
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use rand_core::OsRng;
use tracing::{debug, error, instrument};

/// Hashes a plain-text password into an argon2 PHC string with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// Verifies `provided_password` against a stored argon2 hash.
///
/// Returns `Ok(false)` on a plain mismatch. A stored hash that cannot be parsed is
/// a `DataIntegrity` error, not a failed login.
#[instrument(
  name = "auth_service::verify_password",
  skip(stored_hash, provided_password),
  err(Display),
  fields(hash_len = stored_hash.len())
)]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    debug!("Empty password never verifies.");
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::DataIntegrity(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Runs [`hash_password`] on the blocking thread pool.
///
/// One argon2 run takes tens of milliseconds of CPU; keep it off async workers.
pub async fn hash_password_async(password: String) -> Result<String, AppError> {
  run_blocking(move || hash_password(&password)).await
}

/// Runs [`verify_password`] on the blocking thread pool.
pub async fn verify_password_async(stored_hash: String, provided_password: String) -> Result<bool, AppError> {
  run_blocking(move || verify_password(&stored_hash, &provided_password)).await
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
  F: FnOnce() -> Result<T, AppError> + Send + 'static,
  T: Send + 'static,
{
  let span = tracing::Span::current();
  tokio::task::spawn_blocking(move || span.in_scope(work))
    .await
    .map_err(|join_err| {
      error!(error = %join_err, "Password hashing task did not complete.");
      AppError::Internal(format!("Password hashing task failed: {}", join_err))
    })?
}
