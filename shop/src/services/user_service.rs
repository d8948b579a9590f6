// shop/src/services/user_service.rs

//! Out-of-band user provisioning. There is no HTTP route for this; users are
//! created by startup seeding or by embedding code.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::User;
use crate::services::auth_service;

#[instrument(name = "user_service::create_user", skip(conn, password), err(Display))]
pub async fn create_user(conn: &mut SqliteConnection, username: &str, password: &str) -> Result<User> {
  if username.is_empty() {
    return Err(AppError::Validation("Username cannot be empty.".to_string()));
  }
  let password_hash = auth_service::hash_password_async(password.to_string()).await?;

  let inserted = sqlx::query_as::<_, User>(
    "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?) \
     RETURNING id, username, password_hash, created_at",
  )
  .bind(username)
  .bind(&password_hash)
  .bind(Utc::now())
  .fetch_one(&mut *conn)
  .await;

  match inserted {
    Ok(user) => {
      info!(user_id = user.id, "User created.");
      Ok(user)
    }
    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
      warn!("Username already taken.");
      Err(AppError::InvalidOperation(format!("Username '{}' already exists", username)))
    }
    Err(e) => Err(AppError::Sqlx(e)),
  }
}

#[instrument(name = "user_service::find_by_username", skip(conn))]
pub async fn find_by_username(conn: &mut SqliteConnection, username: &str) -> Result<Option<User>> {
  let user = sqlx::query_as::<_, User>(
    "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
  )
  .bind(username)
  .fetch_optional(&mut *conn)
  .await?;
  Ok(user)
}

/// Creates the user unless one with that username already exists.
///
/// An existing user keeps its stored password.
#[instrument(name = "user_service::ensure_user", skip(conn, password), err(Display))]
pub async fn ensure_user(conn: &mut SqliteConnection, username: &str, password: &str) -> Result<User> {
  if let Some(existing) = find_by_username(conn, username).await? {
    info!(user_id = existing.id, "Seed user already present.");
    return Ok(existing);
  }
  create_user(conn, username, password).await
}
