// shop/src/services/session_service.rs

//! Login sessions: issued on a successful credential check, resolved on every
//! request that carries a session cookie, revoked on logout.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CurrentUser, Session};
use crate::services::{auth_service, user_service};

/// Checks the credentials and opens a new session for the user.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
/// Each database access is its own statement; call this on a plain pooled
/// connection, not inside a transaction, so the password check holds no lock.
#[instrument(name = "session_service::login", skip(conn, password), err(Display))]
pub async fn login(conn: &mut SqliteConnection, username: &str, password: &str) -> Result<Session> {
  let Some(user) = user_service::find_by_username(conn, username).await? else {
    warn!("Login rejected: unknown username.");
    return Err(AppError::InvalidCredentials);
  };

  let verified = auth_service::verify_password_async(user.password_hash.clone(), password.to_string()).await?;
  if !verified {
    warn!(user_id = user.id, "Login rejected: password mismatch.");
    return Err(AppError::InvalidCredentials);
  }

  let session = sqlx::query_as::<_, Session>(
    "INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?) RETURNING token, user_id, created_at",
  )
  .bind(new_session_token())
  .bind(user.id)
  .bind(Utc::now())
  .fetch_one(&mut *conn)
  .await?;

  info!(user_id = user.id, "Session opened.");
  Ok(session)
}

/// Resolves a session token to the identity it was issued for.
#[instrument(name = "session_service::current_user", skip_all, err(Display))]
pub async fn current_user(conn: &mut SqliteConnection, token: &str) -> Result<CurrentUser> {
  let identity = sqlx::query_as::<_, CurrentUser>(
    "SELECT u.id AS user_id, u.username AS username, s.token AS session_token \
     FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
  )
  .bind(token)
  .fetch_optional(&mut *conn)
  .await?;

  identity.ok_or_else(|| {
    debug!("Session token does not map to a live session.");
    AppError::Unauthenticated
  })
}

/// Ends the caller's session. Fails with `Unauthenticated` if it is already gone.
#[instrument(name = "session_service::logout", skip(conn, identity), fields(user_id = identity.user_id), err(Display))]
pub async fn logout(conn: &mut SqliteConnection, identity: &CurrentUser) -> Result<()> {
  let revoked = revoke(conn, &identity.session_token).await?;
  if !revoked {
    return Err(AppError::Unauthenticated);
  }
  info!("Session closed.");
  Ok(())
}

/// Deletes a session by token, returning whether one existed.
pub async fn revoke(conn: &mut SqliteConnection, token: &str) -> Result<bool> {
  let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
    .bind(token)
    .execute(&mut *conn)
    .await?;
  Ok(result.rows_affected() > 0)
}

fn new_session_token() -> String {
  // Two v4 UUIDs: 244 random bits, cookie-safe hex.
  format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
