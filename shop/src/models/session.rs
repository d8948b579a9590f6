// shop/src/models/session.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A stored login session. The token is what travels in the session cookie.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
  pub token: String,
  pub user_id: i64,
  pub created_at: DateTime<Utc>,
}

/// The caller's identity, resolved once per request from a live session.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CurrentUser {
  pub user_id: i64,
  pub username: String,
  pub session_token: String,
}
