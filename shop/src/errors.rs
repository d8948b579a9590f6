// shop/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Unauthorized. Invalid credentials")]
  InvalidCredentials,

  #[error("Authentication required")]
  Unauthenticated,

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("{0}")]
  InvalidOperation(String),

  #[error("Data Integrity Error: {0}")]
  DataIntegrity(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
      AppError::Validation(_) | AppError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::DataIntegrity(_)
      | AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Migration(_)
      | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    // Storage and bootstrap failures never leak their detail to clients.
    let message = match self {
      AppError::Validation(m) | AppError::NotFound(m) | AppError::InvalidOperation(m) => m.clone(),
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Migration(_) | AppError::Config(_) => "Service is misconfigured".to_string(),
      AppError::DataIntegrity(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
      other => other.to_string(),
    };

    HttpResponse::build(status).json(json!({ "error": message }))
  }
}

/// Crate-wide result alias.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
