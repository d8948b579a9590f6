// shop/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

#[derive(Debug, Clone)]
pub struct SeedUser {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  pub session_cookie_name: String,
  pub session_cookie_secure: bool,

  pub log_format: LogFormat,

  // Only populated when SEED_DB=true.
  pub seed_user: Option<SeedUser>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the configuration from an arbitrary variable source.
  ///
  /// `from_env` passes the process environment; tests pass a closure over a fixed map.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_or = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var("SERVER_PORT", &get_or("SERVER_PORT", "8080"))?;
    let database_url = get_or("DATABASE_URL", "sqlite://ecommerce.db?mode=rwc");
    let database_max_connections: u32 = parse_var(
      "DATABASE_MAX_CONNECTIONS",
      &get_or("DATABASE_MAX_CONNECTIONS", "5"),
    )?;
    if database_max_connections == 0 {
      return Err(AppError::Config(
        "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
      ));
    }

    let session_cookie_name = get_or("SESSION_COOKIE_NAME", "session");
    if session_cookie_name.trim().is_empty() {
      return Err(AppError::Config("SESSION_COOKIE_NAME cannot be empty".to_string()));
    }
    let session_cookie_secure = parse_var("SESSION_COOKIE_SECURE", &get_or("SESSION_COOKIE_SECURE", "false"))?;

    let log_format = match get_or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
      "text" => LogFormat::Text,
      "json" => LogFormat::Json,
      other => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}': expected 'text' or 'json'",
          other
        )))
      }
    };

    let seed_db: bool = parse_var("SEED_DB", &get_or("SEED_DB", "false"))?;
    let seed_user = if seed_db {
      let required = |var_name: &str| {
        lookup(var_name)
          .filter(|v| !v.is_empty())
          .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}' (required by SEED_DB)", var_name)))
      };
      Some(SeedUser {
        username: required("SEED_USERNAME")?,
        password: required("SEED_PASSWORD")?,
      })
    } else {
      None
    };

    tracing::debug!(
      server_host = %server_host,
      server_port,
      database_max_connections,
      seed_db,
      "Application configuration parsed."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      session_cookie_name,
      session_cookie_secure,
      log_format,
      seed_user,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_var<T>(var_name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}
