// shop/src/lib.rs

//! Session-authenticated shop backend: a product catalog and per-user carts
//! served over actix-web and stored in SQLite.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
