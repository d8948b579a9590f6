// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::TestRequest;
use once_cell::sync::Lazy;
use serde_json::json;
use shop::models::{CurrentUser, NewProduct, Product, User};
use shop::services::{catalog_service, user_service};
use shop::{db, AppConfig, AppState};
use tempfile::TempDir;
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- State ---
pub fn test_config() -> AppConfig {
  AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some("sqlite::memory:".to_string()),
    _ => None,
  })
  .expect("test configuration is valid")
}

/// Fresh in-memory database per call; tests never share rows.
pub async fn test_state() -> AppState {
  setup_tracing();
  let config = test_config();
  let pool = db::connect(&config.database_url, config.database_max_connections)
    .await
    .expect("in-memory database opens");
  AppState::new(pool, config)
}

/// State over a database file with a real multi-connection pool.
///
/// The directory, and with it the WAL and SHM side files, is removed on drop.
pub struct FileBackedState {
  pub state: AppState,
  _dir: TempDir,
}

pub async fn file_backed_state(max_connections: u32) -> FileBackedState {
  setup_tracing();
  let dir = tempfile::tempdir().expect("temp dir is writable");
  let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("shop.db").display());
  let config = AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some(database_url.clone()),
    "DATABASE_MAX_CONNECTIONS" => Some(max_connections.to_string()),
    _ => None,
  })
  .expect("test configuration is valid");
  let pool = db::connect(&config.database_url, config.database_max_connections)
    .await
    .expect("file database opens");
  FileBackedState {
    state: AppState::new(pool, config),
    _dir: dir,
  }
}

pub async fn create_user(state: &AppState, username: &str, password: &str) -> User {
  let mut conn = state.db_pool.acquire().await.unwrap();
  user_service::create_user(&mut conn, username, password).await.unwrap()
}

/// Identity as the session layer would hand it to a service.
pub fn identity_for(user: &User) -> CurrentUser {
  CurrentUser {
    user_id: user.id,
    username: user.username.clone(),
    session_token: format!("test-token-{}", user.id),
  }
}

pub async fn create_product(state: &AppState, actor: &CurrentUser, name: &str, price: f64) -> Product {
  let mut conn = state.db_pool.acquire().await.unwrap();
  let new_product = NewProduct::new(name.to_string(), price, None).unwrap();
  catalog_service::add_product(&mut conn, actor, new_product).await.unwrap()
}

pub async fn count_rows(state: &AppState, table: &str) -> i64 {
  sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
    .fetch_one(&state.db_pool)
    .await
    .unwrap()
}

// --- HTTP helpers ---
pub fn login_request(username: &str, password: &str) -> TestRequest {
  TestRequest::post()
    .uri("/login")
    .set_json(json!({ "username": username, "password": password }))
}

pub fn session_cookie_from<B>(resp: &ServiceResponse<B>, cookie_name: &str) -> Option<Cookie<'static>> {
  resp
    .response()
    .cookies()
    .find(|c| c.name() == cookie_name)
    .map(|c| c.into_owned())
}

/// Builds the full application around `state`, exactly as `main` wires it (minus request logging).
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state.clone()))
        .configure(shop::web::configure_app_routes),
    )
    .await
  };
}
