// shop/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use shop::config::{AppConfig, LogFormat};
use shop::services::user_service;
use shop::{db, web, AppState};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match log_format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!("Starting shop server...");

  let db_pool = db::connect(&app_config.database_url, app_config.database_max_connections)
    .await
    .context("Failed to open the database")?;

  if let Some(seed) = &app_config.seed_user {
    let mut conn = db_pool.acquire().await?;
    let user = user_service::ensure_user(&mut conn, &seed.username, &seed.password)
      .await
      .context("Failed to seed the configured user")?;
    tracing::info!(user_id = user.id, username = %user.username, "Seed user available.");
  }

  let server_address = app_config.bind_address();
  let app_state = AppState::new(db_pool, app_config);

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;

  tracing::info!("Server stopped.");
  Ok(())
}
