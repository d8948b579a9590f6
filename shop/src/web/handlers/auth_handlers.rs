// shop/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::session_service;
use crate::state::AppState;
use crate::web::auth::{removal_cookie, session_cookie, AuthenticatedUser};
use crate::web::dto::{LoginRequestPayload, MessageResponse};

#[instrument(
  name = "handler::login",
  skip(app_state, req, req_payload),
  fields(username = req_payload.username.as_deref().unwrap_or_default())
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (username, password) = req_payload.credentials()?;

  let mut conn = app_state.db_pool.acquire().await?;
  let session = session_service::login(&mut conn, username, password).await?;

  // A client logging in again drops its previous session.
  if let Some(previous) = req.cookie(&app_state.config.session_cookie_name) {
    if previous.value() != session.token && session_service::revoke(&mut conn, previous.value()).await? {
      info!("Replaced an existing session.");
    }
  }

  info!(user_id = session.user_id, "Login successful.");
  Ok(
    HttpResponse::Ok()
      .cookie(session_cookie(&app_state.config, session.token))
      .json(MessageResponse::new("Logged in successfully")),
  )
}

#[instrument(name = "handler::logout", skip(app_state, auth_user), fields(user_id = auth_user.identity.user_id))]
pub async fn logout_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let mut conn = app_state.db_pool.acquire().await?;
  session_service::logout(&mut conn, &auth_user.identity).await?;

  Ok(
    HttpResponse::Ok()
      .cookie(removal_cookie(&app_state.config))
      .json(MessageResponse::new("Logout successfully")),
  )
}
