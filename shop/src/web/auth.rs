// shop/src/web/auth.rs

//! Session cookie handling at the HTTP boundary.
//!
//! `resolve_session` runs in front of every route: if the request carries a
//! session cookie that maps to a live session, the resulting `CurrentUser` is
//! stored in the request extensions. Protected handlers take
//! `AuthenticatedUser` as their first argument, which fails with
//! `Unauthenticated` when no identity was attached.

use actix_web::{
  body::MessageBody,
  cookie::{Cookie, SameSite},
  dev::{Payload, ServiceRequest, ServiceResponse},
  middleware::Next,
  web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ready, Ready};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::CurrentUser;
use crate::services::session_service;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub identity: CurrentUser,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    match req.extensions().get::<CurrentUser>() {
      Some(identity) => ready(Ok(AuthenticatedUser {
        identity: identity.clone(),
      })),
      None => {
        debug!(path = %req.path(), "Protected route called without a live session.");
        ready(Err(AppError::Unauthenticated))
      }
    }
  }
}

/// Middleware attaching the caller's identity, if any, to the request.
pub async fn resolve_session(
  req: ServiceRequest,
  next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
  let state = req.app_data::<web::Data<AppState>>().cloned();

  if let Some(state) = state {
    if let Some(cookie) = req.cookie(&state.config.session_cookie_name) {
      let mut conn = state.db_pool.acquire().await.map_err(AppError::from)?;
      match session_service::current_user(&mut conn, cookie.value()).await {
        Ok(identity) => {
          req.extensions_mut().insert(identity);
        }
        Err(AppError::Unauthenticated) => {
          debug!("Ignoring stale session cookie.");
        }
        Err(other) => return Err(other.into()),
      }
    }
  } else {
    warn!("AppState missing from app data; sessions cannot be resolved.");
  }

  next.call(req).await
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
  Cookie::build(config.session_cookie_name.clone(), token)
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(config.session_cookie_secure)
    .finish()
}

/// Cookie instructing the client to drop its session token.
pub fn removal_cookie(config: &AppConfig) -> Cookie<'static> {
  let mut cookie = session_cookie(config, String::new());
  cookie.make_removal();
  cookie
}
