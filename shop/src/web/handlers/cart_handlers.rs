// shop/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::cart_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::web::dto::{CartItemAddedResponse, MessageResponse};

#[instrument(
  name = "handler::add_to_cart",
  skip_all,
  fields(user_id = auth_user.identity.user_id, product_id = %path.as_ref())
)]
pub async fn add_to_cart_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let mut conn = app_state.db_pool.acquire().await?;
  let cart_item = cart_service::add_to_cart(&mut conn, &auth_user.identity, product_id).await?;

  Ok(HttpResponse::Ok().json(CartItemAddedResponse {
    message: "Item added successfully",
    cart_item,
  }))
}

#[instrument(
  name = "handler::remove_from_cart",
  skip_all,
  fields(user_id = auth_user.identity.user_id, product_id = %path.as_ref())
)]
pub async fn remove_from_cart_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let mut tx = app_state.db_pool.begin().await?;
  cart_service::remove_from_cart(&mut tx, &auth_user.identity, product_id).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(MessageResponse::new("Item removed from the cart successfully")))
}

#[instrument(name = "handler::view_cart", skip_all, fields(user_id = auth_user.identity.user_id))]
pub async fn view_cart_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let mut conn = app_state.db_pool.acquire().await?;
  let lines = cart_service::view_cart(&mut conn, &auth_user.identity).await?;
  Ok(HttpResponse::Ok().json(lines))
}

#[instrument(name = "handler::checkout", skip_all, fields(user_id = auth_user.identity.user_id))]
pub async fn checkout_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
  let mut tx = app_state.db_pool.begin().await?;
  let cleared = cart_service::checkout(&mut tx, &auth_user.identity).await?;
  tx.commit().await?;

  info!(cleared, "Checkout complete.");
  Ok(HttpResponse::Ok().json(MessageResponse::new("Checkout successful. Cart has been cleared.")))
}
