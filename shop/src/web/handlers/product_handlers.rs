// shop/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::{NewProduct, ProductPatch};
use crate::services::catalog_service;
use crate::state::AppState;
use crate::web::auth::AuthenticatedUser;
use crate::web::dto::{AddProductRequestPayload, MessageResponse, ProductMutationResponse, UpdateProductRequestPayload};

#[instrument(name = "handler::add_product", skip_all, fields(user_id = auth_user.identity.user_id))]
pub async fn add_product_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddProductRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let new_product = NewProduct::try_from(req_payload.into_inner())?;

  let mut tx = app_state.db_pool.begin().await?;
  let product = catalog_service::add_product(&mut tx, &auth_user.identity, new_product).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(ProductMutationResponse {
    message: "Product added successfully",
    product,
  }))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let mut conn = app_state.db_pool.acquire().await?;
  let product = catalog_service::get_product(&mut conn, product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let mut conn = app_state.db_pool.acquire().await?;
  let products = catalog_service::list_products(&mut conn).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(
  name = "handler::update_product",
  skip_all,
  fields(user_id = auth_user.identity.user_id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
  req_payload: web::Json<UpdateProductRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let patch = ProductPatch::try_from(req_payload.into_inner())?;
  if patch.is_empty() {
    info!("Update request carries no fields; product left unchanged.");
  }

  let mut tx = app_state.db_pool.begin().await?;
  let product = catalog_service::update_product(&mut tx, &auth_user.identity, product_id, patch).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(ProductMutationResponse {
    message: "Product updated successfully",
    product,
  }))
}

#[instrument(
  name = "handler::delete_product",
  skip_all,
  fields(user_id = auth_user.identity.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let mut tx = app_state.db_pool.begin().await?;
  catalog_service::delete_product(&mut tx, &auth_user.identity, product_id).await?;
  tx.commit().await?;

  Ok(HttpResponse::Ok().json(MessageResponse::new("Product deleted successfully")))
}
