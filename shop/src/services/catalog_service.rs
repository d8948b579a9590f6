// shop/src/services/catalog_service.rs

use sqlx::SqliteConnection;
use tracing::{info, instrument};

use crate::errors::{AppError, Result};
use crate::models::{CurrentUser, NewProduct, Product, ProductPatch, ProductSummary};

#[instrument(
  name = "catalog_service::add_product",
  skip(conn, actor, product),
  fields(actor_id = actor.user_id, name = %product.name),
  err(Display)
)]
pub async fn add_product(conn: &mut SqliteConnection, actor: &CurrentUser, product: NewProduct) -> Result<Product> {
  let created = sqlx::query_as::<_, Product>(
    "INSERT INTO products (name, price, description) VALUES (?, ?, ?) RETURNING id, name, price, description",
  )
  .bind(&product.name)
  .bind(product.price)
  .bind(&product.description)
  .fetch_one(&mut *conn)
  .await?;

  info!(product_id = created.id, "Product added.");
  Ok(created)
}

#[instrument(name = "catalog_service::get_product", skip(conn), err(Display))]
pub async fn get_product(conn: &mut SqliteConnection, product_id: i64) -> Result<Product> {
  find_product(conn, product_id)
    .await?
    .ok_or_else(|| product_not_found(product_id))
}

pub async fn find_product(conn: &mut SqliteConnection, product_id: i64) -> Result<Option<Product>> {
  let product = sqlx::query_as::<_, Product>("SELECT id, name, price, description FROM products WHERE id = ?")
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;
  Ok(product)
}

#[instrument(name = "catalog_service::list_products", skip(conn), err(Display))]
pub async fn list_products(conn: &mut SqliteConnection) -> Result<Vec<ProductSummary>> {
  let products = sqlx::query_as::<_, ProductSummary>("SELECT id, name, price FROM products ORDER BY id")
    .fetch_all(&mut *conn)
    .await?;
  info!(count = products.len(), "Products listed.");
  Ok(products)
}

/// Applies the fields present in `patch`; absent fields keep their stored value.
#[instrument(
  name = "catalog_service::update_product",
  skip(conn, actor, patch),
  fields(actor_id = actor.user_id),
  err(Display)
)]
pub async fn update_product(
  conn: &mut SqliteConnection,
  actor: &CurrentUser,
  product_id: i64,
  patch: ProductPatch,
) -> Result<Product> {
  let updated = sqlx::query_as::<_, Product>(
    "UPDATE products SET \
       name = COALESCE(?, name), \
       price = COALESCE(?, price), \
       description = COALESCE(?, description) \
     WHERE id = ? \
     RETURNING id, name, price, description",
  )
  .bind(patch.name)
  .bind(patch.price)
  .bind(patch.description)
  .bind(product_id)
  .fetch_optional(&mut *conn)
  .await?
  .ok_or_else(|| product_not_found(product_id))?;

  info!("Product updated.");
  Ok(updated)
}

/// Removes the product. Cart rows that reference it are left in place.
#[instrument(
  name = "catalog_service::delete_product",
  skip(conn, actor),
  fields(actor_id = actor.user_id),
  err(Display)
)]
pub async fn delete_product(conn: &mut SqliteConnection, actor: &CurrentUser, product_id: i64) -> Result<()> {
  let result = sqlx::query("DELETE FROM products WHERE id = ?")
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

  if result.rows_affected() == 0 {
    return Err(product_not_found(product_id));
  }
  info!("Product deleted.");
  Ok(())
}

fn product_not_found(product_id: i64) -> AppError {
  AppError::NotFound(format!("Product {} not found", product_id))
}
