// shop/src/services/cart_service.rs

//! Cart operations. The acting user is always the `CurrentUser` passed in; there
//! is no way to reach another user's rows through this module.

use chrono::Utc;
use sqlx::{FromRow, SqliteConnection};
use tracing::{info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartLine, CurrentUser};

#[derive(Debug, FromRow)]
struct CartLineRow {
  id: i64,
  user_id: i64,
  product_id: i64,
  product_name: Option<String>,
  product_price: Option<f64>,
}

/// Adds one unit of `product_id` to the caller's cart.
///
/// The existence checks and the insert are one statement, so the write never
/// starts from a stale read.
#[instrument(name = "cart_service::add_to_cart", skip(conn, identity), fields(user_id = identity.user_id), err(Display))]
pub async fn add_to_cart(conn: &mut SqliteConnection, identity: &CurrentUser, product_id: i64) -> Result<CartItem> {
  let item = sqlx::query_as::<_, CartItem>(
    "INSERT INTO cart_items (user_id, product_id, added_at) \
     SELECT ?, ?, ? \
     WHERE EXISTS (SELECT 1 FROM users WHERE id = ?) AND EXISTS (SELECT 1 FROM products WHERE id = ?) \
     RETURNING id, user_id, product_id, added_at",
  )
  .bind(identity.user_id)
  .bind(product_id)
  .bind(Utc::now())
  .bind(identity.user_id)
  .bind(product_id)
  .fetch_optional(&mut *conn)
  .await?;

  match item {
    Some(item) => {
      info!(cart_item_id = item.id, "Item added to cart.");
      Ok(item)
    }
    None => {
      warn!("Cannot add item to cart: user or product does not exist.");
      Err(AppError::InvalidOperation("Failed to add item to the cart".to_string()))
    }
  }
}

/// Removes one unit of `product_id` (the oldest row) from the caller's cart.
///
/// Select and delete are one statement, so concurrent removals never both claim
/// the same row.
#[instrument(name = "cart_service::remove_from_cart", skip(conn, identity), fields(user_id = identity.user_id), err(Display))]
pub async fn remove_from_cart(
  conn: &mut SqliteConnection,
  identity: &CurrentUser,
  product_id: i64,
) -> Result<CartItem> {
  let removed = sqlx::query_as::<_, CartItem>(
    "DELETE FROM cart_items WHERE id = ( \
       SELECT id FROM cart_items WHERE user_id = ? AND product_id = ? ORDER BY id LIMIT 1 \
     ) RETURNING id, user_id, product_id, added_at",
  )
  .bind(identity.user_id)
  .bind(product_id)
  .fetch_optional(&mut *conn)
  .await?;

  match removed {
    Some(item) => {
      info!(cart_item_id = item.id, "Item removed from cart.");
      Ok(item)
    }
    None => {
      warn!("Product is not in the cart.");
      Err(AppError::InvalidOperation(
        "Failed to remove item from the cart".to_string(),
      ))
    }
  }
}

/// Lists the caller's cart with product name and price filled in.
///
/// Rows whose product has since been deleted are skipped.
#[instrument(name = "cart_service::view_cart", skip(conn, identity), fields(user_id = identity.user_id), err(Display))]
pub async fn view_cart(conn: &mut SqliteConnection, identity: &CurrentUser) -> Result<Vec<CartLine>> {
  let rows = sqlx::query_as::<_, CartLineRow>(
    "SELECT c.id, c.user_id, c.product_id, p.name AS product_name, p.price AS product_price \
     FROM cart_items c LEFT JOIN products p ON p.id = c.product_id \
     WHERE c.user_id = ? ORDER BY c.id",
  )
  .bind(identity.user_id)
  .fetch_all(&mut *conn)
  .await?;

  let lines: Vec<CartLine> = rows
    .into_iter()
    .filter_map(|row| match (row.product_name, row.product_price) {
      (Some(product_name), Some(product_price)) => Some(CartLine {
        id: row.id,
        user_id: row.user_id,
        product_id: row.product_id,
        product_name,
        product_price,
      }),
      _ => {
        warn!(cart_item_id = row.id, product_id = row.product_id, "Skipping orphaned cart item.");
        None
      }
    })
    .collect();

  Ok(lines)
}

/// Clears the caller's cart in a single statement and returns how many rows went.
#[instrument(name = "cart_service::checkout", skip(conn, identity), fields(user_id = identity.user_id), err(Display))]
pub async fn checkout(conn: &mut SqliteConnection, identity: &CurrentUser) -> Result<u64> {
  let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
    .bind(identity.user_id)
    .execute(&mut *conn)
    .await?;

  let cleared = result.rows_affected();
  info!(cleared, "Cart checked out.");
  Ok(cleared)
}
