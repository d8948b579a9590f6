// shop/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One unit of one product in one user's cart.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
  pub id: i64,
  pub user_id: i64,
  pub product_id: i64,
  pub added_at: DateTime<Utc>,
}

/// Cart item joined with the product it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
  pub id: i64,
  pub user_id: i64,
  pub product_id: i64,
  pub product_name: String,
  pub product_price: f64,
}
