// shop/src/web/dto.rs

//! Request and response bodies, one type per endpoint.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{AppError, Result};
use crate::models::{CartItem, NewProduct, Product, ProductPatch};

// --- Request DTOs ---

/// Missing fields are treated as a failed login, not as malformed input.
#[derive(Deserialize, Debug, Default)]
pub struct LoginRequestPayload {
  pub username: Option<String>,
  pub password: Option<String>,
}

impl LoginRequestPayload {
  pub fn credentials(&self) -> Result<(&str, &str)> {
    match (self.username.as_deref(), self.password.as_deref()) {
      (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => Ok((username, password)),
      _ => Err(AppError::InvalidCredentials),
    }
  }
}

#[derive(Deserialize, Debug)]
pub struct AddProductRequestPayload {
  pub name: Option<String>,
  pub price: Option<f64>,
  pub description: Option<String>,
}

impl TryFrom<AddProductRequestPayload> for NewProduct {
  type Error = AppError;

  fn try_from(payload: AddProductRequestPayload) -> Result<Self> {
    match (payload.name, payload.price) {
      (Some(name), Some(price)) => NewProduct::new(name, price, payload.description),
      _ => Err(AppError::Validation("Invalid product data: name and price are required".to_string())),
    }
  }
}

/// Each field is `None` when absent and `Some(None)` when sent as `null`.
#[derive(Deserialize, Debug, Default)]
pub struct UpdateProductRequestPayload {
  #[serde(default, deserialize_with = "present")]
  pub name: Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub price: Option<Option<f64>>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
}

impl TryFrom<UpdateProductRequestPayload> for ProductPatch {
  type Error = AppError;

  /// Absent fields are left unchanged; an explicit `null` is rejected.
  fn try_from(payload: UpdateProductRequestPayload) -> Result<Self> {
    ProductPatch::new(
      not_null("name", payload.name)?,
      not_null("price", payload.price)?,
      not_null("description", payload.description)?,
    )
  }
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

fn not_null<T>(field: &str, value: Option<Option<T>>) -> Result<Option<T>> {
  match value {
    Some(None) => Err(AppError::Validation(format!("Invalid product data: {} cannot be null", field))),
    Some(Some(value)) => Ok(Some(value)),
    None => Ok(None),
  }
}

// --- Response DTOs ---

#[derive(Serialize, Debug)]
pub struct MessageResponse {
  pub message: &'static str,
}

impl MessageResponse {
  pub fn new(message: &'static str) -> Self {
    Self { message }
  }
}

#[derive(Serialize, Debug)]
pub struct ProductMutationResponse {
  pub message: &'static str,
  pub product: Product,
}

#[derive(Serialize, Debug)]
pub struct CartItemAddedResponse {
  pub message: &'static str,
  pub cart_item: CartItem,
}
