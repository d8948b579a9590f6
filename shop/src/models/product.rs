// shop/src/models/product.rs

use serde::Serialize;
use sqlx::FromRow;

use crate::errors::{AppError, Result};

/// Full product record, as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub price: f64,
  pub description: String,
}

/// Listing view of a product. Descriptions are only served by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ProductSummary {
  pub id: i64,
  pub name: String,
  pub price: f64,
}

/// A validated product about to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub price: f64,
  pub description: String,
}

impl NewProduct {
  pub fn new(name: String, price: f64, description: Option<String>) -> Result<Self> {
    validate_name(&name)?;
    validate_price(price)?;
    Ok(Self {
      name,
      price,
      description: description.unwrap_or_default(),
    })
  }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
  pub name: Option<String>,
  pub price: Option<f64>,
  pub description: Option<String>,
}

impl ProductPatch {
  pub fn new(name: Option<String>, price: Option<f64>, description: Option<String>) -> Result<Self> {
    if let Some(name) = name.as_deref() {
      validate_name(name)?;
    }
    if let Some(price) = price {
      validate_price(price)?;
    }
    Ok(Self {
      name,
      price,
      description,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.price.is_none() && self.description.is_none()
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(AppError::Validation("Product name cannot be empty".to_string()));
  }
  Ok(())
}

fn validate_price(price: f64) -> Result<()> {
  if !price.is_finite() || price < 0.0 {
    return Err(AppError::Validation(format!(
      "Product price must be a non-negative number, got {}",
      price
    )));
  }
  Ok(())
}
