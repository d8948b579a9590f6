// shop/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart_item;
pub mod product;
pub mod session;
pub mod user;

pub use cart_item::{CartItem, CartLine};
pub use product::{NewProduct, Product, ProductPatch, ProductSummary};
pub use session::{CurrentUser, Session};
pub use user::User;
