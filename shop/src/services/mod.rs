// shop/src/services/mod.rs

//! Business operations. Every function takes the connection (or transaction) it
//! runs on; callers decide the transaction boundary.

pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod session_service;
pub mod user_service;
