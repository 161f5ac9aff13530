//! Core types for Fierce.
//!
//! This module provides type-safe wrappers for the shop's domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod session;
pub mod status;

pub use id::*;
pub use order::Order;
pub use price::{Price, PriceError};
pub use product::{FormError, FormField, NewProduct, Product, ProductForm};
pub use session::Session;
pub use status::*;
