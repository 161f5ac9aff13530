//! Fierce Core - Shared types library.
//!
//! This crate provides the domain types used across all Fierce components:
//! - `client` - Session store, API client and view models
//! - `cli` - Command-line front end for the storefront and admin dashboard
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and lets the route gate be
//! tested without any runtime.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, products, orders, statuses and sessions
//! - [`routing`] - The route gate deciding which screen a navigation may reach

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod routing;
pub mod types;

pub use routing::{Navigation, Route};
pub use types::*;
