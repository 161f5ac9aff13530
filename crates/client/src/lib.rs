//! Fierce client library.
//!
//! Everything a storefront or admin front end needs besides rendering:
//!
//! - [`config`] - Environment-driven configuration
//! - [`session`] - Persisted session/token store
//! - [`api`] - Authenticated JSON client for the backend REST API
//! - [`resources`] - Product and order calls
//! - [`dashboard`] - Admin dashboard view model (lists, add-product form, approvals)
//! - [`catalog`] - Storefront product listing view model
//!
//! # Example
//!
//! ```rust,ignore
//! use fierce_client::{AdminDashboard, ApiClient, ClientConfig, FileStore, SessionStore};
//!
//! let config = ClientConfig::from_env()?;
//! let session = SessionStore::new(FileStore::open(&config.session_file)?);
//! let api = ApiClient::new(&config, session)?;
//!
//! let mut dashboard = AdminDashboard::mount(api);
//! dashboard.settle().await;
//! dashboard.approve_order(OrderId::new(42)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod resources;
pub mod session;
pub mod view;

pub use api::ApiClient;
pub use catalog::{Catalog, CatalogState};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::{AdminDashboard, DashboardState};
pub use error::{ClientError, Operation};
pub use session::{FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError, TokenKind};
