//! Storefront product catalog.
//!
//! The products page lists the same collection as the dashboard but only
//! needs a general session token.

use std::sync::Arc;

use tokio::sync::RwLock;

use fierce_core::Product;

use crate::api::ApiClient;
use crate::error::{Operation, Result};
use crate::resources;
use crate::session::TokenKind;
use crate::view::ViewTasks;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub error: Option<String>,
}

/// Product listing shown on `/products`.
#[derive(Debug)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
    tasks: ViewTasks,
}

#[derive(Debug)]
struct CatalogInner {
    api: ApiClient,
    state: RwLock<CatalogState>,
}

impl Catalog {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                api,
                state: RwLock::new(CatalogState::default()),
            }),
            tasks: ViewTasks::new(),
        }
    }

    /// Open the catalog and start loading products.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn mount(api: ApiClient) -> Self {
        let mut catalog = Self::new(api);
        let inner = Arc::clone(&catalog.inner);
        catalog.tasks.spawn(async move {
            let _ = inner.fetch_products().await;
        });
        catalog
    }

    pub async fn settle(&mut self) {
        self.tasks.settle().await;
    }

    pub fn unmount(mut self) {
        self.tasks.cancel();
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.inner.state.read().await.clone()
    }

    /// Reload the product list.
    ///
    /// # Errors
    ///
    /// Returns the failure after surfacing it as the inline error.
    pub async fn fetch_products(&self) -> Result<()> {
        self.inner.fetch_products().await
    }
}

impl CatalogInner {
    async fn fetch_products(&self) -> Result<()> {
        match resources::fetch_list::<Product>(&self.api, TokenKind::General).await {
            Ok(products) => {
                self.state.write().await.products = products;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Catalog fetch failed");
                self.state.write().await.error = Some(err.user_message(Operation::FetchProducts));
                Err(err)
            }
        }
    }
}
