//! Admin dashboard view model.
//!
//! Holds what the dashboard screen renders: the order and product lists, the
//! add-product form and the inline error. Lists are replaced wholesale on every
//! successful fetch and left as they are when a fetch fails, so a stale list
//! stays visible next to the error. Nothing is updated optimistically.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::instrument;

use fierce_core::{FormField, NewProduct, Order, OrderId, Product, ProductForm, Route};

use crate::api::ApiClient;
use crate::error::{ClientError, Operation, Result};
use crate::resources::{self, Resource};
use crate::session::{StoreError, TokenKind};
use crate::view::ViewTasks;

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub orders: Vec<Order>,
    pub products: Vec<Product>,
    pub form: ProductForm,
    /// Inline error message, if the last failing operation left one.
    pub error: Option<String>,
}

/// The admin dashboard.
///
/// Create with [`AdminDashboard::mount`] to load both lists in the
/// background, as the screen does when it opens. Mount-time fetches are
/// cancelled by [`AdminDashboard::unmount`] or by dropping the dashboard.
#[derive(Debug)]
pub struct AdminDashboard {
    inner: Arc<DashboardInner>,
    tasks: ViewTasks,
}

#[derive(Debug)]
struct DashboardInner {
    api: ApiClient,
    state: RwLock<DashboardState>,
}

impl AdminDashboard {
    /// A dashboard with empty state and nothing in flight.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                api,
                state: RwLock::new(DashboardState::default()),
            }),
            tasks: ViewTasks::new(),
        }
    }

    /// Open the dashboard and start fetching products and orders.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn mount(api: ApiClient) -> Self {
        let mut dashboard = Self::new(api);
        dashboard.refresh();
        dashboard
    }

    /// Start fetching both lists in the background.
    pub fn refresh(&mut self) {
        let inner = Arc::clone(&self.inner);
        self.tasks.spawn(async move {
            let _ = inner.fetch::<Product>().await;
        });
        let inner = Arc::clone(&self.inner);
        self.tasks.spawn(async move {
            let _ = inner.fetch::<Order>().await;
        });
    }

    /// Wait for background fetches to finish.
    pub async fn settle(&mut self) {
        self.tasks.settle().await;
    }

    /// Number of background fetches still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Tear the dashboard down, cancelling anything in flight.
    pub fn unmount(mut self) {
        self.tasks.cancel();
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> DashboardState {
        self.inner.state.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.inner.state.read().await.products.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.inner.state.read().await.orders.clone()
    }

    pub async fn form(&self) -> ProductForm {
        self.inner.state.read().await.form.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.state.read().await.error.clone()
    }

    /// Reload the product list.
    ///
    /// # Errors
    ///
    /// Returns the failure after surfacing it as the inline error.
    pub async fn fetch_products(&self) -> Result<()> {
        self.inner.fetch::<Product>().await
    }

    /// Reload the order list.
    ///
    /// # Errors
    ///
    /// Returns the failure after surfacing it as the inline error.
    pub async fn fetch_orders(&self) -> Result<()> {
        self.inner.fetch::<Order>().await
    }

    /// Update one field of the add-product form.
    pub async fn set_form_field(&self, field: FormField, value: impl Into<String>) {
        self.inner.state.write().await.form.set(field, value);
    }

    /// Validate the form and submit it.
    ///
    /// A form that does not validate is reported inline and nothing is sent.
    ///
    /// # Errors
    ///
    /// `ClientError::Form` for invalid input, otherwise as
    /// [`AdminDashboard::add_product`].
    pub async fn submit_product_form(&self) -> Result<()> {
        let form = self.form().await;
        match form.validate() {
            Ok(product) => self.add_product(&product).await,
            Err(err) => {
                let err = ClientError::from(err);
                self.inner.surface(&err, Operation::AddProduct).await;
                Err(err)
            }
        }
    }

    /// Create a product, then reset the form and reload the product list.
    ///
    /// On failure the form keeps what the user typed so they can retry.
    ///
    /// # Errors
    ///
    /// Returns the create failure after surfacing it as the inline error. A
    /// failed reload after a successful create is only surfaced inline.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn add_product(&self, product: &NewProduct) -> Result<()> {
        if let Err(err) = resources::create_product(&self.inner.api, product).await {
            self.inner.surface(&err, Operation::AddProduct).await;
            return Err(err);
        }

        {
            let mut state = self.inner.state.write().await;
            state.form = ProductForm::default();
            state.error = None;
        }

        if let Err(err) = self.fetch_products().await {
            tracing::debug!(error = %err, "Product list reload failed after create");
        }
        Ok(())
    }

    /// Approve one order, then reload the order list.
    ///
    /// # Errors
    ///
    /// Returns the approve failure after surfacing it as the inline error; the
    /// order list is not touched in that case.
    #[instrument(skip(self))]
    pub async fn approve_order(&self, order_id: OrderId) -> Result<()> {
        if let Err(err) = resources::approve_order(&self.inner.api, order_id).await {
            self.inner.surface(&err, Operation::ApproveOrder).await;
            return Err(err);
        }

        if let Err(err) = self.fetch_orders().await {
            tracing::debug!(error = %err, "Order list reload failed after approve");
        }
        Ok(())
    }

    /// Sign out and return where to go next.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the session could not be cleared.
    pub fn logout(&self) -> std::result::Result<Route, StoreError> {
        self.inner.api.session().clear_session()?;
        Ok(Route::Login)
    }
}

impl DashboardInner {
    async fn fetch<R>(&self) -> Result<()>
    where
        R: Resource,
        DashboardState: Holds<R>,
    {
        match resources::fetch_list::<R>(&self.api, TokenKind::Admin).await {
            Ok(items) => {
                *self.state.write().await.list_mut() = items;
                Ok(())
            }
            Err(err) => {
                self.surface(&err, R::FETCH).await;
                Err(err)
            }
        }
    }

    async fn surface(&self, err: &ClientError, operation: Operation) {
        let message = err.user_message(operation);
        tracing::warn!(error = %err, ?operation, "Dashboard operation failed");
        self.state.write().await.error = Some(message);
    }
}

/// Maps a resource type to the list that holds it.
trait Holds<R> {
    fn list_mut(&mut self) -> &mut Vec<R>;
}

impl Holds<Product> for DashboardState {
    fn list_mut(&mut self) -> &mut Vec<Product> {
        &mut self.products
    }
}

impl Holds<Order> for DashboardState {
    fn list_mut(&mut self) -> &mut Vec<Order> {
        &mut self.orders
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::config::ClientConfig;
    use crate::error::MISSING_CREDENTIAL_MESSAGE;
    use crate::session::SessionStore;

    use super::*;

    fn offline_api() -> ApiClient {
        let config = ClientConfig::from_lookup(|key| {
            (key == "FIERCE_API_URL").then(|| "http://127.0.0.1:9/api/v1".to_string())
        })
        .unwrap();
        ApiClient::new(&config, SessionStore::in_memory()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_orders_without_token() {
        let dashboard = AdminDashboard::new(offline_api());

        let result = dashboard.fetch_orders().await;

        assert!(matches!(result, Err(ClientError::MissingCredential)));
        assert!(dashboard.orders().await.is_empty());
        assert_eq!(
            dashboard.error().await.as_deref(),
            Some(MISSING_CREDENTIAL_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_mount_without_token_sets_error() {
        let mut dashboard = AdminDashboard::mount(offline_api());
        dashboard.settle().await;

        let state = dashboard.snapshot().await;
        assert_eq!(state.error.as_deref(), Some(MISSING_CREDENTIAL_MESSAGE));
        assert!(state.products.is_empty());
        assert!(state.orders.is_empty());
        assert_eq!(dashboard.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_invalid_form_is_reported_and_kept() {
        let dashboard = AdminDashboard::new(offline_api());
        dashboard.set_form_field(FormField::Name, "Widget").await;
        dashboard.set_form_field(FormField::Price, "free").await;

        let result = dashboard.submit_product_form().await;

        assert!(matches!(result, Err(ClientError::Form(_))));
        let state = dashboard.snapshot().await;
        assert_eq!(state.form.name, "Widget");
        assert_eq!(state.form.price, "free");
        assert!(state.error.unwrap().starts_with("invalid price"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let api = offline_api();
        api.session()
            .set_session(&secrecy::SecretString::from("adm".to_string()), true)
            .unwrap();
        let dashboard = AdminDashboard::new(api.clone());

        assert_eq!(dashboard.logout().unwrap(), Route::Login);
        assert!(!api.session().load().is_authenticated());
    }
}
