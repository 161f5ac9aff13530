//! Admin resources and the calls that read and write them.
//!
//! ```text
//! GET  /admin/products               - list products   -> { "products": [...] }
//! POST /admin/products               - create product
//! GET  /admin/orders                 - list orders     -> { "orders": [...] }
//! PUT  /admin/orders/{id}/approve    - approve order
//! ```
//!
//! Every call checks for the required token first and fails with
//! [`ClientError::MissingCredential`] without touching the network.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use fierce_core::{NewProduct, Order, OrderId, Product};

use crate::api::ApiClient;
use crate::error::{ClientError, Operation, Result};
use crate::session::TokenKind;

/// A collection the backend lists under a JSON envelope field.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Collection path, relative to the API base.
    const PATH: &'static str;
    /// Field of the list response holding the items.
    const ENVELOPE: &'static str;
    /// Operation used to word fetch failures.
    const FETCH: Operation;
}

impl Resource for Product {
    const PATH: &'static str = "admin/products";
    const ENVELOPE: &'static str = "products";
    const FETCH: Operation = Operation::FetchProducts;
}

impl Resource for Order {
    const PATH: &'static str = "admin/orders";
    const ENVELOPE: &'static str = "orders";
    const FETCH: Operation = Operation::FetchOrders;
}

/// Fail fast when the session has no token of `kind`.
fn require_token(api: &ApiClient, kind: TokenKind) -> Result<()> {
    if api.session().get_token(kind).is_none() {
        tracing::debug!(?kind, "No token for protected call");
        return Err(ClientError::MissingCredential);
    }
    Ok(())
}

/// Fetch the whole collection of `R`.
///
/// A response without the envelope field (or with `null` in it) is an empty
/// list.
///
/// # Errors
///
/// `ClientError::MissingCredential` without a token; otherwise whatever
/// [`ApiClient::request`] returns.
#[instrument(skip(api), fields(resource = R::ENVELOPE))]
pub async fn fetch_list<R: Resource>(api: &ApiClient, kind: TokenKind) -> Result<Vec<R>> {
    require_token(api, kind)?;
    let body: Value = api.get(R::PATH, kind).await?;
    let items = list_from_envelope(body, R::ENVELOPE)?;
    tracing::debug!(count = items.len(), "Fetched list");
    Ok(items)
}

fn list_from_envelope<R: DeserializeOwned>(mut body: Value, field: &str) -> Result<Vec<R>> {
    match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => Ok(serde_json::from_value(items)?),
    }
}

/// Create a product.
///
/// # Errors
///
/// `ClientError::MissingCredential` without an admin token; otherwise
/// whatever [`ApiClient::request`] returns.
#[instrument(skip(api, product), fields(name = %product.name))]
pub async fn create_product(api: &ApiClient, product: &NewProduct) -> Result<()> {
    require_token(api, TokenKind::Admin)?;
    let _: Value = api.post(Product::PATH, product, TokenKind::Admin).await?;
    tracing::info!("Product created");
    Ok(())
}

/// Move an order from pending to approved.
///
/// # Errors
///
/// `ClientError::MissingCredential` without an admin token; otherwise
/// whatever [`ApiClient::request`] returns.
#[instrument(skip(api))]
pub async fn approve_order(api: &ApiClient, order_id: OrderId) -> Result<()> {
    require_token(api, TokenKind::Admin)?;
    let path = format!("{}/{order_id}/approve", Order::PATH);
    let _: Value = api.put(&path, TokenKind::Admin).await?;
    tracing::info!("Order approved");
    Ok(())
}
