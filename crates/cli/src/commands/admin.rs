//! Admin dashboard commands.
//!
//! # Usage
//!
//! ```bash
//! # Show orders and products
//! fierce dashboard
//!
//! # Add a product
//! fierce products add --name Widget --price 9.99 --stock 5 --image https://cdn.example.com/w.png
//!
//! # Approve an order
//! fierce orders approve 42
//! ```
//!
//! All of these need an admin session (`fierce login --admin`).

use fierce_client::{AdminDashboard, ClientConfig, ClientError};
use fierce_core::{FormField, OrderId};

use super::{CommandError, api_client, reported};

/// Fields for `products add`, as typed by the user.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: String,
    pub stock: String,
    pub image: String,
}

/// Load and print the dashboard.
///
/// # Errors
///
/// Returns `CommandError::Client` with the inline error if either list failed
/// to load.
pub async fn show(config: &ClientConfig) -> Result<(), CommandError> {
    let mut dashboard = AdminDashboard::mount(api_client(config)?);
    dashboard.settle().await;
    let state = dashboard.snapshot().await;

    tracing::info!("Orders ({})", state.orders.len());
    for order in &state.orders {
        tracing::info!(
            "  #{id} {customer} {total} [{status}] {date}",
            id = order.id,
            customer = order.customer_name,
            total = order.total,
            status = order.status,
            date = order.order_date.format("%Y-%m-%d %H:%M")
        );
    }

    tracing::info!("Products ({})", state.products.len());
    for product in &state.products {
        tracing::info!(
            "  #{id} {name} {price} stock={stock}",
            id = product.id,
            name = product.name,
            price = product.price,
            stock = product.stock
        );
    }

    match state.error {
        Some(message) => Err(CommandError::Client(message)),
        None => Ok(()),
    }
}

/// Fill the add-product form and submit it.
///
/// # Errors
///
/// Returns `CommandError::Client` with the inline error if the form is
/// invalid or the backend rejects it.
pub async fn add_product(config: &ClientConfig, input: ProductInput) -> Result<(), CommandError> {
    let dashboard = AdminDashboard::new(api_client(config)?);
    dashboard.set_form_field(FormField::Name, input.name).await;
    dashboard.set_form_field(FormField::Price, input.price).await;
    dashboard.set_form_field(FormField::Stock, input.stock).await;
    dashboard.set_form_field(FormField::Image, input.image).await;

    finish(&dashboard, dashboard.submit_product_form().await).await?;

    let products = dashboard.products().await;
    tracing::info!("Product added; {} products listed", products.len());
    Ok(())
}

/// Approve an order and print its refreshed status.
///
/// # Errors
///
/// Returns `CommandError::Client` with the inline error if the approval fails.
pub async fn approve_order(config: &ClientConfig, order_id: OrderId) -> Result<(), CommandError> {
    let dashboard = AdminDashboard::new(api_client(config)?);
    finish(&dashboard, dashboard.approve_order(order_id).await).await?;

    match dashboard
        .orders()
        .await
        .into_iter()
        .find(|order| order.id == order_id)
    {
        Some(order) => tracing::info!("Order #{order_id} is now {}", order.status),
        None => tracing::info!("Order #{order_id} approved"),
    }
    Ok(())
}

async fn finish(
    dashboard: &AdminDashboard,
    result: Result<(), ClientError>,
) -> Result<(), CommandError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => Err(reported(&err, dashboard.error().await)),
    }
}
