//! Storefront catalog command.

use fierce_client::{Catalog, ClientConfig};

use super::{CommandError, api_client, reported};

/// List products the way the storefront products page does.
///
/// # Errors
///
/// Returns `CommandError::Client` with the inline message on failure.
pub async fn list(config: &ClientConfig) -> Result<(), CommandError> {
    let catalog = Catalog::new(api_client(config)?);
    let result = catalog.fetch_products().await;
    let state = catalog.snapshot().await;
    if let Err(err) = result {
        return Err(reported(&err, state.error));
    }

    if state.products.is_empty() {
        tracing::info!("No products to display");
    }
    for product in &state.products {
        tracing::info!(
            "{name} - {price} ({stock} in stock)",
            name = product.name,
            price = product.price,
            stock = product.stock
        );
    }
    Ok(())
}
