//! Product listing.

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::output::format_price;

/// List the catalog, with how many of each product are already in the cart.
pub async fn run(ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let products = api
        .list_products()
        .await
        .with_context(|| format!("Failed to list products from {}", ctx.config.api.base_url))?;
    let cart = ctx.cart_manager()?.cart();

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header("Products");
    let widths = [4, 40, 14, 8];
    ctx.output.table_row(&["ID", "NAME", "PRICE", "IN CART"], &widths);
    for product in &products {
        let in_cart = cart
            .find(product.id)
            .map(|item| item.amount.to_string())
            .unwrap_or_default();
        ctx.output.table_row(
            &[
                &product.id.to_string(),
                &product.name,
                &format_price(product.price),
                &in_cart,
            ],
            &widths,
        );
    }

    Ok(())
}
