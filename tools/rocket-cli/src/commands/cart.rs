//! Cart commands.

use anyhow::Result;
use rocket_commerce::prelude::*;

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::format_price;

/// Show the stored cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    print_cart(ctx, &manager.cart());
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    manager.add_product(args.product_id).await?;

    let amount = manager
        .cart()
        .find(args.product_id)
        .map(|item| item.amount)
        .unwrap_or_default();
    ctx.output
        .success(&format!("Product {} now in cart ({} units)", args.product_id, amount));
    print_cart(ctx, &manager.cart());
    Ok(())
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    manager.remove_product(args.product_id).await?;

    ctx.output
        .success(&format!("Removed product {}", args.product_id));
    print_cart(ctx, &manager.cart());
    Ok(())
}

/// Set the amount of a product already in the cart.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    manager
        .update_product_amount(UpdateProductAmount::new(args.product_id, args.amount))
        .await?;

    ctx.output.success(&format!(
        "Product {} set to {} units",
        args.product_id, args.amount
    ));
    print_cart(ctx, &manager.cart());
    Ok(())
}

fn print_cart(ctx: &Context, cart: &Cart) {
    if ctx.output.is_json() {
        ctx.output.json(cart);
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let widths = [4, 40, 14, 6, 14];
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &widths);
    for item in cart {
        ctx.output.table_row(
            &[
                &item.id().to_string(),
                &item.product.name,
                &format_price(item.product.price),
                &item.amount.to_string(),
                &format_price(item.subtotal()),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &format_price(cart.subtotal()));
}
