//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};
use rocket_cart::CartError;
use rocket_commerce::ProductId;

/// Whether `error` was already shown to the user by the cart notifier.
pub fn already_reported(error: &anyhow::Error) -> bool {
    error.downcast_ref::<CartError>().is_some()
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product to add one unit of.
    pub product_id: ProductId,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product to remove from the cart.
    pub product_id: ProductId,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product whose amount changes.
    pub product_id: ProductId,

    /// New amount, must be positive.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a default rocket.toml in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_commerce::CommerceError;

    #[test]
    fn test_cart_errors_are_already_reported() {
        let rejected = CartError::from(CommerceError::ItemNotInCart(ProductId::new(1)));
        assert!(already_reported(&anyhow::Error::from(rejected)));
        assert!(!already_reported(&anyhow::anyhow!("Failed to open cart storage")));
    }
}
