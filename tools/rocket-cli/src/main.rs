//! Rocket CLI - Command line storefront cart for Rocket Shoes.
//!
//! Commands:
//! - `rocket products` - List the catalog
//! - `rocket cart` - Show the cart
//! - `rocket add <id>` - Add one unit of a product
//! - `rocket remove <id>` - Remove a product
//! - `rocket update <id> <amount>` - Set a product's amount
//! - `rocket config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, ConfigArgs, RemoveArgs, UpdateArgs};

/// Rocket CLI - Browse the storefront and manage your cart
#[derive(Parser)]
#[command(name = "rocket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalog
    Products,

    /// Show the cart
    Cart,

    /// Add one unit of a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set the amount of a product in the cart
    Update(UpdateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    logging::init(&ctx.config.log, ctx.output.is_verbose());
    ctx.output
        .debug(&format!("storefront api: {}", ctx.config.api.base_url));

    // Execute command
    let result = match cli.command {
        Commands::Products => commands::products::run(&ctx).await,
        Commands::Cart => commands::cart::show(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Update(args) => commands::cart::update(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        // Rejected cart mutations were already shown by the notifier.
        if commands::already_reported(&e) {
            ctx.output.debug(&format!("{:#}", e));
        } else {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}
