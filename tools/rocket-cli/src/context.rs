//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use rocket_cart::CartManager;
use rocket_fetch::{FetchClient, StorefrontApi};
use rocket_store::FileStore;

use crate::config::CliConfig;
use crate::output::{ConsoleNotifier, Output};

/// Config file names searched for, in order, in each directory.
const CONFIG_NAMES: [&str; 3] = ["rocket.toml", ".rocket.toml", "rocket.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => find_config(&cwd).unwrap_or_default(),
        };

        Ok(Self {
            config: config.with_env_overrides(),
            output,
            cwd,
        })
    }

    /// Directory holding the persisted cart.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Client for the storefront API.
    pub fn api(&self) -> Result<StorefrontApi> {
        let mut http = reqwest::Client::builder();
        if let Some(secs) = self.config.api.timeout_secs {
            http = http.timeout(Duration::from_secs(secs));
        }
        let http = http.build().context("Failed to create HTTP client")?;

        Ok(StorefrontApi::from_client(
            FetchClient::with_http_client(http)
                .with_base_url(self.config.api.base_url.clone())
                .with_default_header("Accept", "application/json"),
        ))
    }

    /// Cart manager backed by the storefront API and the local file store.
    pub fn cart_manager(&self) -> Result<CartManager> {
        let api = Arc::new(self.api()?);
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;

        Ok(CartManager::new(api.clone(), api, Arc::new(store))
            .with_notifier(Arc::new(ConsoleNotifier::new(self.output.clone()))))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Path of the nearest config file, walking up from `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find and load config from the directory tree.
fn find_config(start: &Path) -> Option<CliConfig> {
    let path = find_config_file(start)?;
    CliConfig::load(path.to_str()?).ok()
}
