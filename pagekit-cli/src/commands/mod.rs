pub mod page;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use pagekit::config::Config;
use pagekit::store::MemoryStore;

/// Load configuration from `path`, or from the default search path
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Config::load().context("Failed to load configuration"),
    }
}

/// Load the seed file into a fresh store
pub async fn load_store(seed: &Path) -> Result<MemoryStore> {
    pagekit::seed::load_seed(seed)
        .await
        .with_context(|| format!("Failed to load seed data from {}", seed.display()))
}
