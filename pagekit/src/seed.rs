//! Loading a [`MemoryStore`] from a JSON file

use std::path::Path;

use crate::error::{Error, Result};
use crate::store::MemoryStore;

/// Read a JSON array of objects from `path` into a new store.
///
/// Documents keep the file's order, which is also their identifier order.
///
/// # Errors
///
/// [`Error::Io`] when the file cannot be read, [`Error::Seed`] when it is
/// not a JSON array of objects.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<MemoryStore> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Seed(format!("{}: {}", path.display(), e)))?;
    let store = MemoryStore::from_json(value)
        .map_err(|e| Error::Seed(format!("{}: {}", path.display(), e.message)))?;

    tracing::info!(path = %path.display(), documents = store.len().await, "Seed data loaded");
    Ok(store)
}
