use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use pagekit::http::{self, Server};
use pagekit::observability::init_tracing;

use super::{load_config, load_store};

pub async fn execute(config_path: Option<PathBuf>, seed: PathBuf) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    init_tracing(&config)?;

    let store = load_store(&seed).await?;
    let app = http::router(Arc::new(store), config.pagination);

    Server::new(config).serve(app).await?;
    Ok(())
}
