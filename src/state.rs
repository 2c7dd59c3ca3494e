use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::refine::refine;
use crate::query::QueryService;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// State shared by every request handler.
///
/// The query service wraps an immutable table, so cloning the state only
/// bumps a reference count and no locking is involved.
#[derive(Debug, Clone)]
pub struct AppState {
    pub queries: Arc<QueryService>,
}

impl AppState {
    pub fn new(queries: QueryService) -> Self {
        Self {
            queries: Arc::new(queries),
        }
    }

    /// Load and refine the configured dataset.
    ///
    /// A failure does not abort startup: the service comes up in the
    /// data-unavailable state and every data query answers with an error.
    pub fn load(config: &Config) -> Self {
        log::info!("Loading dataset from {}", config.data.display());
        let queries = QueryService::from_load(load_dataset(config));
        if queries.is_available() {
            log::info!("Dataset loaded successfully");
        }
        Self::new(queries)
    }
}

fn load_dataset(config: &Config) -> Result<Table> {
    let options = config.refine_options()?;
    let table = load_file(&config.data)?;
    refine(table, &options).context("refining dataset")
}
