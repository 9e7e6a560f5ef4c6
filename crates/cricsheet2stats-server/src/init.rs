// Initialization utilities for the query service
//
// Table loading and logging/tracing setup

use std::sync::Arc;

use cricsheet2stats_config::{LogFormat, RuntimeConfig};
use cricsheet2stats_storage::{StatTables, TableStore};
use tracing::{info, warn};

/// Load the four stats tables once at startup.
///
/// Failure is not fatal: the service stays up and data endpoints answer 500
/// until an aggregation run has produced the tables and the service is
/// restarted.
pub(crate) fn load_tables(config: &RuntimeConfig) -> Option<Arc<StatTables>> {
    let store = TableStore::new(config.data.tables_dir.clone());
    match store.load_all() {
        Ok(tables) => {
            info!(
                "loaded stats tables from {}: {} season batting, {} season bowling, {} career batting, {} career bowling rows",
                store.dir().display(),
                tables.season_batting.len(),
                tables.season_bowling.len(),
                tables.career_batting.len(),
                tables.career_bowling.len()
            );
            Some(Arc::new(tables))
        }
        Err(e) => {
            warn!(
                "stats tables unavailable ({}); data endpoints will return 500 until the aggregation pipeline runs",
                e
            );
            None
        }
    }
}

/// Initialize tracing/logging from RuntimeConfig
pub(crate) fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let server = config.server.clone().unwrap_or_default();

    let env_filter =
        EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match server.log_format {
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        }
        LogFormat::Text => {
            registry.with(fmt::layer()).init();
        }
    }
}
