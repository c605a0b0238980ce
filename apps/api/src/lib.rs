//! Résumé extraction: PDF text → generative model → sanitized JSON record,
//! persisted to a file (latest) and optionally PostgreSQL (history), and
//! served back over HTTP.

pub mod config;
pub mod db;
pub mod errors;
pub mod extraction;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set: this crate at `info`.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Installs structured logging for either binary. `RUST_LOG` is the only
/// override.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
