use std::path::PathBuf;

use crate::store::file::FileStore;

/// Shared state for the read path. Cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub artifact: FileStore,
    pub pdf_path: PathBuf,
    /// Base the `pdf_url` field is built from, e.g. `http://127.0.0.1:5000`.
    pub public_base_url: String,
}
