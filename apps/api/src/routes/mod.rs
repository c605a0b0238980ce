pub mod artifacts;

use axum::{routing::get, Router};

use crate::state::AppState;

pub const EXTRACTED_DATA_PATH: &str = "/get-extracted-data";
pub const PDF_PATH: &str = "/get-pdf";

/// Read-only surface: the latest artifact and the document it came from.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(EXTRACTED_DATA_PATH, get(artifacts::handle_get_extracted_data))
        .route(PDF_PATH, get(artifacts::handle_get_pdf))
        .with_state(state)
}
