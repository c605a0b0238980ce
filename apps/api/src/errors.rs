use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failures that end a write-path run.
///
/// `DocumentAccess` and `ModelService` abort before anything is written.
/// `Persistence` is terminal for the run but the `extract` binary logs it and
/// exits cleanly; the last good artifact keeps being served.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Document access error ({}): {message}", path.display())]
    DocumentAccess { path: PathBuf, message: String },

    #[error("Model service error: {0}")]
    ModelService(#[from] LlmError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// The model's reply could not be turned into a JSON object.
/// Never escapes the sanitizer; it is logged and downgraded to `{}`.
#[derive(Debug, Error)]
pub enum ResponseFormatError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is valid JSON but a {0}, not an object")]
    NotAnObject(&'static str),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Read-path failures. These never surface as a transport error: the
/// response is always 200 with the message under an `error` key, which is
/// the contract the front end checks for.
#[derive(Debug, Error)]
pub enum ServingError {
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored artifact is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("stored artifact is not a JSON object")]
    NotAnObject,
}

impl IntoResponse for ServingError {
    fn into_response(self) -> Response {
        tracing::warn!("Serving error: {self}");
        (StatusCode::OK, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Short name of a JSON value's kind, for diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
