//! Axum handlers for the read path.
//!
//! Both endpoints answer 200 even on failure, with the reason under an
//! `error` key. The front end depends on that shape.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::io::ReaderStream;

use crate::errors::ServingError;
use crate::routes::PDF_PATH;
use crate::state::AppState;

/// Body of `GET /get-extracted-data`. Serialized untagged, so the client
/// sees either the record (plus `pdf_url`) or `{"error": "..."}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExtractedDataResponse {
    Data(Map<String, Value>),
    Error { error: String },
}

impl From<Result<Map<String, Value>, ServingError>> for ExtractedDataResponse {
    fn from(result: Result<Map<String, Value>, ServingError>) -> Self {
        match result {
            Ok(data) => ExtractedDataResponse::Data(data),
            Err(e) => {
                tracing::warn!("Serving error: {e}");
                ExtractedDataResponse::Error {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Loads the artifact and adds the `pdf_url` field. The URL is built here,
/// never stored.
pub async fn load_extracted_data(state: &AppState) -> Result<Map<String, Value>, ServingError> {
    let mut data = state.artifact.load().await?.into_map();
    data.insert(
        "pdf_url".to_string(),
        Value::String(format!("{}{}", state.public_base_url, PDF_PATH)),
    );
    Ok(data)
}

/// GET /get-extracted-data
pub async fn handle_get_extracted_data(
    State(state): State<AppState>,
) -> Json<ExtractedDataResponse> {
    Json(load_extracted_data(&state).await.into())
}

/// GET /get-pdf
///
/// Streams the source document unmodified, marked for inline display.
pub async fn handle_get_pdf(State(state): State<AppState>) -> Result<Response, ServingError> {
    let file = tokio::fs::File::open(&state.pdf_path)
        .await
        .map_err(|source| ServingError::Read {
            path: state.pdf_path.clone(),
            source,
        })?;

    let filename = state
        .pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .unwrap_or_else(|| "document.pdf".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{build_router, EXTRACTED_DATA_PATH};
    use crate::store::file::FileStore;
    use axum::http::{Request, StatusCode};
    use bytes::Bytes;
    use tower::ServiceExt;

    fn state_in(dir: &std::path::Path) -> AppState {
        AppState {
            artifact: FileStore::new(dir.join("raw_api_response.json")),
            pdf_path: dir.join("MasonCV.pdf"),
            public_base_url: "http://127.0.0.1:5000".to_string(),
        }
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, axum::http::HeaderMap, Bytes) {
        let response = build_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_extracted_data_includes_pdf_url() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        std::fs::write(
            state.artifact.path(),
            "{\n    \"name\": \"Jane Doe\",\n    \"skills\": [\"Rust\"]\n}",
        )
        .unwrap();

        let (status, _, body) = get(state, EXTRACTED_DATA_PATH).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["name"], "Jane Doe");
        assert_eq!(value["skills"][0], "Rust");
        assert_eq!(value["pdf_url"], "http://127.0.0.1:5000/get-pdf");
        assert!(value.get("error").is_none());
    }

    #[tokio::test]
    async fn test_missing_artifact_is_embedded_error_with_status_ok() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, body) = get(state_in(dir.path()), EXTRACTED_DATA_PATH).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object["error"].as_str().unwrap().contains("raw_api_response.json"));
    }

    #[tokio::test]
    async fn test_corrupt_artifact_is_embedded_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        std::fs::write(state.artifact.path(), "{\"name\": \"Jane").unwrap();

        let (status, _, body) = get(state, EXTRACTED_DATA_PATH).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].is_string());
        assert!(value.get("pdf_url").is_none());
    }

    #[tokio::test]
    async fn test_pdf_is_served_unmodified_inline() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        let pdf_bytes: Vec<u8> = b"%PDF-1.4\n\x00\xff binary body\n%%EOF".to_vec();
        std::fs::write(&state.pdf_path, &pdf_bytes).unwrap();

        let (status, headers, body) = get(state, PDF_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "inline; filename=\"MasonCV.pdf\""
        );
        assert_eq!(body.as_ref(), pdf_bytes.as_slice());
    }

    #[tokio::test]
    async fn test_large_pdf_streams_every_byte() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path());
        // Several reader chunks' worth of data.
        let mut pdf_bytes = b"%PDF-1.4\n".to_vec();
        pdf_bytes.extend((0..300_000u32).map(|i| (i % 251) as u8));
        std::fs::write(&state.pdf_path, &pdf_bytes).unwrap();

        let (status, headers, body) = get(state, PDF_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(body.len(), pdf_bytes.len());
        assert_eq!(body.as_ref(), pdf_bytes.as_slice());
    }

    #[tokio::test]
    async fn test_missing_pdf_is_embedded_error() {
        let dir = tempfile::tempdir().unwrap();

        let (status, headers, body) = get(state_in(dir.path()), PDF_PATH).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("MasonCV.pdf"));
    }

    #[test]
    fn test_response_serializes_untagged() {
        let ok = ExtractedDataResponse::from(Ok(Map::new()));
        assert_eq!(serde_json::to_string(&ok).unwrap(), "{}");

        let err = ExtractedDataResponse::from(Err(ServingError::NotAnObject));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"error": "stored artifact is not a JSON object"})
        );
    }
}
