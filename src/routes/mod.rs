//! Route modules for the FAIR capture server

pub mod documents;
pub mod fields;
pub mod form;
pub mod health;

use axum::extract::multipart::Field;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// Full application router (without transport layers)
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config().server.max_upload_mb * 1024 * 1024);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/fields", fields::router().layer(upload_limit.clone()))
        .nest("/api/v1/documents", documents::router().layer(upload_limit))
        .nest("/api/v1/form", form::router())
        .with_state(state)
}

/// A file part read from a multipart upload
pub(crate) struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub(crate) async fn read(field: Field<'_>) -> Result<Self, ApiError> {
        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read file data: {}", e);
            ApiError::InvalidRequest(format!("Failed to read file data: {}", e))
        })?;

        tracing::debug!(
            "Read {} bytes, filename={:?}, content_type={:?}",
            data.len(),
            file_name,
            content_type
        );

        Ok(Self {
            file_name,
            content_type,
            data: data.to_vec(),
        })
    }

    pub(crate) fn name_or(&self, fallback: &str) -> String {
        self.file_name.clone().unwrap_or_else(|| fallback.to_string())
    }
}

pub(crate) fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::error!("Failed to read multipart field: {}", e);
    ApiError::InvalidRequest(format!("Failed to read upload: {}", e))
}
