//! Document ingestion endpoints
//!
//! - POST /api/v1/documents/ips - Fill the characteristic table from an IPS
//! - POST /api/v1/documents/part-header - Fill part number and name from a drawing

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use super::{multipart_error, UploadedFile};
use crate::error::{ApiError, Result};
use crate::extraction::PartHeader;
use crate::form::{ingest_ips, ingest_part_header, IpsImport};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ips", post(upload_ips))
        .route("/part-header", post(upload_part_header))
}

/// Pull the `file` part out of a multipart upload
async fn read_file(mut multipart: Multipart) -> Result<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        tracing::debug!("Received field: name='{}'", name);

        if name == "file" || name == "document" {
            return UploadedFile::read(field).await;
        }
    }

    tracing::warn!("No file field found in multipart upload");
    Err(ApiError::InvalidRequest(
        "No file provided. Use field name 'file' or 'document'".to_string(),
    ))
}

/// POST /api/v1/documents/ips
async fn upload_ips(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IpsImport>> {
    let file = read_file(multipart).await?;
    let file_name = file.name_or("ips");

    let import = ingest_ips(state.recognizer(), state.store(), &file_name, file.data).await?;
    Ok(Json(import))
}

/// POST /api/v1/documents/part-header
async fn upload_part_header(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PartHeader>> {
    let file = read_file(multipart).await?;
    let file_name = file.name_or("drawing");

    let header = ingest_part_header(state.recognizer(), state.store(), &file_name, file.data).await?;
    Ok(Json(header))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::form::FieldId;
    use crate::recognition::MockRecognizer;
    use crate::routes::router;
    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_ips_upload_replaces_rows() {
        let recognizer = Arc::new(MockRecognizer::texts(&[
            "Inspection Planning Sheet ... Operations 10 20 30 Feature number ... Drawing Ref X1 X2 X3",
        ]));
        let state = state_with(recognizer);
        let app = router(state.clone());

        let request = multipart_request(
            "/api/v1/documents/ips",
            vec![("file", Some(("ips.pdf", "application/pdf")), b"%PDF-1.4".to_vec())],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["rowCount"], 3);
        assert_eq!(body["rowsReplaced"], true);
        assert_eq!(body["operations"][2], "30");

        let rows = state.store().rows().await;
        assert_eq!(rows[0].reference_location, "X1");
    }

    #[tokio::test]
    async fn test_empty_document() {
        let app = router(state_with(Arc::new(MockRecognizer::texts(&[""]))));

        let request = multipart_request(
            "/api/v1/documents/ips",
            vec![("file", Some(("scan.png", "image/png")), png_bytes(4, 4))],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["kind"], "EmptyDocument");
        assert_eq!(body["error"], "OCR failed to extract any text from the document");
    }

    #[tokio::test]
    async fn test_missing_file_part() {
        let app = router(state_with(Arc::new(MockRecognizer::texts(&[]))));

        let request = multipart_request(
            "/api/v1/documents/part-header",
            vec![("note", None, b"nothing here".to_vec())],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "InvalidRequest");
    }

    #[tokio::test]
    async fn test_part_header_upload() {
        let recognizer = Arc::new(MockRecognizer::texts(&["Part No: FW1182-3\nDescription BRACKET"]));
        let state = state_with(recognizer);
        let app = router(state.clone());

        let request = multipart_request(
            "/api/v1/documents/part-header",
            vec![("file", Some(("dwg.pdf", "application/pdf")), b"%PDF".to_vec())],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["partNumber"], "FW1182-3");
        assert_eq!(body["partName"], "BRACKET");
        assert_eq!(
            state.store().value(&FieldId::header(0)).await.unwrap().text,
            "FW1182-3"
        );
    }
}
