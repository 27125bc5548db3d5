//! Field Routes
//!
//! Per-field extraction endpoints:
//! - POST /api/v1/fields/:field_id/region - Recognize a region of an uploaded source
//! - POST /api/v1/fields/:field_id/region-inline - Same, source as a base64 data URL
//! - POST /api/v1/fields/:field_id/speech - Apply a speech recognition result
//! - GET /api/v1/fields/:field_id - Value, loading flag and notice
//! - PUT /api/v1/fields/:field_id - Manual edit
//! - DELETE /api/v1/fields/:field_id/notice - Dismiss the field's notice

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use super::{multipart_error, UploadedFile};
use crate::capture::{CaptureError, DisplayGeometry, Rotation, SelectionRegion, SourceDocument};
use crate::error::{ApiError, Result};
use crate::field::{FieldError, FieldId, FieldStatus, FieldUpdate, FieldValue, SpeechEvent, SpeechOutcome};
use crate::state::AppState;

/// Create the fields router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:field_id", get(get_field).put(set_field))
        .route("/:field_id/region", post(recognize_region))
        .route("/:field_id/region-inline", post(recognize_region_inline))
        .route("/:field_id/speech", post(apply_speech))
        .route("/:field_id/notice", delete(dismiss_notice))
}

/// Selection as drawn on screen
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionParams {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub display_width: f64,
    pub display_height: f64,
    #[serde(default)]
    pub rotation: Rotation,
    /// 1-based page for paginated sources
    pub page: Option<usize>,
}

impl RegionParams {
    fn region(&self) -> SelectionRegion {
        SelectionRegion::new(self.x, self.y, self.width, self.height)
    }

    fn display(&self) -> DisplayGeometry {
        DisplayGeometry::new(self.display_width, self.display_height)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineRegionRequest {
    pub source_data_url: String,
    #[serde(flatten)]
    pub region: RegionParams,
}

#[derive(Debug, Deserialize)]
pub struct ManualEditRequest {
    pub text: String,
}

fn parse_field_id(raw: &str) -> Result<FieldId> {
    raw.parse().map_err(ApiError::InvalidRequest)
}

/// POST /api/v1/fields/:field_id/region
///
/// Multipart with a `source` file part and a `region` JSON part.
async fn recognize_region(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<FieldUpdate>> {
    let field_id = parse_field_id(&field_id)?;

    let mut source: Option<UploadedFile> = None;
    let mut params: Option<RegionParams> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        tracing::debug!("Received field: name='{}'", name);

        match name.as_str() {
            "source" | "file" => source = Some(UploadedFile::read(field).await?),
            "region" => {
                let text = field.text().await.map_err(multipart_error)?;
                params = Some(serde_json::from_str(&text).map_err(|e| {
                    ApiError::InvalidRequest(format!("Invalid region: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let source = source.ok_or_else(|| {
        tracing::warn!("No source field found in multipart upload");
        ApiError::InvalidRequest("No source provided. Use field name 'source'".to_string())
    })?;
    let params = params.ok_or_else(|| {
        ApiError::InvalidRequest("No region provided. Use field name 'region'".to_string())
    })?;

    run_capture(&state, field_id, source, params).await
}

/// POST /api/v1/fields/:field_id/region-inline
async fn recognize_region_inline(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(request): Json<InlineRegionRequest>,
) -> Result<Json<FieldUpdate>> {
    let field_id = parse_field_id(&field_id)?;
    let source = decode_data_url(&request.source_data_url)?;
    run_capture(&state, field_id, source, request.region).await
}

async fn run_capture(
    state: &AppState,
    field_id: FieldId,
    upload: UploadedFile,
    params: RegionParams,
) -> Result<Json<FieldUpdate>> {
    let controller = state.controller(&field_id);

    if params.region().is_empty() {
        let err = FieldError::from(CaptureError::EmptySelection);
        controller.record_failure(&err);
        return Err(err.into());
    }

    // Decoding a large scan is CPU bound
    let display = params.display();
    let source = tokio::task::spawn_blocking(move || {
        SourceDocument::from_upload(
            &upload.data,
            upload.content_type.as_deref(),
            upload.file_name.as_deref(),
            display,
            params.page,
        )
    })
    .await
    .map_err(|e| FieldError::Task(e.to_string()))?
    .map_err(FieldError::from);

    // Source errors still land on the field as a notice
    let source = match source {
        Ok(source) => source,
        Err(err) => {
            controller.record_failure(&err);
            return Err(err.into());
        }
    };

    let update = controller
        .on_region_confirmed(source, params.region(), params.rotation)
        .await?;
    Ok(Json(update))
}

/// Split a `data:<mime>;base64,<payload>` URL into an upload
fn decode_data_url(url: &str) -> Result<UploadedFile> {
    let invalid = || ApiError::InvalidRequest("sourceDataUrl must be a base64 data URL".to_string());

    let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let mime = meta.strip_suffix(";base64").ok_or_else(invalid)?;

    let data = STANDARD
        .decode(payload.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid base64 payload: {}", e)))?;

    Ok(UploadedFile {
        file_name: None,
        content_type: (!mime.is_empty()).then(|| mime.to_string()),
        data,
    })
}

/// POST /api/v1/fields/:field_id/speech
async fn apply_speech(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(event): Json<SpeechEvent>,
) -> Result<Json<SpeechOutcome>> {
    let field_id = parse_field_id(&field_id)?;
    let outcome = state.controller(&field_id).on_speech_result(event).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/fields/:field_id
async fn get_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
) -> Result<Json<FieldStatus>> {
    let field_id = parse_field_id(&field_id)?;
    let status = state.controller(&field_id).status().await?;
    Ok(Json(status))
}

/// PUT /api/v1/fields/:field_id
async fn set_field(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
    Json(request): Json<ManualEditRequest>,
) -> Result<Json<FieldValue>> {
    let field_id = parse_field_id(&field_id)?;
    let value = state.controller(&field_id).set_manual(request.text).await?;
    Ok(Json(value))
}

/// DELETE /api/v1/fields/:field_id/notice
async fn dismiss_notice(
    State(state): State<AppState>,
    Path(field_id): Path<String>,
) -> Result<StatusCode> {
    let field_id = parse_field_id(&field_id)?;
    state.controller(&field_id).dismiss_notice();
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Request, StatusCode};
    use base64::Engine as _;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::recognition::{MockRecognizer, RecognitionError};
    use crate::routes::router;
    use crate::routes::test_support::*;

    fn region_json() -> Vec<u8> {
        json!({
            "x": 10.0, "y": 10.0, "width": 40.0, "height": 20.0,
            "displayWidth": 100.0, "displayHeight": 50.0, "rotation": 90
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn test_region_upload_updates_field() {
        let recognizer = Arc::new(MockRecognizer::texts(&["FW-2210"]));
        let app = router(state_with(recognizer.clone()));

        let request = multipart_request(
            "/api/v1/fields/top-0/region",
            vec![
                ("source", Some(("page.png", "image/png")), png_bytes(200, 100)),
                ("region", None, region_json()),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["fieldId"], "top-0");
        assert_eq!(body["value"]["text"], "FW-2210");
        assert_eq!(body["policy"], "replace");
        assert_eq!(recognizer.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_region_is_rejected_without_call() {
        let recognizer = Arc::new(MockRecognizer::texts(&["unused"]));
        let state = state_with(recognizer.clone());
        let app = router(state.clone());

        let region = json!({
            "x": 10.0, "y": 10.0, "width": 0.0, "height": 20.0,
            "displayWidth": 100.0, "displayHeight": 50.0
        });
        let request = multipart_request(
            "/api/v1/fields/top-1/region",
            vec![
                ("source", Some(("page.png", "image/png")), png_bytes(20, 10)),
                ("region", None, region.to_string().into_bytes()),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["kind"], "EmptySelection");
        assert_eq!(recognizer.calls(), 0);

        let field: FieldId = "top-1".parse().unwrap();
        assert!(state.controller(&field).notice().is_some());
    }

    #[tokio::test]
    async fn test_unsupported_source_is_reported_on_field() {
        let recognizer = Arc::new(MockRecognizer::texts(&[]));
        let state = state_with(recognizer);
        let app = router(state.clone());

        let request = multipart_request(
            "/api/v1/fields/top-2/region",
            vec![
                ("source", Some(("notes.txt", "text/plain")), b"hello".to_vec()),
                ("region", None, region_json()),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "InvalidRequest");

        let field: FieldId = "top-2".parse().unwrap();
        assert!(state.controller(&field).notice().is_some());
    }

    #[tokio::test]
    async fn test_inline_region_server_error() {
        let recognizer = Arc::new(MockRecognizer::new(vec![Err(RecognitionError::Server {
            status: 500,
            message: "bad image".into(),
        })]));
        let app = router(state_with(recognizer));

        let data_url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(200, 100)));
        let request = json_request(
            "POST",
            "/api/v1/fields/cell-0-1/region-inline",
            json!({
                "sourceDataUrl": data_url,
                "x": 0.0, "y": 0.0, "width": 50.0, "height": 50.0,
                "displayWidth": 100.0, "displayHeight": 50.0
            }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["kind"], "ServerError");
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("500"));
        assert!(message.contains("bad image"));
    }

    #[tokio::test]
    async fn test_speech_prefix_flow() {
        let app = router(state_with(Arc::new(MockRecognizer::texts(&[]))));

        for (transcript, outcome) in [
            ("100", "applied"),
            ("consider coc number", "prefixArmed"),
            ("A B C", "applied"),
        ] {
            let request = json_request(
                "POST",
                "/api/v1/fields/coc-number/speech",
                json!({"type": "result", "transcript": transcript}),
            );
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["outcome"], outcome);
        }

        let response = app
            .oneshot(
                Request::get("/api/v1/fields/coc-number")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["value"]["text"], "A B C 100");
        assert_eq!(body["loading"], false);
        assert_eq!(body["armedForPrefix"], false);
    }

    #[tokio::test]
    async fn test_speech_unsupported_and_dismiss() {
        let app = router(state_with(Arc::new(MockRecognizer::texts(&[]))));

        let request = json_request(
            "POST",
            "/api/v1/fields/top-0/speech",
            json!({"type": "unsupported"}),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["kind"], "SpeechUnsupported");

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/v1/fields/top-0/notice")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::get("/api/v1/fields/top-0")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(body_json(response).await["notice"].is_null());
    }

    #[tokio::test]
    async fn test_manual_edit_and_invalid_id() {
        let app = router(state_with(Arc::new(MockRecognizer::texts(&[]))));

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/v1/fields/top-3", json!({"text": "FAIR-001"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["text"], "FAIR-001");

        let response = app
            .oneshot(json_request("PUT", "/api/v1/fields/bad.id", json!({"text": "x"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["kind"], "InvalidRequest");
    }

    #[test]
    fn test_decode_data_url() {
        let upload = decode_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(upload.data, b"hello");
        assert_eq!(upload.content_type.as_deref(), Some("image/png"));

        assert!(decode_data_url("image/png;base64,aGVsbG8=").is_err());
        assert!(decode_data_url("data:image/png,hello").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }
}
