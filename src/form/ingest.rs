//! Whole-document ingestion
//!
//! An uploaded IPS or drawing is sent to the recognition service's
//! document endpoint, the extracted text is parsed, and the result is
//! written into the form.

use serde::Serialize;
use thiserror::Error;

use super::store::{FormError, FormStore};
use super::types::{FieldId, FieldValue};
use crate::extraction::{parse_operations_section, parse_part_header, PartHeader};
use crate::recognition::{RecognitionError, RecognitionService};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("OCR failed to extract any text from the document")]
    EmptyDocument,

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Outcome of an IPS upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpsImport {
    pub operations: Vec<String>,
    pub drawing_refs: Vec<String>,
    /// False when no operations were found and the table was left as is
    pub rows_replaced: bool,
    pub row_count: usize,
}

/// Populate the characteristic table from an IPS document.
///
/// Rows are only replaced when at least one operation was parsed.
pub async fn ingest_ips(
    recognizer: &dyn RecognitionService,
    store: &FormStore,
    file_name: &str,
    data: Vec<u8>,
) -> Result<IpsImport, IngestError> {
    let text = extract_text(recognizer, file_name, data).await?;
    let section = parse_operations_section(&text);

    tracing::info!(
        file = %file_name,
        operations = section.operations.len(),
        drawing_refs = section.drawing_refs.len(),
        "Parsed IPS operations section"
    );

    let operations = section.operations.clone();
    let drawing_refs = section.drawing_refs.clone();

    if section.is_empty() {
        tracing::warn!(file = %file_name, "No operations found, keeping existing rows");
        return Ok(IpsImport {
            operations,
            drawing_refs,
            rows_replaced: false,
            row_count: store.rows().await.len(),
        });
    }

    let rows = section.into_rows();
    let row_count = rows.len();
    store.replace_rows(rows).await;

    Ok(IpsImport {
        operations,
        drawing_refs,
        rows_replaced: true,
        row_count,
    })
}

/// Fill the part number (`top-0`) and part name (`top-1`) from a drawing.
///
/// Values that were not found leave the existing field untouched.
pub async fn ingest_part_header(
    recognizer: &dyn RecognitionService,
    store: &FormStore,
    file_name: &str,
    data: Vec<u8>,
) -> Result<PartHeader, IngestError> {
    let text = extract_text(recognizer, file_name, data).await?;
    let header = parse_part_header(&text);

    for (index, value) in [(0, &header.part_number), (1, &header.part_name)] {
        if value.is_empty() {
            continue;
        }
        store
            .set(&FieldId::header(index), FieldValue::text(value.clone()))
            .await?;
    }

    tracing::info!(
        file = %file_name,
        part_number = %header.part_number,
        part_name = %header.part_name,
        "Parsed part header"
    );

    Ok(header)
}

async fn extract_text(
    recognizer: &dyn RecognitionService,
    file_name: &str,
    data: Vec<u8>,
) -> Result<String, IngestError> {
    let recognized = recognizer.extract_document(file_name, data).await?;
    if recognized.is_blank() {
        return Err(IngestError::EmptyDocument);
    }
    Ok(recognized.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::CharacteristicRow;
    use crate::recognition::MockRecognizer;

    #[tokio::test]
    async fn test_ingest_ips_replaces_rows() {
        let recognizer =
            MockRecognizer::texts(&["Operations 10 20 30 Feature number Drawing Ref X1 X2 X3"]);
        let store = FormStore::new();
        store.add_row().await;

        let import = ingest_ips(&recognizer, &store, "ips.pdf", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(import.rows_replaced);
        assert_eq!(import.row_count, 3);
        let rows = store.rows().await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].char_number, "20");
        assert_eq!(rows[1].reference_location, "X2");
    }

    #[tokio::test]
    async fn test_ingest_ips_without_operations_keeps_rows() {
        let recognizer = MockRecognizer::texts(&["Drawing Ref A1 B2"]);
        let store = FormStore::new();
        store
            .replace_rows(vec![CharacteristicRow {
                char_number: "99".into(),
                ..Default::default()
            }])
            .await;

        let import = ingest_ips(&recognizer, &store, "ips.pdf", vec![])
            .await
            .unwrap();

        assert!(!import.rows_replaced);
        assert_eq!(import.row_count, 1);
        assert_eq!(store.rows().await[0].char_number, "99");
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_document() {
        let recognizer = MockRecognizer::texts(&["   \n"]);
        let store = FormStore::new();

        let err = ingest_ips(&recognizer, &store, "scan.png", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::EmptyDocument));
        assert_eq!(err.to_string(), "OCR failed to extract any text from the document");
    }

    #[tokio::test]
    async fn test_recognition_failure_propagates() {
        let recognizer = MockRecognizer::new(vec![Err(RecognitionError::Network(
            "connection refused".into(),
        ))]);
        let store = FormStore::new();

        let err = ingest_part_header(&recognizer, &store, "dwg.pdf", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Recognition(RecognitionError::Network(_))));
    }

    #[tokio::test]
    async fn test_part_header_writes_top_fields() {
        let recognizer = MockRecognizer::texts(&["Part No: FW1182-3\nDescription BRACKET"]);
        let store = FormStore::new();
        store
            .set(&FieldId::header(2), FieldValue::text("SN-1"))
            .await
            .unwrap();

        let header = ingest_part_header(&recognizer, &store, "dwg.pdf", vec![])
            .await
            .unwrap();

        assert_eq!(header.part_number, "FW1182-3");
        assert_eq!(store.value(&FieldId::header(0)).await.unwrap().text, "FW1182-3");
        assert_eq!(store.value(&FieldId::header(1)).await.unwrap().text, "BRACKET");
        assert_eq!(store.value(&FieldId::header(2)).await.unwrap().text, "SN-1");
    }

    #[tokio::test]
    async fn test_part_header_keeps_existing_name_when_missing() {
        let recognizer = MockRecognizer::texts(&["sheet 2 FW77"]);
        let store = FormStore::new();
        store
            .set(&FieldId::header(1), FieldValue::text("Housing"))
            .await
            .unwrap();

        ingest_part_header(&recognizer, &store, "dwg.pdf", vec![])
            .await
            .unwrap();

        assert_eq!(store.value(&FieldId::header(0)).await.unwrap().text, "FW77");
        assert_eq!(store.value(&FieldId::header(1)).await.unwrap().text, "Housing");
    }
}
