//! Shared form state
//!
//! Plain field values live in a map keyed by [`FieldId`]; `cell-<row>-<col>`
//! ids are routed to the matching text column of the characteristic table.
//! Writes to different fields are independent; concurrent writes to the
//! same field are last-writer-wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use super::types::{
    CharacteristicRow, FieldId, FieldValue, FormSnapshot, HeaderEntry, NamedValue, HEADER_FIELDS,
};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Row {0} does not exist")]
    RowNotFound(usize),

    #[error("Column {0} is not a text column")]
    NotATextColumn(usize),
}

#[derive(Debug, Default)]
struct FormData {
    fields: BTreeMap<FieldId, FieldValue>,
    rows: Vec<CharacteristicRow>,
}

/// Cloneable handle to the form being filled in
#[derive(Clone, Default)]
pub struct FormStore {
    inner: Arc<RwLock<FormData>>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field (empty when never written)
    pub async fn value(&self, field_id: &FieldId) -> Result<FieldValue, FormError> {
        let data = self.inner.read().await;
        match field_id.cell_position() {
            Some((row, column)) => cell_text(&data.rows, row, column).map(FieldValue::text),
            None => Ok(data.fields.get(field_id).cloned().unwrap_or_default()),
        }
    }

    /// Apply `update` to a field under the write lock and return the new value.
    ///
    /// Table cells only carry text; items set by `update` are dropped for them.
    pub async fn update<F>(&self, field_id: &FieldId, update: F) -> Result<FieldValue, FormError>
    where
        F: FnOnce(&mut FieldValue),
    {
        let mut data = self.inner.write().await;

        if let Some((row, column)) = field_id.cell_position() {
            let cell = data
                .rows
                .get_mut(row)
                .ok_or(FormError::RowNotFound(row))?
                .text_cell_mut(column)
                .ok_or(FormError::NotATextColumn(column))?;
            let mut value = FieldValue::text(std::mem::take(cell));
            update(&mut value);
            *cell = value.text.clone();
            return Ok(FieldValue::text(value.text));
        }

        let value = data.fields.entry(field_id.clone()).or_default();
        update(value);
        Ok(value.clone())
    }

    pub async fn set(&self, field_id: &FieldId, value: FieldValue) -> Result<FieldValue, FormError> {
        self.update(field_id, move |current| *current = value).await
    }

    pub async fn rows(&self) -> Vec<CharacteristicRow> {
        self.inner.read().await.rows.clone()
    }

    /// Replace the whole characteristic table
    pub async fn replace_rows(&self, rows: Vec<CharacteristicRow>) {
        let mut data = self.inner.write().await;
        tracing::debug!(old = data.rows.len(), new = rows.len(), "Replacing characteristic rows");
        data.rows = rows;
    }

    /// Append an empty row and return its index
    pub async fn add_row(&self) -> usize {
        let mut data = self.inner.write().await;
        data.rows.push(CharacteristicRow::default());
        data.rows.len() - 1
    }

    /// Overwrite one row, including its designator and result selections
    pub async fn set_row(&self, index: usize, row: CharacteristicRow) -> Result<(), FormError> {
        let mut data = self.inner.write().await;
        let slot = data.rows.get_mut(index).ok_or(FormError::RowNotFound(index))?;
        *slot = row;
        Ok(())
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let data = self.inner.read().await;

        let header = HEADER_FIELDS
            .iter()
            .enumerate()
            .map(|(index, label)| HeaderEntry {
                label,
                value: data
                    .fields
                    .get(&FieldId::header(index))
                    .map(|v| v.text.clone())
                    .unwrap_or_default(),
            })
            .collect();

        let fields = data
            .fields
            .iter()
            .map(|(field_id, value)| NamedValue {
                field_id: field_id.clone(),
                value: value.clone(),
            })
            .collect();

        FormSnapshot {
            header,
            fields,
            characteristics: data.rows.clone(),
        }
    }
}

fn cell_text(rows: &[CharacteristicRow], row: usize, column: usize) -> Result<String, FormError> {
    rows.get(row)
        .ok_or(FormError::RowNotFound(row))?
        .text_cell(column)
        .cloned()
        .ok_or(FormError::NotATextColumn(column))
}
