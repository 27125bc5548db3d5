//! Form Types
//!
//! Field identifiers, field values and the Form 3 characteristic table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Labels of the header fields shared by all three forms (`top-0`..`top-3`)
pub const HEADER_FIELDS: [&str; 4] = ["Part Number", "Part Name", "Serial Number", "FAIR Identifier"];

/// Form 3 column headers, in cell-column order
pub const CHARACTERISTIC_COLUMNS: [&str; 8] = [
    "Char. No.",
    "Reference Location",
    "Characteristic Designator",
    "Requirement",
    "Results",
    "Designed / Qualified Tooling",
    "Nonconformance Number",
    "Additional Data / Comments",
];

const MAX_FIELD_ID_LEN: usize = 64;

/// Name of a form field, e.g. `top-0`, `cell-3-1` or `coc-numbers`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    /// Header field by index (`top-<index>`)
    pub fn header(index: usize) -> Self {
        Self(format!("top-{}", index))
    }

    /// Characteristic table cell (`cell-<row>-<column>`)
    pub fn cell(row: usize, column: usize) -> Self {
        Self(format!("cell-{}-{}", row, column))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Row and column when this id addresses a table cell
    pub fn cell_position(&self) -> Option<(usize, usize)> {
        let rest = self.0.strip_prefix("cell-")?;
        let (row, column) = rest.split_once('-')?;
        Some((row.parse().ok()?, column.parse().ok()?))
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_FIELD_ID_LEN {
            return Err(format!(
                "field id must be 1-{} characters",
                MAX_FIELD_ID_LEN
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!("invalid field id '{}'", s));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for FieldId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current content of one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub text: String,
    /// Entries of a multi-value field (e.g. certificate numbers)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
}

impl FieldValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            items: Vec::new(),
        }
    }
}

/// Characteristic designator (Form 3, column 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Designator {
    Minor,
    Note,
    Significant,
    Critical,
}

/// Pass/fail outcome of an attribute check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeOutcome {
    Pass,
    Fail,
}

/// Result entry (Form 3, column 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CharacteristicResult {
    Variable,
    Attribute { outcome: Option<AttributeOutcome> },
    NotReportable,
}

impl fmt::Display for CharacteristicResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => f.write_str("Variable"),
            Self::Attribute { outcome: None } => f.write_str("Attribute"),
            Self::Attribute {
                outcome: Some(AttributeOutcome::Pass),
            } => f.write_str("Pass"),
            Self::Attribute {
                outcome: Some(AttributeOutcome::Fail),
            } => f.write_str("Fail"),
            Self::NotReportable => f.write_str("Not Reportable"),
        }
    }
}

/// One row of the Form 3 characteristic table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacteristicRow {
    pub char_number: String,
    pub reference_location: String,
    pub designator: Option<Designator>,
    pub requirement: String,
    pub result: Option<CharacteristicResult>,
    pub tooling: String,
    pub nonconformance_number: String,
    pub comments: String,
}

impl CharacteristicRow {
    /// Text cell by column index; `None` for the select-only columns
    pub fn text_cell(&self, column: usize) -> Option<&String> {
        match column {
            0 => Some(&self.char_number),
            1 => Some(&self.reference_location),
            3 => Some(&self.requirement),
            5 => Some(&self.tooling),
            6 => Some(&self.nonconformance_number),
            7 => Some(&self.comments),
            _ => None,
        }
    }

    pub fn text_cell_mut(&mut self, column: usize) -> Option<&mut String> {
        match column {
            0 => Some(&mut self.char_number),
            1 => Some(&mut self.reference_location),
            3 => Some(&mut self.requirement),
            5 => Some(&mut self.tooling),
            6 => Some(&mut self.nonconformance_number),
            7 => Some(&mut self.comments),
            _ => None,
        }
    }
}

/// Plain snapshot of the whole form for PDF/spreadsheet exporters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub header: Vec<HeaderEntry>,
    pub fields: Vec<NamedValue>,
    pub characteristics: Vec<CharacteristicRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderEntry {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedValue {
    pub field_id: FieldId,
    pub value: FieldValue,
}
