//! IPS (Inspection Planning Sheet) operations-section parsing
//!
//! Raw text of an IPS is scanned for the "Operations" column, whose digit
//! runs become characteristic numbers, and for the "Drawing Ref" column,
//! whose tokens become reference locations.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::form::CharacteristicRow;

/// Header that opens the operations section (matched literally)
pub const OPERATIONS_HEADER: &str = "Operations";

/// Headers that close the operations section
pub const SECTION_END_HEADERS: [&str; 4] = ["Feature number", "Drawing ref", "Class", "Dimension"];

static SECTION_END: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SECTION_END_HEADERS.iter().map(|h| regex::escape(h)).collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("valid pattern")
});

static DRAWING_REF_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)drawing ref").expect("valid pattern"));

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid pattern"));

static REF_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9-]+").expect("valid pattern"));

/// Values found in an IPS text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsSection {
    pub operations: Vec<String>,
    pub drawing_refs: Vec<String>,
}

impl OperationsSection {
    /// One row per operation, drawing refs zipped by position
    pub fn into_rows(self) -> Vec<CharacteristicRow> {
        let mut refs = self.drawing_refs.into_iter();
        self.operations
            .into_iter()
            .map(|operation| CharacteristicRow {
                char_number: operation,
                reference_location: refs.next().unwrap_or_default(),
                ..Default::default()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Parse the operations and drawing-reference columns out of raw IPS text
pub fn parse_operations_section(raw: &str) -> OperationsSection {
    OperationsSection {
        operations: operations_span(raw)
            .map(|span| collect_matches(&DIGIT_RUN, span))
            .unwrap_or_default(),
        drawing_refs: drawing_refs_span(raw)
            .map(|span| collect_matches(&REF_TOKEN, span))
            .unwrap_or_default(),
    }
}

/// Text between the operations header and the next section header
fn operations_span(raw: &str) -> Option<&str> {
    let start = raw.find(OPERATIONS_HEADER)? + OPERATIONS_HEADER.len();
    let rest = &raw[start..];
    let end = SECTION_END.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Text after the first "Drawing Ref" to the end
fn drawing_refs_span(raw: &str) -> Option<&str> {
    DRAWING_REF_HEADER.find(raw).map(|m| &raw[m.end()..])
}

fn collect_matches(pattern: &Regex, text: &str) -> Vec<String> {
    pattern.find_iter(text).map(|m| m.as_str().to_string()).collect()
}
