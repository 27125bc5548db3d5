//! Part header parsing for Form 1 (Part Accountability)

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static PART_NUMBER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Part\s*NO\b\.?\s*[:#]?\s*(.*)").expect("valid pattern"));

static DESCRIPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Description\s*:?\s*(.*)").expect("valid pattern"));

/// Fallback for drawings that only carry a bare part number
static GENERIC_PART_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FW\d+").expect("valid pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartHeader {
    pub part_number: String,
    pub part_name: String,
}

/// Pull the part number and part name out of a drawing's extracted text.
///
/// Lines are scanned in order and later matches overwrite earlier ones.
pub fn parse_part_header(raw: &str) -> PartHeader {
    let mut header = PartHeader::default();

    for line in raw.lines() {
        if let Some(value) = captured_value(&PART_NUMBER_LINE, line) {
            header.part_number = value;
        }
        if let Some(value) = captured_value(&DESCRIPTION_LINE, line) {
            header.part_name = value;
        }
    }

    if header.part_number.is_empty() {
        if let Some(m) = GENERIC_PART_NUMBER.find(raw) {
            header.part_number = m.as_str().to_string();
        }
    }

    header
}

fn captured_value(pattern: &Regex, line: &str) -> Option<String> {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}
