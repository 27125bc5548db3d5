//! Combining recognized text with a field's existing value

use serde::{Deserialize, Serialize};

use crate::form::FieldValue;

/// How a recognized value is combined with what the field already holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergePolicy {
    #[default]
    Replace,
    Append,
    Prepend,
}

impl MergePolicy {
    /// Merge into a plain text value.
    ///
    /// Append and prepend join with a single space; an empty side yields the
    /// other side unchanged.
    pub fn merge_text(self, existing: &str, incoming: &str) -> String {
        match self {
            Self::Replace => incoming.to_string(),
            Self::Append => join(existing, incoming),
            Self::Prepend => join(incoming, existing),
        }
    }

    /// Merge into a list of entries
    pub fn merge_items(self, items: &mut Vec<String>, incoming: &str) {
        if incoming.is_empty() && self != Self::Replace {
            return;
        }
        match self {
            Self::Replace => {
                items.clear();
                if !incoming.is_empty() {
                    items.push(incoming.to_string());
                }
            }
            Self::Append => items.push(incoming.to_string()),
            Self::Prepend => items.insert(0, incoming.to_string()),
        }
    }

    /// Apply to a field value.
    ///
    /// Text is always merged as plain text. Multi-value fields also keep
    /// their entries as a list, merged with the same policy.
    pub fn apply(self, value: &mut FieldValue, incoming: &str, multi_value: bool) {
        if multi_value {
            self.merge_items(&mut value.items, incoming);
        }
        value.text = self.merge_text(&value.text, incoming);
    }
}

fn join(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{} {}", first, second),
    }
}
