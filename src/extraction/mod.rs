//! Structured Extraction
//!
//! Deterministic text rules applied to recognized text before it is merged
//! into form state:
//!
//! - `speech`: keyword-to-symbol cleanup and the prefix voice command
//! - `operations`: IPS operations / drawing-reference columns
//! - `header`: part number and name for Form 1

mod header;
mod operations;
mod speech;

pub use header::{parse_part_header, PartHeader};
pub use operations::{
    parse_operations_section, OperationsSection, OPERATIONS_HEADER, SECTION_END_HEADERS,
};
pub use speech::{cleanup_spoken, is_prefix_command};
