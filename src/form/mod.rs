//! FAIR Form State
//!
//! The three AS9102 forms share one store:
//! - Form 1 (Part Accountability): header fields `top-0`..`top-3`
//! - Form 2 (Product Accountability): named fields such as certificate lists
//! - Form 3 (Characteristic Accountability): the characteristic table,
//!   addressed cell by cell as `cell-<row>-<column>`
//!
//! Documents can also be ingested whole: an IPS fills the characteristic
//! table, a drawing fills the part number and name.

mod ingest;
mod store;
mod types;

pub use ingest::{ingest_ips, ingest_part_header, IngestError, IpsImport};
pub use store::{FormError, FormStore};
pub use types::{
    AttributeOutcome, CharacteristicResult, CharacteristicRow, Designator, FieldId, FieldValue,
    FormSnapshot, HeaderEntry, NamedValue, CHARACTERISTIC_COLUMNS, HEADER_FIELDS,
};
