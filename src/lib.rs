//! FAIR Capture Library
//!
//! Backend for filling in AS9102 First Article Inspection Reports by
//! pointing at documents instead of typing.
//!
//! # Modules
//!
//! - `capture`: region selection to normalized JPEG (crop, rotate, encode)
//! - `recognition`: remote OCR service client
//! - `extraction`: speech cleanup and IPS / drawing text parsing
//! - `form`: form state shared by all fields, document ingestion
//! - `field`: per-field controllers (merge, prefix arming, notices)
//! - `routes`: HTTP presentation layer

pub mod capture;
pub mod config;
pub mod error;
pub mod extraction;
pub mod field;
pub mod form;
pub mod recognition;
pub mod routes;
pub mod state;
