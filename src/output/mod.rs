//! Output module for persisting extracted records
//!
//! This module handles:
//! - The `ContentRecord` data type produced for every detail page
//! - The `RecordSink` trait for writing the final collection
//! - The JSON file sink and its reader

mod json;
mod traits;

pub use json::{read_records, to_json_bytes, JsonFileSink};
pub use traits::{ContentRecord, OutputError, OutputResult, RecordSink};
