//! Output handler traits and types
//!
//! This module defines the record produced for every detail page and the
//! trait interface for sinks that persist the final collection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move output into place at {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One extracted detail page
///
/// Field order here is the field order of the serialized artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// 1-based position among successfully processed pages
    pub id: usize,

    /// Page heading, or the index anchor title if the page has none
    pub name: String,

    /// Source URL of the detail page
    pub url: String,

    /// Marker-annotated plain text of the page body
    pub content: String,
}

/// Trait for record sinks
///
/// A sink receives the complete ordered collection once, at the end of a run.
/// Implementations must leave no partial artifact behind when they fail.
pub trait RecordSink {
    /// Persists the ordered records
    ///
    /// # Arguments
    ///
    /// * `records` - The records in crawl order
    fn write(&self, records: &[ContentRecord]) -> OutputResult<()>;
}
