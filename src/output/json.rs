//! JSON artifact output
//!
//! Records are written as one pretty-printed JSON array. The bytes are fully
//! serialized in memory, written to a temporary file next to the destination
//! and then renamed over it, so a failed run never leaves a truncated file.

use crate::output::traits::{ContentRecord, OutputError, OutputResult, RecordSink};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes records to a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonFileSink {
    fn write(&self, records: &[ContentRecord]) -> OutputResult<()> {
        let bytes = to_json_bytes(records)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| OutputError::Persist {
            path: self.path.display().to_string(),
            source: e.error,
        })?;

        tracing::debug!(
            "Wrote {} records ({} bytes) to {}",
            records.len(),
            bytes.len(),
            self.path.display()
        );

        Ok(())
    }
}

/// Serializes records as a 4-space indented JSON array with non-ASCII text kept verbatim
pub fn to_json_bytes(records: &[ContentRecord]) -> OutputResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}

/// Reads a JSON artifact back into records
pub fn read_records(path: &Path) -> OutputResult<Vec<ContentRecord>> {
    let content = std::fs::read(path)?;
    let records = serde_json::from_slice(&content)?;
    Ok(records)
}
