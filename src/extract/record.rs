use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// File name of the structured layout record inside a cache entry, matching
/// what the extraction collaborator writes.
pub const RECORD_FILE_NAME: &str = "structuredData.json";

/// Parsed structured-layout record as the extraction collaborator emits it.
/// Unknown fields are ignored; a record without `elements` is empty.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ExtractionRecord {
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// One element as serialized by the collaborator. Field names follow the
/// wire format, not Rust conventions.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RawElement {
    /// Zero-based page number; absent means not page-anchored.
    #[serde(rename = "Page")]
    pub page: Option<usize>,
    /// (left, bottom, right, top) in document units, origin bottom-left.
    #[serde(rename = "Bounds")]
    pub bounds: Option<[f64; 4]>,
    #[serde(rename = "Text")]
    pub text: Option<String>,
    /// Structural path, e.g. `//Document/Figure[2]`; classification hint.
    #[serde(rename = "Path")]
    pub path: String,
    /// Relative paths to rendered sub-images within the entry's asset dir.
    #[serde(rename = "filePaths")]
    pub file_paths: Vec<String>,
}

pub fn load_record(path: &Path) -> CoreResult<ExtractionRecord> {
    if !path.is_file() {
        return Err(CoreError::extraction(format!(
            "structured data record missing at {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path).map_err(|source| {
        CoreError::io_with_context(source, format!("failed to read record: {}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|source| {
        CoreError::extraction_with_source(
            format!("malformed structured data record at {}", path.display()),
            source,
        )
    })
}
