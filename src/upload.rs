//! Validation of uploaded documents
//!
//! An upload is accepted only if its filename ends in `.json` and its
//! content parses as JSON. Rejection happens before any session state is
//! touched.

use crate::error::{Result, SchemaBridgeError};
use anyhow::Context;
use serde_json::Value;
use std::path::Path;

const JSON_SUFFIX: &str = ".json";

/// A parsed JSON document together with the name it was uploaded under
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedDocument {
    pub filename: String,
    pub document: Value,
}

impl UploadedDocument {
    /// Validate and parse an uploaded document
    ///
    /// # Errors
    ///
    /// Returns `InvalidUpload` if the filename is not a `.json` name or the
    /// bytes are not valid JSON
    ///
    /// # Examples
    ///
    /// ```
    /// use schemabridge::upload::UploadedDocument;
    ///
    /// let doc = UploadedDocument::parse("users.json", br#"[{"id": 1}]"#).unwrap();
    /// assert!(doc.document.is_array());
    ///
    /// assert!(UploadedDocument::parse("users.csv", b"id\n1").is_err());
    /// assert!(UploadedDocument::parse("users.json", b"{oops").is_err());
    /// ```
    pub fn parse(filename: &str, bytes: &[u8]) -> Result<Self> {
        if !filename.ends_with(JSON_SUFFIX) {
            return Err(SchemaBridgeError::InvalidUpload(format!(
                "Only JSON files are supported (got '{}')",
                filename
            ))
            .into());
        }

        let document: Value = serde_json::from_slice(bytes).map_err(|e| {
            SchemaBridgeError::InvalidUpload(format!("{} is not valid JSON: {}", filename, e))
        })?;

        Ok(Self {
            filename: filename.to_string(),
            document,
        })
    }

    /// Read and validate a document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&filename, &bytes)
    }
}
