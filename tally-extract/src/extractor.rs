use std::path::Path;

use async_trait::async_trait;

use crate::error::ExtractError;
use crate::file_kind::FileKind;

/// Marker prefix for the loose-string failure convention: collaborators
/// hand downstream code plain text, and a failure is just text carrying
/// this marker. Amount extraction finds no numeric token in it, so a failed
/// extraction degrades to the "0" fallback instead of crashing the run.
pub const ERROR_MARKER: &str = "Error processing";

/// Pulls raw text (or LLM-structured fields rendered as text) out of an
/// invoice-bearing document. Implementations typically call an LLM backend;
/// none of that lives in this workspace.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, path: &Path, kind: FileKind) -> Result<String, ExtractError>;
}

/// Derives a single total-amount string from a spreadsheet.
#[async_trait]
pub trait SpreadsheetAnalyzer: Send + Sync {
    async fn analyze(&self, path: &Path, kind: FileKind) -> Result<String, ExtractError>;
}

/// Render an extraction failure in the loose-string convention.
pub fn fallback_text(path: &Path, error: &ExtractError) -> String {
    format!("{ERROR_MARKER} {}: {error}", path.display())
}

pub fn is_error_text(text: &str) -> bool {
    text.contains(ERROR_MARKER)
}

/// Canned-output collaborator for tests and demos.
pub struct FixedExtractor {
    text: String,
}

impl FixedExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl DocumentExtractor for FixedExtractor {
    async fn extract(&self, _path: &Path, _kind: FileKind) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}

#[async_trait]
impl SpreadsheetAnalyzer for FixedExtractor {
    async fn analyze(&self, _path: &Path, _kind: FileKind) -> Result<String, ExtractError> {
        Ok(self.text.clone())
    }
}
