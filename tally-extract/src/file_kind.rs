use std::path::Path;

use serde::{Deserialize, Serialize};

/// Document categories the extraction collaborators know how to handle.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
    Text,
    Spreadsheet,
}

impl FileKind {
    /// Detect the kind from the file extension, case-insensitive. Returns
    /// `None` for anything the pipeline cannot process.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "png" | "jpg" | "jpeg" => Some(FileKind::Image),
            "txt" | "md" => Some(FileKind::Text),
            "xlsx" | "xls" | "csv" => Some(FileKind::Spreadsheet),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Pdf => write!(f, "pdf"),
            FileKind::Image => write!(f, "image"),
            FileKind::Text => write!(f, "text"),
            FileKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}
