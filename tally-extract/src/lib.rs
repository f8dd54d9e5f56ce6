mod error;
mod extractor;
mod file_kind;

pub use error::ExtractError;
pub use extractor::{
    fallback_text, is_error_text, DocumentExtractor, FixedExtractor, SpreadsheetAnalyzer,
    ERROR_MARKER,
};
pub use file_kind::FileKind;
