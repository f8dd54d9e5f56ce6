use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type for '{0}'")]
    UnsupportedType(PathBuf),
    #[error("file not found: {0}")]
    Missing(PathBuf),
    #[error("extraction backend failed: {0}")]
    Backend(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
