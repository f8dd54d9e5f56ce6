use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("no trace with id '{0}'")]
    NotFound(String),
    #[error("trace '{0}' is already sealed")]
    AlreadySealed(String),
    #[error("trace '{0}' is not sealed yet")]
    Unsealed(String),
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}
