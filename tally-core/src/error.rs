use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("invalid canonical amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },
    #[error("{0}")]
    Custom(String),
}
