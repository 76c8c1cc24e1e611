use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown bad-date policy '{value}' (expected 'raise' or 'empty')")]
    UnknownBadDatePolicy { value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
