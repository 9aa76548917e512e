use thiserror::Error;

use crate::ids::FieldPath;

/// Errors raised while constructing model values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("field path must not be empty")]
    EmptyPath,
    #[error("field path `{0}` has an empty segment")]
    EmptySegment(String),
    #[error("type name must not be empty")]
    EmptyTypeName,
    #[error("duplicate field path: {0}")]
    DuplicatePath(FieldPath),
}

pub type Result<T> = std::result::Result<T, ModelError>;
