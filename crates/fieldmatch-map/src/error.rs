use thiserror::Error;

use fieldmatch_model::{FieldPath, ModelError, TypeName};

use crate::codec::CodecError;

/// Errors raised by capture, schema lookup and value application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    #[error("unknown type in schema: {0}")]
    UnknownType(TypeName),
    #[error("type {owner} declares field {field} more than once")]
    DuplicateField { owner: TypeName, field: String },
    #[error("type hierarchy of {0} is cyclic")]
    CyclicType(TypeName),
    #[error("source object for {owner} must be a JSON object, found {found}")]
    NotAnObject { owner: TypeName, found: &'static str },
    #[error("cannot write {path}: {reason}")]
    InvalidTarget { path: FieldPath, reason: String },
    #[error("invalid schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Names the JSON kind of a value for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
