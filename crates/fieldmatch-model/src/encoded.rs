//! Opaque encoded field values.
//!
//! A captured value travels through matching untouched: the core moves
//! [`EncodedValue`]s around but never looks inside the payload. Decoding back
//! into a native representation is the job of the value codec.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::TypeName;

/// Key carrying the runtime type of a polymorphic value.
pub const TYPE_TAG_KEY: &str = "$type";
/// Key carrying the payload of a polymorphic value.
pub const TYPE_DATA_KEY: &str = "data";
/// Key marking a reference to an external object: `{"$ref": "<id>"}`.
pub const REFERENCE_KEY: &str = "$ref";

/// A field value in its encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedValue {
    /// Type the payload was encoded from (the runtime type for polymorphic values).
    pub type_tag: TypeName,
    /// JSON text of the value.
    pub payload: String,
}

impl EncodedValue {
    /// Encodes a JSON value under the given type tag.
    pub fn from_json(type_tag: TypeName, value: &Value) -> Self {
        Self {
            type_tag,
            payload: value.to_string(),
        }
    }

    /// Encodes an absent value.
    pub fn null(type_tag: TypeName) -> Self {
        Self {
            type_tag,
            payload: Value::Null.to_string(),
        }
    }

    /// Encodes a polymorphic value as `{"$type": <runtime type>, "data": <value>}`.
    pub fn tagged(runtime_type: TypeName, data: &Value) -> Self {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(
            TYPE_TAG_KEY.to_string(),
            Value::String(runtime_type.as_str().to_string()),
        );
        wrapper.insert(TYPE_DATA_KEY.to_string(), data.clone());
        Self {
            type_tag: runtime_type,
            payload: Value::Object(wrapper).to_string(),
        }
    }

    /// Parses the payload back into JSON.
    pub fn payload_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.payload)
    }

    pub fn is_null(&self) -> bool {
        self.payload.trim() == "null"
    }
}
