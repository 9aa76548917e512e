//! Decoding of captured values back into native form.
//!
//! Decoders are looked up by the value's type tag. Tags without a registered
//! decoder fall back to plain JSON, so unknown structured types still travel
//! through unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

use fieldmatch_model::{
    EncodedValue, ObjectRef, REFERENCE_KEY, TYPE_DATA_KEY, TYPE_TAG_KEY, TypeName,
};

use crate::compat::{FLOAT_TYPES, INTEGER_TYPES, NumericKind, numeric_kind};

const BOOL_TYPES: &[&str] = &["bool", "boolean", "system.boolean"];
const TEXT_TYPES: &[&str] = &["string", "str", "text", "system.string"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("payload tagged {type_tag} is not valid JSON")]
    Payload {
        type_tag: TypeName,
        #[source]
        source: serde_json::Error,
    },
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
    },
    #[error("cannot convert {value} to {target}")]
    Coerce { value: String, target: TypeName },
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    /// Structured value of a type with no registered decoder.
    Json(Value),
    /// Polymorphic value carrying its runtime type.
    Tagged { type_tag: TypeName, data: Value },
    Reference(ObjectRef),
}

impl NativeValue {
    /// Encodes the value as the JSON written into a target document.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Int(v) => Value::from(*v),
            Self::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            Self::Bool(v) => Value::Bool(*v),
            Self::Text(v) => Value::String(v.clone()),
            Self::Json(v) => v.clone(),
            Self::Tagged { type_tag, data } => {
                let mut wrapper = Map::new();
                wrapper.insert(TYPE_TAG_KEY.to_string(), Value::from(type_tag.as_str()));
                wrapper.insert(TYPE_DATA_KEY.to_string(), data.clone());
                Value::Object(wrapper)
            }
            Self::Reference(id) => {
                let mut wrapper = Map::new();
                wrapper.insert(REFERENCE_KEY.to_string(), Value::from(id.as_str()));
                Value::Object(wrapper)
            }
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Primitive families the codec converts between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Integer,
    Float,
    Bool,
    Text,
}

/// Classifies a declared type, case-insensitively.
pub fn primitive_kind(name: &TypeName) -> Option<Primitive> {
    match numeric_kind(name) {
        Some(NumericKind::Integer) => return Some(Primitive::Integer),
        Some(NumericKind::Float) => return Some(Primitive::Float),
        None => {}
    }
    let lowered = name.as_str().to_ascii_lowercase();
    if BOOL_TYPES.contains(&lowered.as_str()) {
        Some(Primitive::Bool)
    } else if TEXT_TYPES.contains(&lowered.as_str()) {
        Some(Primitive::Text)
    } else {
        None
    }
}

/// Splits `{"$type": T, "data": …}` into its tag and payload.
pub fn tagged_parts(value: &Value) -> Option<(TypeName, &Value)> {
    let object = value.as_object()?;
    let tag = object.get(TYPE_TAG_KEY)?.as_str()?;
    let data = object.get(TYPE_DATA_KEY)?;
    Some((TypeName::new(tag).ok()?, data))
}

/// Reads the id out of `{"$ref": "<id>"}`.
pub fn reference_id(value: &Value) -> Option<ObjectRef> {
    let object = value.as_object()?;
    if object.len() != 1 {
        return None;
    }
    object
        .get(REFERENCE_KEY)?
        .as_str()
        .map(ObjectRef::new)
}

/// Decodes one JSON payload into a native value.
pub type DecodeFn = fn(&Value) -> Result<NativeValue>;

/// Type-indexed decoder registry.
#[derive(Clone)]
pub struct ValueCodec {
    decoders: BTreeMap<String, DecodeFn>,
}

impl fmt::Debug for ValueCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCodec")
            .field("types", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ValueCodec {
    /// A registry with no decoders; everything decodes as JSON.
    pub fn empty() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// A registry with decoders for the integer, float, bool and string families.
    pub fn with_builtins() -> Self {
        let mut codec = Self::empty();
        for (names, decoder) in [
            (INTEGER_TYPES, decode_int as DecodeFn),
            (FLOAT_TYPES, decode_float),
            (BOOL_TYPES, decode_bool),
            (TEXT_TYPES, decode_text),
        ] {
            for name in names {
                codec.decoders.insert((*name).to_string(), decoder);
            }
        }
        codec
    }

    /// Registers or replaces the decoder for a type tag.
    pub fn register(&mut self, type_tag: &TypeName, decoder: DecodeFn) {
        self.decoders.insert(registry_key(type_tag), decoder);
    }

    pub fn has_decoder(&self, type_tag: &TypeName) -> bool {
        self.decoders.contains_key(&registry_key(type_tag))
    }

    pub fn decode(&self, encoded: &EncodedValue) -> Result<NativeValue> {
        let value = encoded.payload_json().map_err(|source| CodecError::Payload {
            type_tag: encoded.type_tag.clone(),
            source,
        })?;
        if value.is_null() {
            return Ok(NativeValue::Null);
        }
        if let Some((type_tag, data)) = tagged_parts(&value) {
            return Ok(NativeValue::Tagged {
                type_tag,
                data: data.clone(),
            });
        }
        if let Some(id) = reference_id(&value) {
            return Ok(NativeValue::Reference(id));
        }
        match self.decoders.get(&registry_key(&encoded.type_tag)) {
            Some(decode) => decode(&value),
            None => Ok(NativeValue::Json(value)),
        }
    }

    /// Converts a decoded value to what a `target`-typed field can hold.
    ///
    /// `references` are the external objects the source value pointed at; a
    /// non-primitive target receives the first of them when the value itself
    /// is not already a reference.
    pub fn coerce(
        &self,
        value: NativeValue,
        target: &TypeName,
        references: &[ObjectRef],
    ) -> Result<NativeValue> {
        if value == NativeValue::Null {
            return Ok(value);
        }
        let Some(kind) = primitive_kind(target) else {
            return Ok(match (value, references.first()) {
                (value @ (NativeValue::Reference(_) | NativeValue::Tagged { .. }), _) => value,
                (_, Some(first)) => NativeValue::Reference(first.clone()),
                (value, None) => value,
            });
        };
        let failed = |value: &NativeValue| CodecError::Coerce {
            value: value.to_string(),
            target: target.clone(),
        };
        match (kind, value) {
            (Primitive::Integer, NativeValue::Int(v)) => Ok(NativeValue::Int(v)),
            (Primitive::Integer, NativeValue::Float(v)) => truncate(v)
                .map(NativeValue::Int)
                .ok_or_else(|| failed(&NativeValue::Float(v))),
            (Primitive::Integer, NativeValue::Bool(v)) => Ok(NativeValue::Int(i64::from(v))),
            (Primitive::Integer, value @ NativeValue::Text(_)) => {
                decode_int(&value.to_json()).map_err(|_| failed(&value))
            }
            (Primitive::Float, NativeValue::Int(v)) => Ok(NativeValue::Float(v as f64)),
            (Primitive::Float, NativeValue::Float(v)) => Ok(NativeValue::Float(v)),
            (Primitive::Float, value @ NativeValue::Text(_)) => {
                decode_float(&value.to_json()).map_err(|_| failed(&value))
            }
            (Primitive::Bool, NativeValue::Bool(v)) => Ok(NativeValue::Bool(v)),
            (Primitive::Bool, value @ (NativeValue::Int(_) | NativeValue::Text(_))) => {
                decode_bool(&value.to_json()).map_err(|_| failed(&value))
            }
            (Primitive::Text, NativeValue::Text(v)) => Ok(NativeValue::Text(v)),
            (Primitive::Text, NativeValue::Int(v)) => Ok(NativeValue::Text(v.to_string())),
            (Primitive::Text, NativeValue::Float(v)) => Ok(NativeValue::Text(v.to_string())),
            (Primitive::Text, NativeValue::Bool(v)) => Ok(NativeValue::Text(v.to_string())),
            (_, value) => Err(failed(&value)),
        }
    }
}

fn registry_key(type_tag: &TypeName) -> String {
    type_tag.as_str().to_lowercase()
}

fn truncate(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn mismatch(expected: &'static str, value: &Value) -> CodecError {
    CodecError::Mismatch {
        expected,
        found: value.to_string(),
    }
}

fn decode_int(value: &Value) -> Result<NativeValue> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .map(NativeValue::Int)
        .ok_or_else(|| mismatch("an integer", value))
}

fn decode_float(value: &Value) -> Result<NativeValue> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(NativeValue::Float)
        .ok_or_else(|| mismatch("a number", value))
}

fn decode_bool(value: &Value) -> Result<NativeValue> {
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed
        .map(NativeValue::Bool)
        .ok_or_else(|| mismatch("a boolean", value))
}

fn decode_text(value: &Value) -> Result<NativeValue> {
    match value {
        Value::String(s) => Ok(NativeValue::Text(s.clone())),
        Value::Number(_) | Value::Bool(_) => Ok(NativeValue::Text(value.to_string())),
        _ => Err(mismatch("a string", value)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ty(name: &str) -> TypeName {
        TypeName::new(name).unwrap()
    }

    fn encoded(tag: &str, value: Value) -> EncodedValue {
        EncodedValue::from_json(ty(tag), &value)
    }

    #[test]
    fn decodes_builtin_primitives() {
        let codec = ValueCodec::default();
        assert_eq!(codec.decode(&encoded("int", json!(7))).unwrap(), NativeValue::Int(7));
        assert_eq!(
            codec.decode(&encoded("Float", json!(1.5))).unwrap(),
            NativeValue::Float(1.5)
        );
        assert_eq!(
            codec.decode(&encoded("bool", json!("TRUE"))).unwrap(),
            NativeValue::Bool(true)
        );
        assert_eq!(
            codec.decode(&encoded("string", json!("x"))).unwrap(),
            NativeValue::Text("x".into())
        );
    }

    #[test]
    fn unknown_tags_decode_to_json() {
        let codec = ValueCodec::default();
        let value = json!({"r": 1, "g": 0, "b": 0});
        assert_eq!(
            codec.decode(&encoded("Color", value.clone())).unwrap(),
            NativeValue::Json(value)
        );
    }

    #[test]
    fn tagged_payload_keeps_runtime_type() {
        let codec = ValueCodec::default();
        let value = EncodedValue::tagged(ty("FireSpell"), &json!({"power": 3}));
        assert_eq!(
            codec.decode(&value).unwrap(),
            NativeValue::Tagged {
                type_tag: ty("FireSpell"),
                data: json!({"power": 3}),
            }
        );
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let codec = ValueCodec::default();
        let value = EncodedValue {
            type_tag: ty("int"),
            payload: "{not json".into(),
        };
        assert!(matches!(codec.decode(&value), Err(CodecError::Payload { .. })));
    }

    #[test]
    fn coerces_between_numeric_families() {
        let codec = ValueCodec::default();
        assert_eq!(
            codec.coerce(NativeValue::Int(3), &ty("float"), &[]).unwrap(),
            NativeValue::Float(3.0)
        );
        assert_eq!(
            codec.coerce(NativeValue::Float(-2.7), &ty("int"), &[]).unwrap(),
            NativeValue::Int(-2)
        );
        assert_eq!(
            codec.coerce(NativeValue::Text("42".into()), &ty("int"), &[]).unwrap(),
            NativeValue::Int(42)
        );
        assert!(codec.coerce(NativeValue::Float(f64::NAN), &ty("int"), &[]).is_err());
    }

    #[test]
    fn coerces_booleans_from_text_and_numbers() {
        let codec = ValueCodec::default();
        assert_eq!(
            codec.coerce(NativeValue::Int(0), &ty("bool"), &[]).unwrap(),
            NativeValue::Bool(false)
        );
        assert_eq!(
            codec.coerce(NativeValue::Text("1".into()), &ty("bool"), &[]).unwrap(),
            NativeValue::Bool(true)
        );
        assert!(codec.coerce(NativeValue::Text("maybe".into()), &ty("bool"), &[]).is_err());
    }

    #[test]
    fn object_targets_take_the_first_reference() {
        let codec = ValueCodec::default();
        let refs = [ObjectRef::new("mat-1"), ObjectRef::new("mat-2")];
        assert_eq!(
            codec.coerce(NativeValue::Json(json!({})), &ty("Material"), &refs).unwrap(),
            NativeValue::Reference(ObjectRef::new("mat-1"))
        );
    }

    #[test]
    fn reference_payload_round_trips_to_json() {
        let codec = ValueCodec::default();
        let value = codec
            .decode(&encoded("Material", json!({"$ref": "mat-9"})))
            .unwrap();
        assert_eq!(value, NativeValue::Reference(ObjectRef::new("mat-9")));
        assert_eq!(value.to_json(), json!({"$ref": "mat-9"}));
    }
}
