//! Field capture from JSON objects described by a [`Schema`].

use serde_json::Value;
use tracing::debug;

use fieldmatch_model::{
    CapturedFieldSet, EncodedValue, FieldDescriptor, FieldPath, ObjectRef, REFERENCE_KEY,
    TargetDescriptor, TargetSet, TypeName,
};

use crate::codec::tagged_parts;
use crate::error::{MapError, Result, json_kind};
use crate::schema::Schema;

/// Captures every matchable field of `object`, an instance of `owner`.
///
/// Fields come out in declaration order with inherited fields first. Values
/// absent from the object are captured as `null`.
pub fn capture(schema: &Schema, owner: &TypeName, object: &Value) -> Result<CapturedFieldSet> {
    if !object.is_object() {
        return Err(MapError::NotAnObject {
            owner: owner.clone(),
            found: json_kind(object),
        });
    }

    let fields = schema
        .walk(owner)?
        .into_iter()
        .map(|(path, field)| {
            let value = value_at(object, &path);
            let mut references = Vec::new();
            if let Some(value) = value {
                collect_references(value, &mut references);
            }
            FieldDescriptor::new(
                path,
                field.display_name(),
                field.type_name.clone(),
                encode(&field.type_name, value),
            )
            .with_former_names(field.former_names.iter().cloned())
            .with_references(references)
        })
        .collect::<Vec<_>>();

    debug!(owner = %owner, fields = fields.len(), "captured fields");
    Ok(CapturedFieldSet::new(owner.clone(), fields)?)
}

/// Describes the fields of `owner` as match targets.
pub fn describe_targets(schema: &Schema, owner: &TypeName) -> Result<TargetSet> {
    let fields = schema
        .walk(owner)?
        .into_iter()
        .map(|(path, field)| {
            TargetDescriptor::new(path, field.display_name(), field.type_name.clone())
        })
        .collect();
    Ok(TargetSet::new(Some(owner.clone()), fields)?)
}

fn value_at<'v>(object: &'v Value, path: &FieldPath) -> Option<&'v Value> {
    path.segments().try_fold(object, |current, segment| current.get(segment))
}

fn encode(declared: &TypeName, value: Option<&Value>) -> EncodedValue {
    match value {
        None | Some(Value::Null) => EncodedValue::null(declared.clone()),
        Some(value) => match tagged_parts(value) {
            Some((runtime_type, data)) => EncodedValue::tagged(runtime_type, data),
            None => EncodedValue::from_json(declared.clone(), value),
        },
    }
}

/// Collects `{"$ref": "<id>"}` markers anywhere inside a value, in document order.
fn collect_references(value: &Value, out: &mut Vec<ObjectRef>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get(REFERENCE_KEY) {
                out.push(ObjectRef::new(id.as_str()));
            }
            for (key, child) in map {
                if key != REFERENCE_KEY {
                    collect_references(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        _ => {}
    }
}
