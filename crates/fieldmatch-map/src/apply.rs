//! Writing matched values into a target document.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use fieldmatch_model::{FieldPath, Match};

use crate::codec::ValueCodec;
use crate::error::{MapError, Result};

/// A target field that was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    pub path: FieldPath,
    pub reason: String,
}

/// Outcome of applying a set of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Target paths that received a value, in match order.
    pub applied: Vec<FieldPath>,
    pub skipped: Vec<SkippedField>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Decodes each match's source value, coerces it to the target field's type
/// and writes it into `document` at the target path.
///
/// A field that fails is skipped and logged; the others are still written.
pub fn apply_matches(matches: &[Match], codec: &ValueCodec, document: &mut Value) -> ApplyReport {
    let mut report = ApplyReport::default();
    for m in matches {
        match apply_one(m, codec, document) {
            Ok(()) => report.applied.push(m.target.path.clone()),
            Err(err) => {
                warn!(
                    source = %m.source.path,
                    target = %m.target.path,
                    error = %err,
                    "value not applied"
                );
                report.skipped.push(SkippedField {
                    path: m.target.path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    debug!(
        applied = report.applied.len(),
        skipped = report.skipped.len(),
        "applied matches"
    );
    report
}

fn apply_one(m: &Match, codec: &ValueCodec, document: &mut Value) -> Result<()> {
    let decoded = codec.decode(&m.source.value)?;
    let value = codec.coerce(decoded, &m.target.type_name, &m.source.references)?;
    write_at(document, &m.target.path, value.to_json())
}

/// Sets `path` in `document`, creating intermediate objects as needed.
fn write_at(document: &mut Value, path: &FieldPath, value: Value) -> Result<()> {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(MapError::InvalidTarget {
            path: path.clone(),
            reason: "empty path".to_string(),
        });
    };

    let mut current = document;
    for segment in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let object = current
            .as_object_mut()
            .ok_or_else(|| MapError::InvalidTarget {
                path: path.clone(),
                reason: format!("parent of `{segment}` is not an object"),
            })?;
        current = object
            .entry((*segment).to_string())
            .or_insert(Value::Null);
    }
    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    let object = current
        .as_object_mut()
        .ok_or_else(|| MapError::InvalidTarget {
            path: path.clone(),
            reason: format!("parent of `{last}` is not an object"),
        })?;
    object.insert((*last).to_string(), value);
    Ok(())
}
