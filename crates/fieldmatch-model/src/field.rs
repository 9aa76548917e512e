//! Source and target field descriptors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::encoded::EncodedValue;
use crate::error::{ModelError, Result};
use crate::ids::{FieldPath, ObjectRef, TypeName};

/// One captured source field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Stable member path, unique within a captured set.
    pub path: FieldPath,
    /// Human-facing name used for name-based matching.
    pub display_name: String,
    /// Declared type of the field.
    pub type_name: TypeName,
    /// Encoded value at capture time.
    pub value: EncodedValue,
    /// External objects referenced by the value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ObjectRef>,
    /// Names the field was previously serialized under.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub former_names: Vec<String>,
}

impl FieldDescriptor {
    pub fn new(
        path: FieldPath,
        display_name: impl Into<String>,
        type_name: TypeName,
        value: EncodedValue,
    ) -> Self {
        Self {
            path,
            display_name: display_name.into(),
            type_name,
            value,
            references: Vec::new(),
            former_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_former_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.former_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_references(mut self, references: Vec<ObjectRef>) -> Self {
        self.references = references;
        self
    }
}

/// One candidate destination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub path: FieldPath,
    pub display_name: String,
    pub type_name: TypeName,
}

impl TargetDescriptor {
    pub fn new(path: FieldPath, display_name: impl Into<String>, type_name: TypeName) -> Self {
        Self {
            path,
            display_name: display_name.into(),
            type_name,
        }
    }

    /// Member name without its parent path.
    pub fn bare_name(&self) -> &str {
        self.path.bare_name()
    }
}

/// Fields captured from one source object, handed from capture to matching
/// to value application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCapturedFieldSet")]
pub struct CapturedFieldSet {
    owner_type: TypeName,
    fields: Vec<FieldDescriptor>,
}

impl CapturedFieldSet {
    /// Creates a captured set, rejecting duplicate paths.
    pub fn new(owner_type: TypeName, fields: Vec<FieldDescriptor>) -> Result<Self> {
        ensure_unique(fields.iter().map(|f| &f.path))?;
        Ok(Self { owner_type, fields })
    }

    pub fn owner_type(&self) -> &TypeName {
        &self.owner_type
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.path.as_str() == path)
    }
}

/// Candidate destination fields of one target object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTargetSet")]
pub struct TargetSet {
    /// Owning type of the target object, when known.
    owner_type: Option<TypeName>,
    fields: Vec<TargetDescriptor>,
}

impl TargetSet {
    /// Creates a target set, rejecting duplicate paths.
    pub fn new(owner_type: Option<TypeName>, fields: Vec<TargetDescriptor>) -> Result<Self> {
        ensure_unique(fields.iter().map(|f| &f.path))?;
        Ok(Self { owner_type, fields })
    }

    pub fn owner_type(&self) -> Option<&TypeName> {
        self.owner_type.as_ref()
    }

    pub fn fields(&self) -> &[TargetDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Deserialize)]
struct RawCapturedFieldSet {
    owner_type: TypeName,
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<RawCapturedFieldSet> for CapturedFieldSet {
    type Error = ModelError;

    fn try_from(raw: RawCapturedFieldSet) -> Result<Self> {
        Self::new(raw.owner_type, raw.fields)
    }
}

#[derive(Deserialize)]
struct RawTargetSet {
    #[serde(default)]
    owner_type: Option<TypeName>,
    fields: Vec<TargetDescriptor>,
}

impl TryFrom<RawTargetSet> for TargetSet {
    type Error = ModelError;

    fn try_from(raw: RawTargetSet) -> Result<Self> {
        Self::new(raw.owner_type, raw.fields)
    }
}

fn ensure_unique<'a>(paths: impl Iterator<Item = &'a FieldPath>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for path in paths {
        if !seen.insert(path) {
            return Err(ModelError::DuplicatePath(path.clone()));
        }
    }
    Ok(())
}
