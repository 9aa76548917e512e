//! Serialization schema of the objects fields are captured from.
//!
//! The schema replaces runtime reflection: it lists every known type with its
//! base type, the capabilities it implements and its serialized fields in
//! declaration order.
//!
//! ```json
//! {
//!   "types": {
//!     "Actor":  { "fields": [ { "name": "health", "type": "int" } ] },
//!     "Player": { "base": "Actor", "implements": ["IMovable"],
//!                 "fields": [ { "name": "speed", "type": "float",
//!                               "display_name": "Speed",
//!                               "former_names": ["velocity"] } ] }
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fieldmatch_model::{FieldPath, TypeName};

use crate::error::{MapError, Result};

/// Resolves the declared type behind a stable field path.
pub trait SchemaIntrospector {
    fn resolve_type(&self, owner: &TypeName, path: &FieldPath) -> Option<TypeName>;
}

/// One serialized field of a schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub former_names: Vec<String>,
    /// Host-internal bookkeeping, never captured or written.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub internal: bool,
}

impl FieldSchema {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Internal fields and `$`-prefixed names take no part in matching.
    pub fn is_skipped(&self) -> bool {
        self.internal || self.name.starts_with('$')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<TypeName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeName>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

/// Leaf fields of a type with their dotted paths, in capture order.
pub type SchemaWalk<'a> = Vec<(FieldPath, &'a FieldSchema)>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    types: BTreeMap<TypeName, TypeSchema>,
}

impl Schema {
    /// Parses and validates a schema document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Loads a schema file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema from {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse schema from {}", path.display()))
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeSchema> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn types(&self) -> impl Iterator<Item = (&TypeName, &TypeSchema)> {
        self.types.iter()
    }

    /// Own and inherited fields of a type, base type fields first.
    pub fn fields_of(&self, owner: &TypeName) -> Result<Vec<&FieldSchema>> {
        let mut chain: Vec<(&TypeName, &TypeSchema)> = Vec::new();
        let mut current = Some(owner);
        while let Some(name) = current {
            let schema = self
                .types
                .get(name)
                .ok_or_else(|| MapError::UnknownType(name.clone()))?;
            if chain.iter().any(|(seen, _)| *seen == name) {
                return Err(MapError::CyclicType(owner.clone()));
            }
            chain.push((name, schema));
            current = schema.base.as_ref();
        }
        Ok(chain
            .iter()
            .rev()
            .flat_map(|(_, schema)| schema.fields.iter())
            .collect())
    }

    /// Walks a type down to its leaf fields.
    ///
    /// Fields whose type is itself a schema type are expanded into dotted
    /// child paths. A type nested inside itself is not expanded again and is
    /// treated as a leaf.
    pub fn walk(&self, owner: &TypeName) -> Result<SchemaWalk<'_>> {
        let mut walk = SchemaWalk::new();
        let mut stack = vec![owner.clone()];
        self.walk_into(owner, None, &mut stack, &mut walk)?;
        Ok(walk)
    }

    fn walk_into<'s>(
        &'s self,
        owner: &TypeName,
        prefix: Option<&FieldPath>,
        stack: &mut Vec<TypeName>,
        walk: &mut SchemaWalk<'s>,
    ) -> Result<()> {
        for field in self.fields_of(owner)? {
            if field.is_skipped() {
                continue;
            }
            let path = match prefix {
                Some(parent) => parent.child(&field.name)?,
                None => FieldPath::new(field.name.as_str())?,
            };
            let nested =
                self.types.contains_key(&field.type_name) && !stack.contains(&field.type_name);
            if nested {
                stack.push(field.type_name.clone());
                self.walk_into(&field.type_name, Some(&path), stack, walk)?;
                stack.pop();
            } else {
                walk.push((path, field));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for name in self.types.keys() {
            let mut seen = BTreeSet::new();
            for field in self.fields_of(name)? {
                if !seen.insert(field.name.as_str()) {
                    return Err(MapError::DuplicateField {
                        owner: name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl SchemaIntrospector for Schema {
    fn resolve_type(&self, owner: &TypeName, path: &FieldPath) -> Option<TypeName> {
        let mut current = owner.clone();
        for segment in path.segments() {
            let fields = self.fields_of(&current).ok()?;
            let field = fields.into_iter().find(|f| f.name == segment)?;
            current = field.type_name.clone();
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(name: &str) -> TypeName {
        TypeName::new(name).unwrap()
    }

    const SCHEMA: &str = r#"{
        "types": {
            "Stats": { "fields": [
                { "name": "health", "type": "int" },
                { "name": "armor", "type": "float" }
            ] },
            "Actor": { "fields": [
                { "name": "name", "type": "string" },
                { "name": "$id", "type": "string" }
            ] },
            "Player": { "base": "Actor", "fields": [
                { "name": "stats", "type": "Stats" },
                { "name": "cache", "type": "string", "internal": true },
                { "name": "speed", "type": "float", "display_name": "Speed" }
            ] }
        }
    }"#;

    #[test]
    fn walk_puts_inherited_fields_first_and_expands_nested_types() {
        let schema = Schema::from_json_str(SCHEMA).unwrap();
        let walk = schema.walk(&ty("Player")).unwrap();
        let paths: Vec<&str> = walk.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, ["name", "stats.health", "stats.armor", "speed"]);
    }

    #[test]
    fn resolves_nested_paths() {
        let schema = Schema::from_json_str(SCHEMA).unwrap();
        let path = FieldPath::new("stats.armor").unwrap();
        assert_eq!(schema.resolve_type(&ty("Player"), &path), Some(ty("float")));
        let missing = FieldPath::new("stats.mana").unwrap();
        assert_eq!(schema.resolve_type(&ty("Player"), &missing), None);
    }

    #[test]
    fn unknown_base_is_rejected() {
        let err = Schema::from_json_str(r#"{"types": {"A": {"base": "Missing"}}}"#).unwrap_err();
        assert!(matches!(err, MapError::UnknownType(name) if name.as_str() == "Missing"));
    }

    #[test]
    fn cyclic_base_is_rejected() {
        let json = r#"{"types": {"A": {"base": "B"}, "B": {"base": "A"}}}"#;
        assert!(matches!(
            Schema::from_json_str(json),
            Err(MapError::CyclicType(_))
        ));
    }

    #[test]
    fn shadowed_inherited_field_is_rejected() {
        let json = r#"{"types": {
            "A": {"fields": [{"name": "x", "type": "int"}]},
            "B": {"base": "A", "fields": [{"name": "x", "type": "int"}]}
        }}"#;
        assert!(matches!(
            Schema::from_json_str(json),
            Err(MapError::DuplicateField { .. })
        ));
    }

    #[test]
    fn self_nested_type_is_a_leaf() {
        let json = r#"{"types": {"Node": {"fields": [
            {"name": "value", "type": "int"},
            {"name": "next", "type": "Node"}
        ]}}}"#;
        let schema = Schema::from_json_str(json).unwrap();
        let walk = schema.walk(&ty("Node")).unwrap();
        let paths: Vec<&str> = walk.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(paths, ["value", "next"]);
    }
}
