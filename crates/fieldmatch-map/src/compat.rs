//! Type compatibility between source and target fields.
//!
//! The matching core only asks one question of the host type system: can a
//! value of the source type be stored in the target field? The answer comes
//! from an injected [`TypeCompatibility`] implementation. [`TypeHierarchy`] is
//! the stock implementation, built from a [`Schema`](crate::schema::Schema) or
//! by hand.

use std::collections::{BTreeMap, BTreeSet};

use fieldmatch_model::TypeName;

use crate::schema::Schema;

/// Answers whether a source type may be written into a target type.
///
/// Implementations must return `false` (never panic) for types they cannot
/// resolve.
pub trait TypeCompatibility {
    fn are_compatible(
        &self,
        source: &TypeName,
        target: &TypeName,
        allow_numeric_widening: bool,
    ) -> bool;
}

impl<F> TypeCompatibility for F
where
    F: Fn(&TypeName, &TypeName, bool) -> bool,
{
    fn are_compatible(
        &self,
        source: &TypeName,
        target: &TypeName,
        allow_numeric_widening: bool,
    ) -> bool {
        self(source, target, allow_numeric_widening)
    }
}

/// Numeric family of a primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

pub(crate) const INTEGER_TYPES: &[&str] = &[
    "int", "integer", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "long", "short",
    "byte", "system.int32", "system.int64",
];

pub(crate) const FLOAT_TYPES: &[&str] = &[
    "float", "f32", "f64", "double", "system.single", "system.double",
];

/// Classifies a type name into a numeric family, if it is one.
pub fn numeric_kind(name: &TypeName) -> Option<NumericKind> {
    let lowered = name.as_str().to_ascii_lowercase();
    if INTEGER_TYPES.contains(&lowered.as_str()) {
        Some(NumericKind::Integer)
    } else if FLOAT_TYPES.contains(&lowered.as_str()) {
        Some(NumericKind::Float)
    } else {
        None
    }
}

/// Float/integer pairs in either direction.
pub fn is_numeric_widening(source: &TypeName, target: &TypeName) -> bool {
    matches!(
        (numeric_kind(source), numeric_kind(target)),
        (Some(NumericKind::Integer), Some(NumericKind::Float))
            | (Some(NumericKind::Float), Some(NumericKind::Integer))
    )
}

/// Inheritance and capability graph of known types.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    parents: BTreeMap<TypeName, TypeName>,
    capabilities: BTreeMap<TypeName, BTreeSet<TypeName>>,
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects base types and implemented capabilities declared in a schema.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut hierarchy = Self::new();
        for (name, ty) in schema.types() {
            if let Some(base) = &ty.base {
                hierarchy.add_parent(name.clone(), base.clone());
            }
            for capability in &ty.implements {
                hierarchy.add_capability(name.clone(), capability.clone());
            }
        }
        hierarchy
    }

    /// Records that `child` derives from `parent`.
    pub fn add_parent(&mut self, child: TypeName, parent: TypeName) {
        self.parents.insert(child, parent);
    }

    /// Records that `ty` can be stored wherever `capability` is expected.
    pub fn add_capability(&mut self, ty: TypeName, capability: TypeName) {
        self.capabilities.entry(ty).or_default().insert(capability);
    }

    /// True when a `target`-typed field can hold a `source` value through
    /// inheritance or a declared capability.
    pub fn is_assignable(&self, source: &TypeName, target: &TypeName) -> bool {
        if source == target {
            return true;
        }
        let mut visited = BTreeSet::new();
        let mut pending = vec![source];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(parent) = self.parents.get(current) {
                if parent == target {
                    return true;
                }
                pending.push(parent);
            }
            if let Some(caps) = self.capabilities.get(current) {
                if caps.contains(target) {
                    return true;
                }
                pending.extend(caps.iter());
            }
        }
        false
    }

    /// All ancestors of a type, nearest first.
    pub fn ancestors(&self, ty: &TypeName) -> Vec<&TypeName> {
        let mut chain = Vec::new();
        let mut current = ty;
        while let Some(parent) = self.parents.get(current) {
            if chain.contains(&parent) || parent == ty {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl TypeCompatibility for TypeHierarchy {
    fn are_compatible(
        &self,
        source: &TypeName,
        target: &TypeName,
        allow_numeric_widening: bool,
    ) -> bool {
        if self.is_assignable(source, target) {
            return true;
        }
        allow_numeric_widening && is_numeric_widening(source, target)
    }
}
