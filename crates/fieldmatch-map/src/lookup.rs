//! Read-only name lookups consulted by the scoring chain.

use fieldmatch_model::TypeName;

/// User-taught aliases: `(owner type, source field name) -> target field name`.
pub trait AliasLookup {
    fn alias_for(&self, owner_type: &TypeName, source_name: &str) -> Option<String>;
}

impl<F> AliasLookup for F
where
    F: Fn(&TypeName, &str) -> Option<String>,
{
    fn alias_for(&self, owner_type: &TypeName, source_name: &str) -> Option<String> {
        self(owner_type, source_name)
    }
}

/// Built-in name equivalences such as `Speed` / `Velocity`.
pub trait DefaultMappingLookup {
    fn is_default_mapping(&self, source_name: &str, target_name: &str) -> bool;
}

impl<F> DefaultMappingLookup for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_default_mapping(&self, source_name: &str, target_name: &str) -> bool {
        self(source_name, target_name)
    }
}
