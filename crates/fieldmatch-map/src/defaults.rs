//! Built-in default name mappings.

use std::collections::BTreeMap;

use fieldmatch_model::{NameSet, eq_ignore_case};

use crate::lookup::DefaultMappingLookup;

/// Built-in mapping rows: a source name and the target names it may map to.
const BUILTIN_MAPPINGS: &[(&str, &[&str])] = &[
    ("Speed", &["Velocity", "MoveSpeed", "MaxSpeed"]),
    ("Velocity", &["Speed", "MoveSpeed", "MaxSpeed"]),
    ("Health", &["HitPoints", "HP", "Life", "HealthPoints"]),
    ("HitPoints", &["Health", "HP", "Life", "HealthPoints"]),
    ("Position", &["Location", "Pos", "Transform"]),
    ("Location", &["Position", "Pos", "Transform"]),
    ("Damage", &["AttackPower", "Attack", "Dmg", "Power"]),
    ("AttackPower", &["Damage", "Attack", "Dmg", "Power"]),
    ("CharacterName", &["Title", "Name", "DisplayName"]),
    ("Title", &["CharacterName", "Name", "DisplayName"]),
    ("IsMoving", &["CanMove", "Moving"]),
    ("CanMove", &["IsMoving", "Moving"]),
    ("IsActive", &["Enabled", "Active", "IsEnabled"]),
    ("Enabled", &["IsActive", "Active", "IsEnabled"]),
    ("TeamColor", &["FactionColor", "Color"]),
    ("FactionColor", &["TeamColor", "Color"]),
];

#[derive(Debug, Clone)]
struct Entry {
    source: String,
    targets: NameSet,
}

/// Case-insensitive table of default source → target name mappings.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: BTreeMap<String, Entry>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table with reverse entries derived, so every mapping
    /// holds in both directions.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (source, targets) in BUILTIN_MAPPINGS {
            table.insert_symmetric(source, targets.iter().copied());
        }
        table
    }

    /// The built-in table exactly as listed, one direction per row.
    pub fn builtin_one_way() -> Self {
        let mut table = Self::new();
        for (source, targets) in BUILTIN_MAPPINGS {
            table.insert(source, targets.iter().copied());
        }
        table
    }

    /// Adds one-directional mappings from `source` to each target.
    pub fn insert<'a>(&mut self, source: &str, targets: impl IntoIterator<Item = &'a str>) {
        let entry = self
            .entries
            .entry(source.trim().to_lowercase())
            .or_insert_with(|| Entry {
                source: source.trim().to_string(),
                targets: NameSet::default(),
            });
        for target in targets {
            if !eq_ignore_case(target.trim(), source.trim()) {
                entry.targets.insert(target);
            }
        }
    }

    /// Adds mappings from `source` to each target and back.
    pub fn insert_symmetric<'a>(
        &mut self,
        source: &str,
        targets: impl IntoIterator<Item = &'a str>,
    ) {
        let targets: Vec<&str> = targets.into_iter().collect();
        self.insert(source, targets.iter().copied());
        for target in targets {
            self.insert(target, [source]);
        }
    }

    pub fn maps_to(&self, source: &str, target: &str) -> bool {
        self.entries
            .get(&source.trim().to_lowercase())
            .is_some_and(|entry| entry.targets.contains(target))
    }

    /// Rows of the table in name order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.entries
            .values()
            .map(|entry| (entry.source.as_str(), entry.targets.iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefaultMappingLookup for SynonymTable {
    fn is_default_mapping(&self, source_name: &str, target_name: &str) -> bool {
        self.maps_to(source_name, target_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_case_insensitively() {
        let table = SynonymTable::builtin();
        assert!(table.maps_to("speed", "VELOCITY"));
        assert!(table.maps_to("Health", "hp"));
        assert!(!table.maps_to("Speed", "Health"));
    }

    #[test]
    fn one_way_table_keeps_listed_direction_only() {
        let table = SynonymTable::builtin_one_way();
        assert!(table.maps_to("CharacterName", "Name"));
        assert!(!table.maps_to("Name", "CharacterName"));
    }

    #[test]
    fn symmetric_table_derives_reverse_rows() {
        let table = SynonymTable::builtin();
        assert!(table.maps_to("Name", "CharacterName"));
        assert!(table.maps_to("MoveSpeed", "Speed"));
        assert!(table.maps_to("Color", "TeamColor"));
    }

    #[test]
    fn self_mapping_is_not_stored() {
        let mut table = SynonymTable::new();
        table.insert("IsMoving", ["IsMoving", "Moving"]);
        assert!(!table.maps_to("IsMoving", "IsMoving"));
        assert!(table.maps_to("IsMoving", "Moving"));
    }
}
