use std::fs;

use fieldmatch_map::{AliasLookup, AliasStore, MatcherSettings};
use fieldmatch_model::{
    EncodedValue, FieldDescriptor, FieldPath, Match, SolverKind, StrategyKind, TargetDescriptor,
    TypeName,
};

fn ty(name: &str) -> TypeName {
    TypeName::new(name).unwrap()
}

#[test]
fn missing_store_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = AliasStore::open(dir.path().join("aliases.json")).expect("open store");
    assert!(store.is_empty());
    assert!(store.saved_at().is_none());
}

#[test]
fn store_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("aliases.json");

    let mut store = AliasStore::open(&path).expect("open store");
    store.add(ty("Player"), "Armor", "Defense");
    store.add(ty("Player"), "Mana", "Energy");
    store.save().expect("save store");
    assert!(path.exists());
    assert!(store.saved_at().is_some());

    let reloaded = AliasStore::open(&path).expect("reopen store");
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.has_alias(&ty("player"), "armor", "DEFENSE"));
    assert_eq!(
        reloaded.alias_for(&ty("Player"), "mana"),
        Some("Energy".to_string())
    );
    assert_eq!(reloaded.alias_for(&ty("Enemy"), "Mana"), None);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"version\": \"1.0\""));
    assert!(raw.contains("\"owner_type\": \"Player\""));
}

#[test]
fn adding_twice_replaces_the_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AliasStore::open(dir.path().join("aliases.json")).unwrap();
    assert_eq!(store.add(ty("Player"), "Armor", "Defense"), None);
    assert_eq!(
        store.add(ty("Player"), "ARMOR", "Shield"),
        Some("Defense".to_string())
    );
    assert_eq!(store.len(), 1);
    assert!(store.has_alias(&ty("Player"), "Armor", "Shield"));
    assert!(!store.has_alias(&ty("Player"), "Armor", "Defense"));
}

#[test]
fn alias_lookup_folds_non_ascii_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AliasStore::open(dir.path().join("aliases.json")).unwrap();
    store.add(ty("Héros"), "Énergie", "Mana");
    assert_eq!(
        store.alias_for(&ty("HÉROS"), "éNERGIE"),
        Some("Mana".to_string())
    );
    assert!(store.has_alias(&ty("héros"), "ÉNERGIE", "mana"));
}

#[test]
fn remove_reports_whether_anything_changed() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AliasStore::open(dir.path().join("aliases.json")).unwrap();
    store.add(ty("Player"), "Armor", "Defense");
    assert!(store.remove(&ty("Player"), "armor"));
    assert!(!store.remove(&ty("Player"), "armor"));
    assert!(store.is_empty());
}

#[test]
fn teach_records_match_display_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AliasStore::open(dir.path().join("aliases.json")).unwrap();
    let accepted = Match {
        source: FieldDescriptor::new(
            FieldPath::new("stats.armor").unwrap(),
            "Armor",
            ty("int"),
            EncodedValue::null(ty("int")),
        ),
        target: TargetDescriptor::new(FieldPath::new("defense").unwrap(), "Defense", ty("int")),
        score: 0.42,
        strategy: StrategyKind::NameSimilarity,
    };
    store.teach(&accepted, &ty("Player"));
    assert!(store.has_alias(&ty("Player"), "Armor", "Defense"));
}

#[test]
fn corrupt_store_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aliases.json");
    fs::write(&path, "{ not json").unwrap();
    let err = AliasStore::open(&path).unwrap_err();
    assert!(format!("{err:#}").contains("aliases.json"));
}

#[test]
fn settings_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    assert_eq!(MatcherSettings::load(&path).unwrap(), MatcherSettings::default());

    let settings = MatcherSettings {
        solver: SolverKind::Hungarian,
        symmetric_defaults: false,
        aliases_path: Some(dir.path().join("aliases.json")),
        ..MatcherSettings::default()
    };
    settings.save(&path).unwrap();
    assert_eq!(MatcherSettings::load(&path).unwrap(), settings);
}
