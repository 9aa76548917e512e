use fieldmatch_map::{
    MatchingEngine, Schema, SchemaIntrospector, SynonymTable, TypeHierarchy, ValueCodec,
    apply_matches, capture, describe_targets,
};
use fieldmatch_model::{FieldPath, ObjectRef, SolverConfig, StrategyKind, TypeName};
use serde_json::json;

fn ty(name: &str) -> TypeName {
    TypeName::new(name).unwrap()
}

const SCHEMA: &str = r#"{
    "types": {
        "Actor": {
            "implements": ["IDamageable"],
            "fields": [
                { "name": "health", "type": "int", "display_name": "Health" },
                { "name": "$guid", "type": "string" }
            ]
        },
        "Player": {
            "base": "Actor",
            "fields": [
                { "name": "speed", "type": "float", "display_name": "Speed" },
                { "name": "material", "type": "Material", "display_name": "Material" },
                { "name": "spell", "type": "Spell", "display_name": "Spell" },
                { "name": "dirty", "type": "bool", "internal": true }
            ]
        },
        "Enemy": {
            "fields": [
                { "name": "hitPoints", "type": "float", "display_name": "HitPoints" },
                { "name": "velocity", "type": "int", "display_name": "Velocity",
                  "former_names": ["speed"] },
                { "name": "look", "type": "Look", "display_name": "Look" }
            ]
        },
        "Look": {
            "fields": [
                { "name": "material", "type": "Material", "display_name": "Material" }
            ]
        }
    }
}"#;

#[test]
fn captures_inherited_then_own_fields() {
    let schema = Schema::from_json_str(SCHEMA).unwrap();
    let object = json!({
        "health": 80,
        "$guid": "abc",
        "speed": 4.5,
        "material": {"$ref": "mat-red"},
        "spell": {"$type": "FireSpell", "data": {"power": 3}},
        "dirty": true
    });
    let captured = capture(&schema, &ty("Player"), &object).unwrap();

    let paths: Vec<&str> = captured.fields().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, ["health", "speed", "material", "spell"]);

    let material = captured.get("material").unwrap();
    assert_eq!(material.references, vec![ObjectRef::new("mat-red")]);

    let spell = captured.get("spell").unwrap();
    assert_eq!(spell.value.type_tag, ty("FireSpell"));
    assert_eq!(spell.type_name, ty("Spell"));
}

#[test]
fn missing_values_are_captured_as_null() {
    let schema = Schema::from_json_str(SCHEMA).unwrap();
    let captured = capture(&schema, &ty("Player"), &json!({"speed": 1.0})).unwrap();
    assert!(captured.get("health").unwrap().value.is_null());
    assert!(!captured.get("speed").unwrap().value.is_null());
}

#[test]
fn targets_follow_nested_types() {
    let schema = Schema::from_json_str(SCHEMA).unwrap();
    let targets = describe_targets(&schema, &ty("Enemy")).unwrap();
    let paths: Vec<&str> = targets.fields().iter().map(|t| t.path.as_str()).collect();
    assert_eq!(paths, ["hitPoints", "velocity", "look.material"]);
    assert_eq!(targets.owner_type(), Some(&ty("Enemy")));
    assert_eq!(
        schema.resolve_type(&ty("Enemy"), &FieldPath::new("look.material").unwrap()),
        Some(ty("Material"))
    );
}

#[test]
fn capture_match_and_apply_end_to_end() {
    let schema = Schema::from_json_str(SCHEMA).unwrap();
    let types = TypeHierarchy::from_schema(&schema);
    let defaults = SynonymTable::builtin();
    let engine = MatchingEngine::new(&types, SolverConfig::exact()).with_defaults(&defaults);

    let source = json!({
        "health": 80,
        "speed": 4.5,
        "material": {"$ref": "mat-red"}
    });
    let captured = capture(&schema, &ty("Player"), &source).unwrap();
    let targets = describe_targets(&schema, &ty("Enemy")).unwrap();
    let report = engine.run(&captured, &targets);

    let health = report.match_for_source("health").unwrap();
    assert_eq!(health.target.path.as_str(), "hitPoints");
    assert_eq!(health.strategy, StrategyKind::DefaultMapping);
    assert_eq!(health.score, 0.92);

    let speed = report.match_for_source("speed").unwrap();
    assert_eq!(speed.target.path.as_str(), "velocity");
    assert_eq!(speed.score, 0.92);

    let material = report.match_for_source("material").unwrap();
    assert_eq!(material.target.path.as_str(), "look.material");
    assert_eq!(material.strategy, StrategyKind::ExactName);

    let mut document = json!({"hitPoints": 10.0});
    let applied = apply_matches(&report.matches, &ValueCodec::default(), &mut document);
    assert!(applied.is_complete(), "{:?}", applied.skipped);
    assert_eq!(
        document,
        json!({
            "hitPoints": 80.0,
            "velocity": 4,
            "look": {"material": {"$ref": "mat-red"}}
        })
    );
}

#[test]
fn failed_field_does_not_stop_the_rest() {
    let schema = Schema::from_json_str(
        r#"{"types": {
            "A": {"fields": [
                {"name": "flag", "type": "string", "display_name": "Flag"},
                {"name": "count", "type": "int", "display_name": "Count"}
            ]},
            "B": {"fields": [
                {"name": "flag", "type": "bool", "display_name": "Flag"},
                {"name": "count", "type": "int", "display_name": "Count"}
            ]}
        }}"#,
    )
    .unwrap();
    let types = TypeHierarchy::from_schema(&schema);
    let engine = MatchingEngine::new(&types, SolverConfig::greedy());
    let captured = capture(&schema, &ty("A"), &json!({"flag": "maybe", "count": 3})).unwrap();
    let targets = describe_targets(&schema, &ty("B")).unwrap();
    let report = engine.run(&captured, &targets);
    assert_eq!(report.matches.len(), 2);

    let mut document = json!({});
    let applied = apply_matches(&report.matches, &ValueCodec::default(), &mut document);
    assert_eq!(applied.applied, vec![FieldPath::new("count").unwrap()]);
    assert_eq!(applied.skipped.len(), 1);
    assert_eq!(applied.skipped[0].path.as_str(), "flag");
    assert_eq!(document, json!({"count": 3}));
}
