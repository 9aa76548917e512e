use fieldmatch_model::{CapturedFieldSet, EncodedValue, FieldPath, TargetSet, TypeName};
use serde_json::json;

#[test]
fn captured_set_deserializes_and_validates() {
    let raw = json!({
        "owner_type": "Enemy",
        "fields": [
            {
                "path": "speed",
                "display_name": "Speed",
                "type_name": "float",
                "value": { "type_tag": "float", "payload": "3.5" },
                "former_names": ["spd"]
            }
        ]
    });
    let set: CapturedFieldSet = serde_json::from_value(raw).expect("valid captured set");
    assert_eq!(set.owner_type().as_str(), "Enemy");
    assert_eq!(set.fields()[0].former_names, vec!["spd".to_string()]);
    assert!(set.fields()[0].references.is_empty());
}

#[test]
fn duplicate_target_paths_fail_to_deserialize() {
    let raw = json!({
        "fields": [
            { "path": "hp", "display_name": "HP", "type_name": "int" },
            { "path": "hp", "display_name": "Hit Points", "type_name": "int" }
        ]
    });
    let result: Result<TargetSet, _> = serde_json::from_value(raw);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("duplicate field path: hp"), "got {err}");
}

#[test]
fn empty_path_fails_to_deserialize() {
    let result: Result<FieldPath, _> = serde_json::from_value(json!("  "));
    assert!(result.is_err());
}

#[test]
fn tagged_value_wraps_runtime_type() {
    let value = EncodedValue::tagged(
        TypeName::new("FireSpell").unwrap(),
        &json!({ "damage": 12 }),
    );
    let payload = value.payload_json().unwrap();
    assert_eq!(payload["$type"], "FireSpell");
    assert_eq!(payload["data"]["damage"], 12);
    assert_eq!(value.type_tag.as_str(), "FireSpell");
}
