use frontdesk_core::error::CoreError;
use frontdesk_core::path::{FieldValue, StoragePath, ValueKind};
use serde_json::{json, Map, Value};

fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("test body must be an object"),
    }
}

#[test]
fn top_level_path_is_not_nested() {
    let path = StoragePath::parse("employeeID").unwrap();
    assert!(!path.is_nested());
    assert_eq!(path.leaf(), "employeeID");
}

#[test]
fn dotted_path_exposes_leaf() {
    let path = StoragePath::parse("consultationData.diagnosis").unwrap();
    assert!(path.is_nested());
    assert_eq!(path.leaf(), "diagnosis");
    assert_eq!(path.to_string(), "consultationData.diagnosis");
}

#[test]
fn empty_segments_are_malformed() {
    for raw in ["", "a..b", "a.", ".a"] {
        assert!(
            matches!(StoragePath::parse(raw), Err(CoreError::MalformedPath(_))),
            "{raw:?} should be malformed"
        );
    }
}

#[test]
fn resolves_nested_sequence_with_kind() {
    let record = body(json!({
        "consultationData": { "diagnosis": ["Flu", "Cough"] }
    }));
    let path = StoragePath::parse("consultationData.diagnosis").unwrap();
    let value = path.resolve(&record).unwrap().unwrap();
    assert_eq!(value.kind(), ValueKind::Sequence);
    match value {
        FieldValue::Sequence(items) => assert_eq!(items.len(), 2),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn missing_and_null_resolve_to_none() {
    let record = body(json!({ "name": null, "consultationData": null }));
    for raw in ["name", "absent", "consultationData.amount", "absent.amount"] {
        let path = StoragePath::parse(raw).unwrap();
        assert_eq!(path.resolve(&record).unwrap(), None, "{raw}");
    }
}

#[test]
fn scalar_container_is_reported() {
    let record = body(json!({ "consultationData": "n/a" }));
    let path = StoragePath::parse("consultationData.amount").unwrap();
    let err = path.resolve(&record).unwrap_err();
    assert!(matches!(err, CoreError::NotAContainer { ref segment, .. } if segment == "consultationData"));
}

#[test]
fn deeper_paths_traverse_every_object() {
    let record = body(json!({ "a": { "b": { "c": 7 } } }));
    let path = StoragePath::parse("a.b.c").unwrap();
    let value = path.resolve(&record).unwrap().unwrap();
    assert_eq!(value.kind(), ValueKind::Number);
}
