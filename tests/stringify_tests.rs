// Tests for the safe stringifier - public API only

use serde_json::json;
use specrelay::value::stringify::{DEPTH_PLACEHOLDER, MAX_DEPTH};
use specrelay::value::{stringify, HostKind, Value};

fn text(value: &Value) -> String {
    match stringify(value) {
        Some(serde_json::Value::String(s)) => s,
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_root_self_reference() {
    // Arrange
    let root = Value::object([("a", Value::Number(1.0))]);
    root.set("a", root.clone());

    // Act
    let out = text(&root);

    // Assert
    assert_eq!(out, r#"{"a":"[ Circular {root} ]"}"#);
}

#[test]
fn test_deep_chain_with_back_edges_terminates() {
    // Arrange
    let root = Value::object(Vec::<(String, Value)>::new());
    let mut current = root.clone();
    for depth in 0..200 {
        let next = Value::object([("depth", Value::Number(depth as f64))]);
        next.set("up", current.clone());
        next.set("root", root.clone());
        current.set("down", next.clone());
        current = next;
    }

    // Act
    let out = text(&root);

    // Assert
    assert!(out.contains("[ Circular {root} ]"));
    assert!(out.contains("[ Circular {down} ]"));
    assert!(serde_json::from_str::<serde_json::Value>(&out).is_ok());
}

#[test]
fn test_very_deep_chain_is_cut_off() {
    // Arrange
    let root = Value::object([("level", Value::Number(0.0))]);
    let mut current = root.clone();
    for level in 1..100_000 {
        let next = Value::object([("level", Value::Number(level as f64))]);
        current.set("next", next.clone());
        current = next;
    }

    // Act
    let out = text(&root);

    // Assert
    assert_eq!(out.matches(DEPTH_PLACEHOLDER).count(), 1);
    assert_eq!(out.matches("\"level\"").count(), MAX_DEPTH);

    // Unlink front to back so dropping the chain does not recurse
    let mut current = root;
    while let Some(next) = next_link(&current) {
        current.set("next", Value::Null);
        current = next;
    }
}

fn next_link(value: &Value) -> Option<Value> {
    match value {
        Value::Object(object) => object.borrow().get("next").cloned(),
        _ => None,
    }
}

#[test]
fn test_shared_array_in_cycle() {
    // Arrange
    let list = Value::array([Value::Number(1.0)]);
    if let Value::Array(items) = &list {
        items.borrow_mut().push(list.clone());
    }
    let root = Value::object([("items", list)]);

    // Act
    let out = text(&root);

    // Assert
    assert_eq!(out, r#"{"items":[1,"[ Circular {items} ]"]}"#);
}

#[test]
fn test_round_trip_plain_tree() {
    // Arrange
    let source = json!({"a": [1, 2, {"b": "c"}], "d": {"e": false, "f": 0, "g": ""}});

    // Act
    let out = text(&Value::from(source.clone()));

    // Assert
    let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(parsed, source);
}

#[test]
fn test_string_input_unchanged() {
    // Arrange
    let encoded = r#"{"already":"text"}"#;

    // Act
    let out = stringify(&Value::string(encoded));

    // Assert
    assert_eq!(out, Some(json!(encoded)));
}

#[test]
fn test_top_level_host_handle() {
    assert_eq!(text(&Value::Host(HostKind::Window)), r#""[ Window ]""#);
    assert_eq!(text(&Value::function("f")), r#""[ Function ]""#);
}
