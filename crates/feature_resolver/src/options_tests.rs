//! Tests for the closed option value type.

use super::*;

#[test]
fn serializes_untagged_to_devcontainer_shapes() {
    assert_eq!(
        serde_json::to_string(&OptionValue::Bool(true)).unwrap(),
        "true"
    );
    assert_eq!(
        serde_json::to_string(&OptionValue::Number(8080.0)).unwrap(),
        "8080.0"
    );
    assert_eq!(
        serde_json::to_string(&OptionValue::String("latest".to_string())).unwrap(),
        r#""latest""#
    );
    assert_eq!(
        serde_json::to_string(&OptionValue::StringList(vec!["a".to_string(), "b".to_string()]))
            .unwrap(),
        r#"["a","b"]"#
    );
}

#[test]
fn deserializes_nested_maps() {
    let value: OptionValue =
        serde_json::from_str(r#"{"settings": {"editor.formatOnSave": true}}"#).unwrap();
    let OptionValue::Map(entries) = value else {
        panic!("expected a map");
    };
    let OptionValue::Map(settings) = &entries["settings"] else {
        panic!("expected nested map");
    };
    assert_eq!(
        settings["editor.formatOnSave"],
        OptionValue::Bool(true)
    );
}

#[test]
fn empty_detection_covers_strings_lists_and_maps() {
    assert!(OptionValue::String(String::new()).is_empty());
    assert!(OptionValue::StringList(vec![]).is_empty());
    assert!(OptionValue::Map(BTreeMap::new()).is_empty());

    assert!(!OptionValue::Bool(false).is_empty());
    assert!(!OptionValue::Number(0.0).is_empty());
    assert!(!OptionValue::String("x".to_string()).is_empty());
}

#[test]
fn type_names_support_validation_messages() {
    assert_eq!(OptionValue::Bool(true).type_name(), "bool");
    assert_eq!(
        OptionValue::StringList(vec![]).type_name(),
        "string list"
    );
}

#[test]
fn string_list_accessor_rejects_other_variants() {
    let list = OptionValue::StringList(vec!["ext".to_string()]);
    assert_eq!(list.as_string_list(), Some(&["ext".to_string()][..]));
    assert_eq!(OptionValue::Bool(true).as_string_list(), None);
}
