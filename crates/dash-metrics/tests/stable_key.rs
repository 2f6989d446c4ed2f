use dash_metrics::format::stable_key::{
    BIGINT_SENTINEL, CIRCULAR_SENTINEL, FUNCTION_SENTINEL, NAN_SENTINEL, UNDEFINED_SENTINEL,
};
use dash_metrics::format::{stable_stringify, OptionValue};
use proptest::prelude::*;

#[test]
fn key_order_does_not_matter() {
    let first = OptionValue::object([
        ("style", OptionValue::from("currency")),
        ("currency", OptionValue::from("PLN")),
        ("maximumFractionDigits", OptionValue::from(0.0)),
    ]);
    let second = OptionValue::object([
        ("maximumFractionDigits", OptionValue::from(0.0)),
        ("currency", OptionValue::from("PLN")),
        ("style", OptionValue::from("currency")),
    ]);
    assert_eq!(stable_stringify(&first), stable_stringify(&second));
    assert_eq!(
        stable_stringify(&first),
        r#"{"currency":"PLN","maximumFractionDigits":0,"style":"currency"}"#
    );
}

#[test]
fn nested_objects_are_sorted_and_arrays_keep_order() {
    let value = OptionValue::object([
        (
            "z",
            OptionValue::Array(vec![OptionValue::from(2.0), OptionValue::from(1.0)]),
        ),
        (
            "a",
            OptionValue::object([
                ("y", OptionValue::from(true)),
                ("x", OptionValue::Null),
            ]),
        ),
    ]);
    assert_eq!(
        stable_stringify(&value),
        r#"{"a":{"x":null,"y":true},"z":[2,1]}"#
    );
}

#[test]
fn non_json_values_use_sentinels() {
    let value = OptionValue::object([
        ("undef", OptionValue::Undefined),
        ("callback", OptionValue::Function),
        ("big", OptionValue::BigInt(12_345_678_901_234_567_890)),
        ("sym", OptionValue::Symbol(Some("token".to_string()))),
        ("nan", OptionValue::from(f64::NAN)),
    ]);
    let key = stable_stringify(&value);
    assert!(key.contains(&format!("\"big\":{BIGINT_SENTINEL}:12345678901234567890")), "{key}");
    assert!(key.contains(&format!("\"callback\":{FUNCTION_SENTINEL}")), "{key}");
    assert!(key.contains(&format!("\"undef\":{UNDEFINED_SENTINEL}")), "{key}");
    assert!(key.contains(&format!("\"nan\":{NAN_SENTINEL}")), "{key}");
    assert!(key.contains("\"sym\":__symbol__:\"token\""), "{key}");
}

#[test]
fn undefined_and_null_are_distinct() {
    let undefined = OptionValue::object([("a", OptionValue::Undefined)]);
    let null = OptionValue::object([("a", OptionValue::Null)]);
    let missing = OptionValue::object(Vec::<(&str, OptionValue)>::new());
    assert_ne!(stable_stringify(&undefined), stable_stringify(&null));
    assert_ne!(stable_stringify(&undefined), stable_stringify(&missing));
}

#[test]
fn sentinel_text_in_a_string_does_not_collide() {
    for (sentinel, literal) in [
        (OptionValue::Undefined, UNDEFINED_SENTINEL),
        (OptionValue::Function, FUNCTION_SENTINEL),
        (OptionValue::from(f64::NAN), NAN_SENTINEL),
    ] {
        assert_ne!(
            stable_stringify(&sentinel),
            stable_stringify(&OptionValue::string(literal))
        );
    }
    assert_ne!(
        stable_stringify(&OptionValue::BigInt(7)),
        stable_stringify(&OptionValue::string(format!("{BIGINT_SENTINEL}:7")))
    );
}

#[test]
fn self_reference_is_marked_circular() {
    let value = OptionValue::object([("a", OptionValue::from(1.0))]);
    value.set("self", value.clone());
    assert_eq!(
        stable_stringify(&value),
        format!(r#"{{"a":1,"self":{CIRCULAR_SENTINEL}}}"#)
    );
}

#[test]
fn indirect_cycle_terminates() {
    let parent = OptionValue::object([("name", OptionValue::from("parent"))]);
    let child = OptionValue::object([("parent", parent.clone())]);
    parent.set("child", child);
    let key = stable_stringify(&parent);
    assert_eq!(
        key,
        format!(r#"{{"child":{{"parent":{CIRCULAR_SENTINEL}}},"name":"parent"}}"#)
    );
}

#[test]
fn shared_sibling_objects_are_not_circular() {
    let shared = OptionValue::object([("x", OptionValue::from(1.0))]);
    let value = OptionValue::object([("left", shared.clone()), ("right", shared)]);
    assert_eq!(
        stable_stringify(&value),
        r#"{"left":{"x":1},"right":{"x":1}}"#
    );
}

#[test]
fn negative_zero_matches_zero() {
    assert_eq!(
        stable_stringify(&OptionValue::from(-0.0)),
        stable_stringify(&OptionValue::from(0.0))
    );
}

#[test]
fn json_projection_drops_non_json_values() {
    let value = OptionValue::object([
        ("style", OptionValue::from("percent")),
        ("format", OptionValue::Function),
        ("missing", OptionValue::Undefined),
        ("digits", OptionValue::from(1.0)),
    ]);
    let json = value.to_json().expect("object projects to json");
    assert_eq!(
        json,
        serde_json::json!({ "style": "percent", "digits": 1 })
    );
}

proptest! {
    #[test]
    fn insertion_order_never_changes_the_key(
        entries in proptest::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..8)
    ) {
        let forward = OptionValue::object(
            entries.iter().map(|(k, v)| (k.clone(), OptionValue::from(f64::from(*v)))),
        );
        let reversed = OptionValue::object(
            entries.iter().rev().map(|(k, v)| (k.clone(), OptionValue::from(f64::from(*v)))),
        );
        prop_assert_eq!(stable_stringify(&forward), stable_stringify(&reversed));
    }
}
