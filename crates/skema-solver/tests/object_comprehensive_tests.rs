//! Comprehensive tests for object and record matching:
//! - width subtyping and per-property covariance
//! - optionality asymmetry
//! - inference through properties, including absent optional keys
//! - objects against records and record-to-record subsumption

use super::*;

fn check(interner: &SchemaInterner, left: SchemaId, right: SchemaId) -> bool {
    structural_extends(interner, left, right)
        .unwrap()
        .is_truthy()
}

#[test]
fn test_width_subtyping() {
    let interner = SchemaInterner::new();

    let wide = interner.object(vec![
        ("x", SchemaId::NUMBER),
        ("y", SchemaId::STRING),
        ("z", SchemaId::BOOLEAN),
    ]);
    let narrow = interner.object(vec![("x", SchemaId::NUMBER)]);
    assert!(check(&interner, wide, narrow));
    assert!(!check(&interner, narrow, wide));

    // Everything object-shaped extends the empty object.
    let empty = interner.object(vec![]);
    assert!(check(&interner, wide, empty));
    assert!(check(&interner, empty, empty));
}

#[test]
fn test_property_covariance() {
    let interner = SchemaInterner::new();

    let precise = interner.object(vec![("n", interner.literal_number(3.0))]);
    let loose = interner.object(vec![("n", SchemaId::NUMBER)]);
    assert!(check(&interner, precise, loose));
    assert!(!check(&interner, loose, precise));
}

#[test]
fn test_property_name_mismatch() {
    let interner = SchemaInterner::new();

    let a = interner.object(vec![("a", SchemaId::NUMBER)]);
    let b = interner.object(vec![("b", SchemaId::NUMBER)]);
    assert!(!check(&interner, a, b));
}

#[test]
fn test_optionality_asymmetry() {
    let interner = SchemaInterner::new();

    let required = interner.object(vec![("x", SchemaId::NUMBER)]);
    let optional = interner.object(vec![("x", interner.optional(SchemaId::NUMBER))]);

    // Required satisfies optional; optional never satisfies required.
    assert!(check(&interner, required, optional));
    assert!(!check(&interner, optional, required));
    assert!(check(&interner, optional, optional));

    // An absent key satisfies an optional requirement.
    let empty = interner.object(vec![]);
    assert!(check(&interner, empty, optional));
    assert!(!check(&interner, empty, required));
}

#[test]
fn test_readonly_does_not_affect_the_relation() {
    let interner = SchemaInterner::new();

    let frozen = interner.object(vec![("x", interner.readonly(SchemaId::NUMBER))]);
    let plain = interner.object(vec![("x", SchemaId::NUMBER)]);
    assert!(check(&interner, frozen, plain));
    assert!(check(&interner, plain, frozen));
}

#[test]
fn test_nested_objects() {
    let interner = SchemaInterner::new();

    let inner_wide = interner.object(vec![("a", SchemaId::INTEGER), ("b", SchemaId::STRING)]);
    let inner_narrow = interner.object(vec![("a", SchemaId::NUMBER)]);
    let left = interner.object(vec![("nested", inner_wide)]);
    let right = interner.object(vec![("nested", inner_narrow)]);
    assert!(check(&interner, left, right));
    assert!(!check(&interner, right, left));
}

#[test]
fn test_property_inference() {
    let interner = SchemaInterner::new();

    let left = interner.object(vec![("value", interner.array(SchemaId::STRING))]);
    let pattern = interner.object(vec![("value", interner.infer("V"))]);
    let result = structural_extends(&interner, left, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(
        bindings[&interner.atom("V")],
        interner.array(SchemaId::STRING)
    );
}

#[test]
fn test_absent_optional_placeholder_binds_its_bound() {
    let interner = SchemaInterner::new();

    // {} extends { x?: infer X extends string }: X resolves to its bound.
    let empty = interner.object(vec![]);
    let pattern = interner.object(vec![(
        "x",
        interner.optional(interner.infer_with("X", SchemaId::STRING)),
    )]);
    let result = structural_extends(&interner, empty, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("X")], SchemaId::STRING);

    // A present key binds the actual value instead.
    let present = interner.object(vec![("x", interner.literal_string("hi"))]);
    let result = structural_extends(&interner, present, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("X")], interner.literal_string("hi"));
}

#[test]
fn test_object_extends_record() {
    let interner = SchemaInterner::new();

    let strings = interner.record("^(.*)$", SchemaId::STRING);
    let good = interner.object(vec![("a", SchemaId::STRING), ("b", interner.literal_string("x"))]);
    let bad = interner.object(vec![("a", SchemaId::STRING), ("b", SchemaId::NUMBER)]);
    assert!(check(&interner, good, strings));
    assert!(!check(&interner, bad, strings));
}

#[test]
fn test_record_key_pattern_filters_properties() {
    let interner = SchemaInterner::new();

    // Only keys inside the pattern language are constrained.
    let toggles = interner.record("^(on|off)$", SchemaId::BOOLEAN);
    let good = interner.object(vec![
        ("on", SchemaId::BOOLEAN),
        ("label", SchemaId::STRING),
    ]);
    let bad = interner.object(vec![("off", SchemaId::STRING)]);
    assert!(check(&interner, good, toggles));
    assert!(!check(&interner, bad, toggles));
}

#[test]
fn test_numeric_record_keys() {
    let interner = SchemaInterner::new();

    let by_index = interner.record("^(0|[1-9][0-9]*)$", SchemaId::NUMBER);
    let good = interner.object(vec![("0", SchemaId::NUMBER), ("12", SchemaId::INTEGER)]);
    let bad = interner.object(vec![("3", SchemaId::STRING)]);
    // Non-canonical keys fall outside the pattern and go unconstrained.
    let padded = interner.object(vec![("007", SchemaId::STRING)]);
    assert!(check(&interner, good, by_index));
    assert!(!check(&interner, bad, by_index));
    assert!(check(&interner, padded, by_index));
}

#[test]
fn test_record_extends_record() {
    let interner = SchemaInterner::new();

    let toggles = interner.record("^(on|off)$", SchemaId::BOOLEAN);
    let wider_keys = interner.record("^(on|off|idle)$", SchemaId::BOOLEAN);
    let any_key = interner.record("^(.*)$", SchemaId::BOOLEAN);
    let wider_values = interner.record("^(on|off)$", interner.union2(SchemaId::BOOLEAN, SchemaId::NULL));

    assert!(check(&interner, toggles, toggles));
    assert!(check(&interner, toggles, wider_keys));
    assert!(!check(&interner, wider_keys, toggles));
    assert!(check(&interner, toggles, any_key));
    assert!(check(&interner, toggles, wider_values));
    assert!(!check(&interner, wider_values, toggles));
}

#[test]
fn test_record_extends_object_with_optional_properties() {
    let interner = SchemaInterner::new();

    let numbers = interner.record("^(.*)$", SchemaId::NUMBER);
    let optional_target = interner.object(vec![("x", interner.optional(SchemaId::NUMBER))]);
    let required_target = interner.object(vec![("x", SchemaId::NUMBER)]);

    assert!(check(&interner, numbers, optional_target));
    assert!(!check(&interner, numbers, required_target));
}

#[test]
fn test_record_value_inference() {
    let interner = SchemaInterner::new();

    // Record<string, number[]> extends Record<string, (infer T)[]>
    let left = interner.record("^(.*)$", interner.array(SchemaId::NUMBER));
    let pattern = interner.record("^(.*)$", interner.array(interner.infer("T")));
    let result = structural_extends(&interner, left, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("T")], SchemaId::NUMBER);
}

#[test]
fn test_object_does_not_extend_scalars() {
    let interner = SchemaInterner::new();

    let obj = interner.object(vec![("x", SchemaId::NUMBER)]);
    assert!(!check(&interner, obj, SchemaId::STRING));
    assert!(!check(&interner, SchemaId::STRING, obj));
}
