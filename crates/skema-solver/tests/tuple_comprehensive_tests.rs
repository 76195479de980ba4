//! Comprehensive tests for tuple matching:
//! - fixed-arity element comparison and optional elements
//! - rest elements at the tail and at the head
//! - rest capture into inference placeholders
//! - tuple against array

use super::*;

fn check(interner: &SchemaInterner, left: SchemaId, right: SchemaId) -> bool {
    structural_extends(interner, left, right)
        .unwrap()
        .is_truthy()
}

#[test]
fn test_fixed_arity_elementwise() {
    let interner = SchemaInterner::new();

    let left = interner.tuple(vec![SchemaId::INTEGER, SchemaId::STRING]);
    let right = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    assert!(check(&interner, left, right));
    assert!(!check(&interner, right, left));
}

#[test]
fn test_arity_mismatch_fails() {
    let interner = SchemaInterner::new();

    let pair = interner.tuple(vec![SchemaId::NUMBER, SchemaId::NUMBER]);
    let triple = interner.tuple(vec![SchemaId::NUMBER, SchemaId::NUMBER, SchemaId::NUMBER]);
    assert!(!check(&interner, pair, triple));
    assert!(!check(&interner, triple, pair));
}

#[test]
fn test_empty_tuple() {
    let interner = SchemaInterner::new();

    let empty = interner.tuple(vec![]);
    assert!(check(&interner, empty, empty));
    assert!(check(&interner, empty, interner.array(SchemaId::STRING)));
    assert!(!check(&interner, empty, interner.tuple(vec![SchemaId::NUMBER])));
}

#[test]
fn test_optional_elements() {
    let interner = SchemaInterner::new();

    // [number] extends [number, string?]: the optional slot may be absent.
    let left = interner.tuple(vec![SchemaId::NUMBER]);
    let pattern = interner.tuple(vec![SchemaId::NUMBER, interner.optional(SchemaId::STRING)]);
    assert!(check(&interner, left, pattern));

    // A present element must still fit the optional slot.
    let full = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    assert!(check(&interner, full, pattern));
    let wrong = interner.tuple(vec![SchemaId::NUMBER, SchemaId::BOOLEAN]);
    assert!(!check(&interner, wrong, pattern));

    // Optional on the operand never satisfies a required slot.
    let half_present = interner.tuple(vec![interner.optional(SchemaId::NUMBER)]);
    assert!(!check(&interner, half_present, left));
    assert!(check(&interner, left, interner.tuple(vec![interner.optional(SchemaId::NUMBER)])));
}

#[test]
fn test_optional_operand_elements_may_dangle() {
    let interner = SchemaInterner::new();

    // [number, string?] extends [number]: the trailing optional slot may
    // simply be absent. A required trailing element still fails.
    let pattern = interner.tuple(vec![SchemaId::NUMBER]);
    let dangling = interner.tuple(vec![SchemaId::NUMBER, interner.optional(SchemaId::STRING)]);
    let required = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    assert!(check(&interner, dangling, pattern));
    assert!(!check(&interner, required, pattern));
}

#[test]
fn test_trailing_rest_absorbs_remaining_elements() {
    let interner = SchemaInterner::new();

    // [number, string, string] extends [number, ...string[]]
    let pattern = interner.tuple(vec![
        SchemaId::NUMBER,
        interner.rest(interner.array(SchemaId::STRING)),
    ]);
    let good = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING, SchemaId::STRING]);
    assert!(check(&interner, good, pattern));

    // Zero absorbed elements is fine.
    let bare = interner.tuple(vec![SchemaId::NUMBER]);
    assert!(check(&interner, bare, pattern));

    // One ill-typed absorbed element fails.
    let bad = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING, SchemaId::NUMBER]);
    assert!(!check(&interner, bad, pattern));
}

#[test]
fn test_head_tail_capture() {
    let interner = SchemaInterner::new();

    // [number, string, boolean] extends [infer Head, ...infer Tail]
    let left = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING, SchemaId::BOOLEAN]);
    let pattern = interner.tuple(vec![
        interner.infer("Head"),
        interner.rest(interner.infer("Tail")),
    ]);

    let result = structural_extends(&interner, left, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("Head")], SchemaId::NUMBER);
    assert_eq!(
        bindings[&interner.atom("Tail")],
        interner.tuple(vec![SchemaId::STRING, SchemaId::BOOLEAN])
    );
}

#[test]
fn test_head_tail_requires_one_element() {
    let interner = SchemaInterner::new();

    let pattern = interner.tuple(vec![
        interner.infer("Head"),
        interner.rest(interner.infer("Tail")),
    ]);
    let empty = interner.tuple(vec![]);
    assert!(!check(&interner, empty, pattern));

    // A single element leaves an empty tail.
    let single = interner.tuple(vec![SchemaId::STRING]);
    let result = structural_extends(&interner, single, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("Tail")], interner.tuple(vec![]));
}

#[test]
fn test_leading_rest_matches_from_the_back() {
    let interner = SchemaInterner::new();

    // [string, string, number] extends [...string[], number]
    let pattern = interner.tuple(vec![
        interner.rest(interner.array(SchemaId::STRING)),
        SchemaId::NUMBER,
    ]);
    let good = interner.tuple(vec![SchemaId::STRING, SchemaId::STRING, SchemaId::NUMBER]);
    assert!(check(&interner, good, pattern));

    let just_last = interner.tuple(vec![SchemaId::NUMBER]);
    assert!(check(&interner, just_last, pattern));

    let wrong_last = interner.tuple(vec![SchemaId::STRING, SchemaId::STRING]);
    assert!(!check(&interner, wrong_last, pattern));
}

#[test]
fn test_leading_rest_capture_preserves_source_order() {
    let interner = SchemaInterner::new();

    // [number, string, boolean] extends [...infer Init, infer Last]
    let left = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING, SchemaId::BOOLEAN]);
    let pattern = interner.tuple(vec![
        interner.rest(interner.infer("Init")),
        interner.infer("Last"),
    ]);

    let result = structural_extends(&interner, left, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("Last")], SchemaId::BOOLEAN);
    assert_eq!(
        bindings[&interner.atom("Init")],
        interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING])
    );
}

#[test]
fn test_tuple_extends_array() {
    let interner = SchemaInterner::new();

    let numbers = interner.array(SchemaId::NUMBER);
    let good = interner.tuple(vec![SchemaId::INTEGER, SchemaId::NUMBER]);
    assert!(check(&interner, good, numbers));

    let mixed = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    assert!(!check(&interner, mixed, numbers));

    // A rest element contributes its own array schema.
    let variadic = interner.tuple(vec![
        SchemaId::INTEGER,
        interner.rest(interner.array(SchemaId::INTEGER)),
    ]);
    assert!(check(&interner, variadic, numbers));
}

#[test]
fn test_array_item_inference_from_tuple() {
    let interner = SchemaInterner::new();

    // [number, number] extends (infer E)[] binds the element schema.
    let left = interner.tuple(vec![SchemaId::NUMBER, SchemaId::NUMBER]);
    let pattern = interner.array(interner.infer("E"));
    let result = structural_extends(&interner, left, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("E")], SchemaId::NUMBER);

    // Heterogeneous elements capture as their union.
    let mixed = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    let result = structural_extends(&interner, mixed, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(
        bindings[&interner.atom("E")],
        interner.union2(SchemaId::NUMBER, SchemaId::STRING)
    );

    // An empty tuple captures the empty union.
    let empty = interner.tuple(vec![]);
    let result = structural_extends(&interner, empty, pattern).unwrap();
    let bindings = result.into_inferred().unwrap();
    assert_eq!(bindings[&interner.atom("E")], SchemaId::NEVER);
}

#[test]
fn test_array_does_not_extend_tuple() {
    let interner = SchemaInterner::new();

    let numbers = interner.array(SchemaId::NUMBER);
    let tuple = interner.tuple(vec![SchemaId::NUMBER]);
    assert!(!check(&interner, numbers, tuple));
}

#[test]
fn test_rest_must_terminate_the_pattern() {
    let interner = SchemaInterner::new();

    // A rest sandwiched between fixed elements never matches.
    let pattern = interner.tuple(vec![
        SchemaId::NUMBER,
        interner.rest(interner.array(SchemaId::STRING)),
        SchemaId::NUMBER,
    ]);
    let left = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING, SchemaId::NUMBER]);
    assert!(!check(&interner, left, pattern));
}
