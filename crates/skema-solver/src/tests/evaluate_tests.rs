use super::*;

fn shape_of(interner: &SchemaInterner, object: SchemaId) -> std::sync::Arc<crate::types::ObjectShape> {
    let Some(SchemaData::Object(shape)) = interner.lookup(object).map(|s| s.data) else {
        panic!("expected an object schema");
    };
    interner.object_shape(shape)
}

#[test]
fn test_never_short_circuits() {
    let interner = SchemaInterner::new();

    let result = evaluate_intersect(&interner, &[SchemaId::STRING, SchemaId::NEVER]).unwrap();
    assert_eq!(result, SchemaId::NEVER);
}

#[test]
fn test_top_schemas_drop_out() {
    let interner = SchemaInterner::new();

    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::ANY, SchemaId::STRING]).unwrap(),
        SchemaId::STRING
    );
    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::UNKNOWN, SchemaId::NUMBER]).unwrap(),
        SchemaId::NUMBER
    );
    // Nothing left: the identity of intersection.
    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::ANY, SchemaId::UNKNOWN]).unwrap(),
        SchemaId::UNKNOWN
    );
}

#[test]
fn test_nested_intersections_flatten() {
    let interner = SchemaInterner::new();

    let inner = interner.intersect(vec![SchemaId::NUMBER, SchemaId::INTEGER]);
    let result = evaluate_intersect(&interner, &[inner, SchemaId::NUMBER]).unwrap();
    assert_eq!(result, SchemaId::INTEGER);
}

#[test]
fn test_literal_against_scalar() {
    let interner = SchemaInterner::new();

    let hello = interner.literal_string("hello");
    assert_eq!(
        evaluate_intersect(&interner, &[hello, SchemaId::STRING]).unwrap(),
        hello
    );
    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::STRING, hello]).unwrap(),
        hello
    );
    assert_eq!(
        evaluate_intersect(&interner, &[hello, SchemaId::NUMBER]).unwrap(),
        SchemaId::NEVER
    );
    // Integral number literals survive an Integer bound, fractional do not.
    let one = interner.literal_number(1.0);
    let half = interner.literal_number(0.5);
    assert_eq!(
        evaluate_intersect(&interner, &[one, SchemaId::INTEGER]).unwrap(),
        one
    );
    assert_eq!(
        evaluate_intersect(&interner, &[half, SchemaId::INTEGER]).unwrap(),
        SchemaId::NEVER
    );
}

#[test]
fn test_disjoint_scalars_are_never() {
    let interner = SchemaInterner::new();

    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::STRING, SchemaId::NUMBER]).unwrap(),
        SchemaId::NEVER
    );
    assert_eq!(
        evaluate_intersect(&interner, &[SchemaId::NUMBER, SchemaId::INTEGER]).unwrap(),
        SchemaId::INTEGER
    );
}

#[test]
fn test_object_property_merge() {
    let interner = SchemaInterner::new();

    let a = interner.object(vec![("x", SchemaId::NUMBER)]);
    let b = interner.object(vec![("y", SchemaId::STRING)]);
    let merged = evaluate_intersect(&interner, &[a, b]).unwrap();
    assert_eq!(
        merged,
        interner.object(vec![("x", SchemaId::NUMBER), ("y", SchemaId::STRING)])
    );
}

#[test]
fn test_shared_key_values_intersect() {
    let interner = SchemaInterner::new();

    let one = interner.literal_number(1.0);
    let a = interner.object(vec![("x", SchemaId::NUMBER)]);
    let b = interner.object(vec![("x", one)]);
    let merged = evaluate_intersect(&interner, &[a, b]).unwrap();

    let shape = shape_of(&interner, merged);
    assert_eq!(shape.properties.len(), 1);
    assert_eq!(shape.properties[0].schema, one);
}

#[test]
fn test_optional_survives_only_when_both_optional() {
    let interner = SchemaInterner::new();

    let opt_num = interner.optional(SchemaId::NUMBER);
    let both = evaluate_intersect(
        &interner,
        &[
            interner.object(vec![("x", opt_num)]),
            interner.object(vec![("x", opt_num)]),
        ],
    )
    .unwrap();
    assert!(interner.is_optional(shape_of(&interner, both).properties[0].schema));

    let mixed = evaluate_intersect(
        &interner,
        &[
            interner.object(vec![("x", opt_num)]),
            interner.object(vec![("x", SchemaId::NUMBER)]),
        ],
    )
    .unwrap();
    assert_eq!(
        shape_of(&interner, mixed).properties[0].schema,
        SchemaId::NUMBER
    );
}

#[test]
fn test_union_distribution() {
    let interner = SchemaInterner::new();

    // (string | number) & string => string
    let union = interner.union2(SchemaId::STRING, SchemaId::NUMBER);
    let result = evaluate_intersect(&interner, &[union, SchemaId::STRING]).unwrap();
    assert_eq!(result, SchemaId::STRING);

    // ("a" | 1) & string => "a": the numeric branch evaporates.
    let lit_a = interner.literal_string("a");
    let lit_one = interner.literal_number(1.0);
    let mixed = interner.union2(lit_a, lit_one);
    let result = evaluate_intersect(&interner, &[mixed, SchemaId::STRING]).unwrap();
    assert_eq!(result, lit_a);

    // ({x} | number) & {x} distributes from the right member too.
    let obj = interner.object(vec![("x", SchemaId::NUMBER)]);
    let with_obj = interner.union2(obj, SchemaId::NUMBER);
    let result = evaluate_intersect(&interner, &[with_obj, obj]).unwrap();
    assert_eq!(result, obj);
}

#[test]
fn test_array_items_intersect() {
    let interner = SchemaInterner::new();

    let a = interner.array(SchemaId::NUMBER);
    let b = interner.array(SchemaId::INTEGER);
    assert_eq!(
        evaluate_intersect(&interner, &[a, b]).unwrap(),
        interner.array(SchemaId::INTEGER)
    );
    // Immutability on either side carries through.
    let frozen = interner.immutable(interner.array(SchemaId::NUMBER));
    assert_eq!(
        evaluate_intersect(&interner, &[frozen, b]).unwrap(),
        interner.immutable(interner.array(SchemaId::INTEGER))
    );
}

#[test]
fn test_tuples_intersect_pointwise() {
    let interner = SchemaInterner::new();

    let one = interner.literal_number(1.0);
    let a = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
    let b = interner.tuple(vec![one, SchemaId::STRING]);
    assert_eq!(
        evaluate_intersect(&interner, &[a, b]).unwrap(),
        interner.tuple(vec![one, SchemaId::STRING])
    );

    let short = interner.tuple(vec![SchemaId::NUMBER]);
    assert_eq!(
        evaluate_intersect(&interner, &[a, short]).unwrap(),
        SchemaId::NEVER
    );
}

#[test]
fn test_irreducible_pair_returns_unchanged() {
    let interner = SchemaInterner::new();

    let func = interner.function(vec![SchemaId::NUMBER], SchemaId::STRING);
    let obj = interner.object(vec![("x", SchemaId::NUMBER)]);
    let result = evaluate_intersect(&interner, &[func, obj]).unwrap();
    assert_eq!(result, interner.intersect(vec![func, obj]));
}

#[test]
fn test_object_against_scalar_is_never() {
    let interner = SchemaInterner::new();

    let obj = interner.object(vec![("x", SchemaId::NUMBER)]);
    assert_eq!(
        evaluate_intersect(&interner, &[obj, SchemaId::STRING]).unwrap(),
        SchemaId::NEVER
    );
}
