//! Object and record rules.
//!
//! Objects compare by width subtyping: every property the right side
//! names must be satisfied by the left, extra left properties are free.
//! Optionality is asymmetric: an optional left property never satisfies a
//! required right property, while a required left property satisfies an
//! optional right one.

use crate::extends::{ExtendsChecker, ExtendsResult, Inferred};
use crate::template_literal::{key_pattern_subsumes, pattern_allows_key};
use crate::types::{ObjectShapeId, SchemaData, SchemaError, SchemaId};
use skema_common::interner::Atom;

pub(crate) fn object_extends_object(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left: ObjectShapeId,
    right: ObjectShapeId,
) -> Result<ExtendsResult, SchemaError> {
    let left_shape = checker.interner.object_shape(left);
    let right_shape = checker.interner.object_shape(right);
    let mut acc = env.clone();
    for required in &right_shape.properties {
        let r_optional = checker.interner.is_optional(required.schema);
        let r_schema = checker.interner.strip_optional(required.schema);
        match left_shape.property(required.name) {
            Some(present) => {
                let l_optional = checker.interner.is_optional(present.schema);
                if l_optional && !r_optional {
                    return Ok(ExtendsResult::False);
                }
                let l_schema = checker.interner.strip_optional(present.schema);
                match checker.extends(&acc, l_schema, r_schema)? {
                    ExtendsResult::False => return Ok(ExtendsResult::False),
                    result => {
                        if let Some(bindings) = result.into_inferred() {
                            acc = bindings;
                        }
                    }
                }
            }
            None => {
                if !r_optional {
                    return Ok(ExtendsResult::False);
                }
                // An absent key still resolves an optional placeholder,
                // to its upper bound.
                if let Some(SchemaData::Infer(name, constraint)) =
                    checker.interner.lookup(r_schema).map(|s| s.data)
                {
                    acc.insert(name, constraint);
                }
            }
        }
    }
    Ok(ExtendsResult::True(acc))
}

/// Every left property whose name the key pattern admits must carry a
/// value fitting the record value schema.
pub(crate) fn object_extends_record(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left: ObjectShapeId,
    pattern: Atom,
    value: SchemaId,
) -> Result<ExtendsResult, SchemaError> {
    let shape = checker.interner.object_shape(left);
    let mut acc = env.clone();
    for prop in &shape.properties {
        let name = checker.interner.resolve_atom(prop.name);
        if !pattern_allows_key(checker.interner, pattern, name.as_ref())? {
            continue;
        }
        let schema = checker.interner.strip_optional(prop.schema);
        match checker.extends(&acc, schema, value)? {
            ExtendsResult::False => return Ok(ExtendsResult::False),
            result => {
                if let Some(bindings) = result.into_inferred() {
                    acc = bindings;
                }
            }
        }
    }
    Ok(ExtendsResult::True(acc))
}

/// Records compare covariantly in both positions: the left key language
/// must be contained in the right one, and the left value must fit the
/// right value.
pub(crate) fn record_extends_record(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left_pattern: Atom,
    left_value: SchemaId,
    right_pattern: Atom,
    right_value: SchemaId,
) -> Result<ExtendsResult, SchemaError> {
    if !key_pattern_subsumes(checker.interner, left_pattern, right_pattern)? {
        return Ok(ExtendsResult::False);
    }
    Ok(checker.extends(env, left_value, right_value)?.demote())
}

/// A record guarantees no particular key, so it only satisfies an object
/// whose properties are all optional; those the key pattern admits must
/// additionally accept the record value.
pub(crate) fn record_extends_object(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    pattern: Atom,
    value: SchemaId,
    right: ObjectShapeId,
) -> Result<ExtendsResult, SchemaError> {
    let shape = checker.interner.object_shape(right);
    let mut acc = env.clone();
    for prop in &shape.properties {
        if !checker.interner.is_optional(prop.schema) {
            return Ok(ExtendsResult::False);
        }
        let name = checker.interner.resolve_atom(prop.name);
        if !pattern_allows_key(checker.interner, pattern, name.as_ref())? {
            continue;
        }
        let r_schema = checker.interner.strip_optional(prop.schema);
        match checker.extends(&acc, value, r_schema)? {
            ExtendsResult::False => return Ok(ExtendsResult::False),
            result => {
                if let Some(bindings) = result.into_inferred() {
                    acc = bindings;
                }
            }
        }
    }
    Ok(ExtendsResult::True(acc))
}
