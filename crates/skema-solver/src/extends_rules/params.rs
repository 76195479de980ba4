//! Parameter list rules for function and constructor signatures.
//!
//! Positional parameters compare pairwise. Arity is where the variance
//! shows: when the right signature runs out first, the leftover left
//! parameters must be optional (or absorbed by a right rest); when the
//! left runs out first, the surplus right parameters are only admitted by
//! a left rest. A right parameter marked optional demands an optional
//! left parameter at the same position.

use crate::extends::{ExtendsChecker, ExtendsResult, Inferred};
use crate::guards::array_item;
use crate::types::{SchemaData, SchemaError, SchemaId};

fn split_rest(checker: &ExtendsChecker<'_>, params: &[SchemaId]) -> (Vec<SchemaId>, Option<SchemaId>) {
    match params
        .last()
        .and_then(|&p| checker.interner.lookup(p))
        .map(|s| s.data)
    {
        Some(SchemaData::Rest(inner)) => (params[..params.len() - 1].to_vec(), Some(inner)),
        _ => (params.to_vec(), None),
    }
}

/// Element schema a rest parameter applies to each absorbed argument.
fn rest_element(checker: &ExtendsChecker<'_>, rest: SchemaId) -> SchemaId {
    array_item(checker.interner, rest).unwrap_or(rest)
}

/// Compare parameter lists, returning the threaded bindings on success
/// and `None` when the signatures are incompatible.
pub(crate) fn compare_parameters(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left: &[SchemaId],
    right: &[SchemaId],
) -> Result<Option<Inferred>, SchemaError> {
    let (left_fixed, left_rest) = split_rest(checker, left);
    let (right_fixed, right_rest) = split_rest(checker, right);
    let mut acc = env.clone();
    let positions = left_fixed.len().max(right_fixed.len());
    for i in 0..positions {
        match (left_fixed.get(i).copied(), right_fixed.get(i).copied()) {
            (Some(l), Some(r)) => {
                if checker.interner.is_optional(r) && !checker.interner.is_optional(l) {
                    return Ok(None);
                }
                let l_schema = checker.interner.strip_optional(l);
                let r_schema = checker.interner.strip_optional(r);
                match checker.extends(&acc, l_schema, r_schema)? {
                    ExtendsResult::False => return Ok(None),
                    result => {
                        if let Some(bindings) = result.into_inferred() {
                            acc = bindings;
                        }
                    }
                }
            }
            (Some(l), None) => match right_rest {
                Some(rest) => {
                    let l_schema = checker.interner.strip_optional(l);
                    match checker.extends(&acc, l_schema, rest_element(checker, rest))? {
                        ExtendsResult::False => return Ok(None),
                        result => {
                            if let Some(bindings) = result.into_inferred() {
                                acc = bindings;
                            }
                        }
                    }
                }
                None => {
                    if !checker.interner.is_optional(l) {
                        return Ok(None);
                    }
                }
            },
            (None, Some(r)) => match left_rest {
                Some(rest) => {
                    let r_schema = checker.interner.strip_optional(r);
                    match checker.extends(&acc, rest_element(checker, rest), r_schema)? {
                        ExtendsResult::False => return Ok(None),
                        result => {
                            if let Some(bindings) = result.into_inferred() {
                                acc = bindings;
                            }
                        }
                    }
                }
                None => return Ok(None),
            },
            (None, None) => unreachable!("loop bounded by the longer list"),
        }
    }
    if let (Some(lr), Some(rr)) = (left_rest, right_rest) {
        match checker.extends(&acc, rest_element(checker, lr), rest_element(checker, rr))? {
            ExtendsResult::False => return Ok(None),
            result => {
                if let Some(bindings) = result.into_inferred() {
                    acc = bindings;
                }
            }
        }
    }
    Ok(Some(acc))
}
