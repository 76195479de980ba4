//! Tuple element rules.
//!
//! A tuple pattern may end in a `Rest` element, which soaks up the
//! remaining elements of the operand. A pattern that instead *starts*
//! with its rest element is handled by the same walker over the reversed
//! element lists; captured remainders are un-reversed before binding so
//! the caller always sees source order.

use smallvec::SmallVec;

use crate::extends::{ExtendsChecker, ExtendsResult, Inferred};
use crate::types::{SchemaData, SchemaError, SchemaId};

fn rest_inner(checker: &ExtendsChecker<'_>, id: SchemaId) -> Option<SchemaId> {
    match checker.interner.lookup(id).map(|s| s.data) {
        Some(SchemaData::Rest(inner)) => Some(inner),
        _ => None,
    }
}

pub(crate) fn tuple_extends_tuple(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left: &[SchemaId],
    right: &[SchemaId],
) -> Result<ExtendsResult, SchemaError> {
    let leading_rest = |items: &[SchemaId]| {
        items.len() > 1
            && rest_inner(checker, items[0]).is_some()
            && rest_inner(checker, items[items.len() - 1]).is_none()
    };
    if leading_rest(right) || leading_rest(left) {
        let rev_left: SmallVec<[SchemaId; 8]> = left.iter().rev().copied().collect();
        let rev_right: SmallVec<[SchemaId; 8]> = right.iter().rev().copied().collect();
        return match_elements(checker, env, &rev_left, &rev_right, true);
    }
    match_elements(checker, env, left, right, false)
}

/// Element walker. Rests are only legal as the final pattern element
/// (possibly because the lists were reversed).
fn match_elements(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    left: &[SchemaId],
    right: &[SchemaId],
    reversed: bool,
) -> Result<ExtendsResult, SchemaError> {
    let mut acc = env.clone();
    let mut consumed = 0usize;
    for (idx, &pattern) in right.iter().enumerate() {
        if let Some(inner) = rest_inner(checker, pattern) {
            if idx != right.len() - 1 {
                return Ok(ExtendsResult::False);
            }
            let mut remaining: SmallVec<[SchemaId; 8]> =
                left[consumed..].iter().copied().collect();
            if reversed {
                remaining.reverse();
            }
            let captured = checker.interner.tuple(remaining.to_vec());
            return match checker.extends(&acc, captured, inner)? {
                ExtendsResult::False => Ok(ExtendsResult::False),
                result => Ok(ExtendsResult::True(result.into_inferred().unwrap_or(acc))),
            };
        }
        let Some(&operand) = left.get(consumed) else {
            // Operand exhausted: only optional pattern elements may remain.
            if checker.interner.is_optional(pattern) {
                continue;
            }
            return Ok(ExtendsResult::False);
        };
        consumed += 1;
        if checker.interner.is_optional(operand) && !checker.interner.is_optional(pattern) {
            return Ok(ExtendsResult::False);
        }
        let l_schema = checker.interner.strip_optional(operand);
        let r_schema = checker.interner.strip_optional(pattern);
        match checker.extends(&acc, l_schema, r_schema)? {
            ExtendsResult::False => return Ok(ExtendsResult::False),
            result => {
                if let Some(bindings) = result.into_inferred() {
                    acc = bindings;
                }
            }
        }
    }
    // Leftover operand elements are only tolerable when optional.
    if left[consumed..]
        .iter()
        .any(|&l| !checker.interner.is_optional(l))
    {
        return Ok(ExtendsResult::False);
    }
    Ok(ExtendsResult::True(acc))
}

/// A tuple fits an array when every element fits the array item; a rest
/// element contributes its own (array-shaped) inner schema. A placeholder
/// item captures the union of the element schemas in one binding.
pub(crate) fn tuple_extends_array(
    checker: &mut ExtendsChecker<'_>,
    env: &Inferred,
    items: &[SchemaId],
    right_item: SchemaId,
) -> Result<ExtendsResult, SchemaError> {
    if let Some(SchemaData::Infer(name, constraint)) =
        checker.interner.lookup(right_item).map(|s| s.data)
    {
        let elements: Vec<SchemaId> = items
            .iter()
            .map(|&element| match rest_inner(checker, element) {
                Some(inner) => crate::guards::array_item(checker.interner, inner).unwrap_or(inner),
                None => checker.interner.strip_optional(element),
            })
            .collect();
        let captured = checker.interner.union(elements);
        return match checker.extends(env, captured, constraint)? {
            ExtendsResult::False => Ok(ExtendsResult::False),
            result => {
                let mut bindings = result.into_inferred().unwrap_or_else(|| env.clone());
                bindings.insert(name, captured);
                Ok(ExtendsResult::True(bindings))
            }
        };
    }
    let mut acc = env.clone();
    for &element in items {
        let result = match rest_inner(checker, element) {
            Some(inner) => checker.extends(&acc, inner, checker.interner.array(right_item))?,
            None => {
                let schema = checker.interner.strip_optional(element);
                checker.extends(&acc, schema, right_item)?
            }
        };
        match result {
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
