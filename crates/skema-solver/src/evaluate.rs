//! Intersection evaluation.
//!
//! `evaluate_intersect` reduces an intersection of schemas to one
//! canonical schema before comparison: nested intersections flatten,
//! `Never` short-circuits, `Any`/`Unknown` drop out, object property maps
//! merge (same-key values intersect recursively), literals collapse
//! against their scalar supertype, and contained unions distribute. An
//! intersection the evaluator cannot reduce is returned unchanged; the
//! comparator has a sound fallback for that case.

use indexmap::IndexMap;
use skema_common::interner::Atom;
use skema_common::limits::MAX_INTERSECT_DISTRIBUTION;
use tracing::trace;

use crate::intern::SchemaInterner;
use crate::types::{
    IntrinsicKind, LiteralValue, Modifiers, Property, SchemaData, SchemaError, SchemaId,
};

/// Evaluate an intersection of members into a canonical schema.
pub fn evaluate_intersect(
    interner: &SchemaInterner,
    members: &[SchemaId],
) -> Result<SchemaId, SchemaError> {
    let mut flat = Vec::with_capacity(members.len());
    if !flatten(interner, members, &mut flat) {
        return Ok(SchemaId::NEVER);
    }
    match flat.len() {
        0 => return Ok(SchemaId::UNKNOWN),
        1 => return Ok(flat[0]),
        _ => {}
    }

    // Distribute over a contained union: (A | B) & X => (A & X) | (B & X).
    if let Some(union_idx) = flat.iter().position(|&m| {
        matches!(
            interner.lookup(m).map(|s| s.data),
            Some(SchemaData::Union(_))
        )
    }) {
        let Some(SchemaData::Union(list)) = interner.lookup(flat[union_idx]).map(|s| s.data)
        else {
            unreachable!("position() found a union member");
        };
        let variants = interner.schema_list(list);
        if variants.len() > MAX_INTERSECT_DISTRIBUTION {
            return Ok(interner.intersect(flat));
        }
        trace!(
            variants = variants.len(),
            "evaluate_intersect: distributing over union"
        );
        let mut results = Vec::with_capacity(variants.len());
        for &variant in variants.iter() {
            let mut branch = flat.clone();
            branch[union_idx] = variant;
            results.push(evaluate_intersect(interner, &branch)?);
        }
        return Ok(interner.union(results));
    }

    let mut acc = flat[0];
    for &member in &flat[1..] {
        match merge_pair(interner, acc, member)? {
            Some(merged) => acc = merged,
            // Irreducible pair: hand the flattened intersection back.
            None => return Ok(interner.intersect(flat)),
        }
        if acc == SchemaId::NEVER {
            return Ok(SchemaId::NEVER);
        }
    }
    Ok(acc)
}

/// Flatten nested intersections, dropping top schemas. Returns `false`
/// if a `Never` member makes the whole intersection empty.
fn flatten(interner: &SchemaInterner, members: &[SchemaId], out: &mut Vec<SchemaId>) -> bool {
    for &member in members {
        match interner.lookup(member).map(|s| s.data) {
            Some(SchemaData::Intersect(list)) => {
                let inner = interner.schema_list(list);
                if !flatten(interner, &inner, out) {
                    return false;
                }
            }
            Some(SchemaData::Intrinsic(IntrinsicKind::Any | IntrinsicKind::Unknown)) => {}
            Some(SchemaData::Intrinsic(IntrinsicKind::Never)) => return false,
            _ => out.push(member),
        }
    }
    true
}

pub(crate) fn literal_fits_intrinsic(value: LiteralValue, kind: IntrinsicKind) -> bool {
    match value {
        LiteralValue::String(_) => kind == IntrinsicKind::String,
        LiteralValue::Number(n) => {
            kind == IntrinsicKind::Number
                || (kind == IntrinsicKind::Integer && n.0.fract() == 0.0)
        }
        LiteralValue::Boolean(_) => kind == IntrinsicKind::Boolean,
        LiteralValue::BigInt(_) => kind == IntrinsicKind::BigInt,
    }
}

/// Merge two non-union members, or `None` when the pair is irreducible.
fn merge_pair(
    interner: &SchemaInterner,
    a: SchemaId,
    b: SchemaId,
) -> Result<Option<SchemaId>, SchemaError> {
    if a == b {
        return Ok(Some(a));
    }
    let (Some(left), Some(right)) = (interner.lookup(a), interner.lookup(b)) else {
        return Ok(None);
    };
    let merged = match (left.data, right.data) {
        (SchemaData::Literal(va), SchemaData::Literal(vb)) => {
            if va == vb {
                a
            } else {
                SchemaId::NEVER
            }
        }
        (SchemaData::Literal(value), SchemaData::Intrinsic(kind)) => {
            if literal_fits_intrinsic(value, kind) {
                a
            } else {
                SchemaId::NEVER
            }
        }
        (SchemaData::Intrinsic(kind), SchemaData::Literal(value)) => {
            if literal_fits_intrinsic(value, kind) {
                b
            } else {
                SchemaId::NEVER
            }
        }
        (SchemaData::Intrinsic(ka), SchemaData::Intrinsic(kb)) => match (ka, kb) {
            _ if ka == kb => a,
            (IntrinsicKind::Integer, IntrinsicKind::Number) => a,
            (IntrinsicKind::Number, IntrinsicKind::Integer) => b,
            _ => SchemaId::NEVER,
        },
        (SchemaData::Object(sa), SchemaData::Object(sb)) => {
            let shape_a = interner.object_shape(sa);
            let shape_b = interner.object_shape(sb);
            let mut merged: IndexMap<Atom, SchemaId> = IndexMap::new();
            for prop in &shape_a.properties {
                merged.insert(prop.name, prop.schema);
            }
            for prop in &shape_b.properties {
                match merged.get(&prop.name).copied() {
                    Some(existing) => {
                        let value = merge_property(interner, existing, prop.schema)?;
                        merged.insert(prop.name, value);
                    }
                    None => {
                        merged.insert(prop.name, prop.schema);
                    }
                }
            }
            let properties = merged
                .into_iter()
                .map(|(name, schema)| Property { name, schema })
                .collect();
            interner.object_from_properties(properties)
        }
        (SchemaData::Array(ia), SchemaData::Array(ib)) => {
            let item = evaluate_intersect(interner, &[ia, ib])?;
            let array = interner.array(item);
            if left.modifiers.contains(Modifiers::IMMUTABLE)
                || right.modifiers.contains(Modifiers::IMMUTABLE)
            {
                interner.immutable(array)
            } else {
                array
            }
        }
        (SchemaData::Tuple(la), SchemaData::Tuple(lb)) => {
            let items_a = interner.schema_list(la);
            let items_b = interner.schema_list(lb);
            if items_a.len() != items_b.len() {
                SchemaId::NEVER
            } else {
                let mut items = Vec::with_capacity(items_a.len());
                for (&ea, &eb) in items_a.iter().zip(items_b.iter()) {
                    items.push(evaluate_intersect(interner, &[ea, eb])?);
                }
                interner.tuple(items)
            }
        }
        // Object-like against scalar never overlaps.
        (SchemaData::Object(_) | SchemaData::Tuple(_) | SchemaData::Array(_), SchemaData::Intrinsic(_) | SchemaData::Literal(_)) => SchemaId::NEVER,
        (SchemaData::Intrinsic(_) | SchemaData::Literal(_), SchemaData::Object(_) | SchemaData::Tuple(_) | SchemaData::Array(_)) => SchemaId::NEVER,
        _ => return Ok(None),
    };
    Ok(Some(merged))
}

/// Intersect two property schemas, preserving `Optional` only when both
/// carriers are optional (an intersection with a required member is
/// required).
fn merge_property(
    interner: &SchemaInterner,
    a: SchemaId,
    b: SchemaId,
) -> Result<SchemaId, SchemaError> {
    let both_optional = interner.is_optional(a) && interner.is_optional(b);
    let value = evaluate_intersect(
        interner,
        &[interner.strip_optional(a), interner.strip_optional(b)],
    )?;
    if both_optional {
        Ok(interner.optional(value))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
#[path = "tests/evaluate_tests.rs"]
mod evaluate_tests;
