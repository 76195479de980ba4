//! Thin tag guards and accessors.
//!
//! Free functions over the interner for callers that want to ask a single
//! structural question without pattern-matching [`SchemaData`] themselves.

use std::sync::Arc;

use crate::intern::SchemaInterner;
use crate::types::{IntrinsicKind, LiteralValue, SchemaData, SchemaId};

fn data(interner: &SchemaInterner, id: SchemaId) -> Option<SchemaData> {
    interner.lookup(id).map(|s| s.data)
}

pub fn is_intrinsic(interner: &SchemaInterner, id: SchemaId, kind: IntrinsicKind) -> bool {
    matches!(data(interner, id), Some(SchemaData::Intrinsic(k)) if k == kind)
}

pub fn is_never(interner: &SchemaInterner, id: SchemaId) -> bool {
    is_intrinsic(interner, id, IntrinsicKind::Never)
}

pub fn is_union(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Union(_)))
}

pub fn is_intersect(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Intersect(_)))
}

pub fn is_array(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Array(_)))
}

pub fn is_tuple(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Tuple(_)))
}

pub fn is_object(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Object(_)))
}

pub fn is_cyclic(interner: &SchemaInterner, id: SchemaId) -> bool {
    matches!(data(interner, id), Some(SchemaData::Cyclic(_)))
}

/// Union members, or `None` if the schema is not a union.
pub fn union_members(interner: &SchemaInterner, id: SchemaId) -> Option<Arc<Vec<SchemaId>>> {
    match data(interner, id)? {
        SchemaData::Union(list) => Some(interner.schema_list(list)),
        _ => None,
    }
}

/// Intersection members, or `None` if the schema is not an intersection.
pub fn intersect_members(interner: &SchemaInterner, id: SchemaId) -> Option<Arc<Vec<SchemaId>>> {
    match data(interner, id)? {
        SchemaData::Intersect(list) => Some(interner.schema_list(list)),
        _ => None,
    }
}

/// Tuple element list, or `None` if the schema is not a tuple.
pub fn tuple_items(interner: &SchemaInterner, id: SchemaId) -> Option<Arc<Vec<SchemaId>>> {
    match data(interner, id)? {
        SchemaData::Tuple(list) => Some(interner.schema_list(list)),
        _ => None,
    }
}

/// Array item schema, or `None` if the schema is not an array.
pub fn array_item(interner: &SchemaInterner, id: SchemaId) -> Option<SchemaId> {
    match data(interner, id)? {
        SchemaData::Array(item) => Some(item),
        _ => None,
    }
}

/// Literal payload, or `None` if the schema is not a literal.
pub fn literal_value(interner: &SchemaInterner, id: SchemaId) -> Option<LiteralValue> {
    match data(interner, id)? {
        SchemaData::Literal(value) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/guards_tests.rs"]
mod guards_tests;
