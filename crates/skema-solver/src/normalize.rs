//! Cyclic schema normalization.
//!
//! A `Cyclic` schema is a flat name-keyed group of definitions plus a root
//! reference; self-reference is purely by name. Before comparison the
//! group is rewritten into a finite approximation: the root definition is
//! expanded once, with every re-entry into a definition already being
//! expanded replaced by `Any`. The comparator then never sees a `Ref` from
//! a well-formed group, and recursion over the result terminates because
//! the result is a finite tree.
//!
//! A reference to a name missing from its group is a construction bug in
//! the surrounding system and surfaces as [`SchemaError::MissingDefinition`],
//! never as a negative comparison verdict.

use rustc_hash::FxHashSet;
use skema_common::interner::Atom;
use tracing::trace;

use crate::intern::SchemaInterner;
use crate::types::{CyclicShape, Property, Schema, SchemaData, SchemaError, SchemaId};

/// Resolve a named definition inside a cyclic group.
pub fn resolve_ref(
    interner: &SchemaInterner,
    shape: &CyclicShape,
    name: Atom,
) -> Result<SchemaId, SchemaError> {
    shape
        .definition(name)
        .ok_or_else(|| SchemaError::MissingDefinition {
            name: interner.resolve_atom(name).to_string(),
        })
}

/// Rewrite a `Cyclic` schema into its finite approximation; all other
/// schemas pass through unchanged.
pub fn normalize(interner: &SchemaInterner, schema: SchemaId) -> Result<SchemaId, SchemaError> {
    let Some(node) = interner.lookup(schema) else {
        return Ok(schema);
    };
    let SchemaData::Cyclic(shape_id) = node.data else {
        return Ok(schema);
    };
    let shape = interner.cyclic_shape(shape_id);
    let root_def = resolve_ref(interner, &shape, shape.root)?;
    trace!(
        root = interner.resolve_atom(shape.root).as_ref(),
        defs = shape.defs.len(),
        "normalize: expanding cyclic group"
    );
    let mut expanding = FxHashSet::default();
    expanding.insert(shape.root);
    let expanded = expand(interner, &shape, root_def, &mut expanding)?;
    Ok(interner.with_modifiers(expanded, node.modifiers))
}

/// Expand one definition, substituting refs. A ref whose definition is
/// already on the expansion path becomes `Any`; every definition expands
/// at most once per path.
fn expand(
    interner: &SchemaInterner,
    shape: &CyclicShape,
    id: SchemaId,
    expanding: &mut FxHashSet<Atom>,
) -> Result<SchemaId, SchemaError> {
    let Some(node) = interner.lookup(id) else {
        return Ok(id);
    };
    let rebuilt = match node.data {
        SchemaData::Ref(name) => {
            let def = resolve_ref(interner, shape, name)?;
            if !expanding.insert(name) {
                // Recursion point: terminate with the unconstrained schema.
                return Ok(interner.with_modifiers(SchemaId::ANY, node.modifiers));
            }
            let expanded = expand(interner, shape, def, expanding)?;
            expanding.remove(&name);
            return Ok(interner.with_modifiers(expanded, node.modifiers));
        }
        // A nested group is self-contained; normalize it independently.
        SchemaData::Cyclic(_) => return normalize(interner, id),
        SchemaData::Array(item) => {
            SchemaData::Array(expand(interner, shape, item, expanding)?)
        }
        SchemaData::Iterator(item) => {
            SchemaData::Iterator(expand(interner, shape, item, expanding)?)
        }
        SchemaData::AsyncIterator(item) => {
            SchemaData::AsyncIterator(expand(interner, shape, item, expanding)?)
        }
        SchemaData::Promise(item) => {
            SchemaData::Promise(expand(interner, shape, item, expanding)?)
        }
        SchemaData::Rest(inner) => SchemaData::Rest(expand(interner, shape, inner, expanding)?),
        SchemaData::Record(pattern, value) => {
            SchemaData::Record(pattern, expand(interner, shape, value, expanding)?)
        }
        SchemaData::Infer(name, constraint) => {
            SchemaData::Infer(name, expand(interner, shape, constraint, expanding)?)
        }
        SchemaData::Tuple(list) => {
            let items = expand_list(interner, shape, list, expanding)?;
            return Ok(interner.with_modifiers(interner.tuple(items), node.modifiers));
        }
        SchemaData::Union(list) => {
            let members = expand_list(interner, shape, list, expanding)?;
            return Ok(interner.with_modifiers(interner.union(members), node.modifiers));
        }
        SchemaData::Intersect(list) => {
            let members = expand_list(interner, shape, list, expanding)?;
            return Ok(interner.with_modifiers(interner.intersect(members), node.modifiers));
        }
        SchemaData::Enum(list) => {
            let members = expand_list(interner, shape, list, expanding)?;
            return Ok(interner.with_modifiers(interner.enum_of(members), node.modifiers));
        }
        SchemaData::Object(shape_id) => {
            let object = interner.object_shape(shape_id);
            let mut properties = Vec::with_capacity(object.properties.len());
            for prop in &object.properties {
                properties.push(Property {
                    name: prop.name,
                    schema: expand(interner, shape, prop.schema, expanding)?,
                });
            }
            return Ok(interner.with_modifiers(
                interner.object_from_properties(properties),
                node.modifiers,
            ));
        }
        SchemaData::Function(sig_id) => {
            let sig = interner.signature(sig_id);
            let mut params = Vec::with_capacity(sig.params.len());
            for &param in &sig.params {
                params.push(expand(interner, shape, param, expanding)?);
            }
            let output = expand(interner, shape, sig.output, expanding)?;
            return Ok(interner.with_modifiers(interner.function(params, output), node.modifiers));
        }
        SchemaData::Constructor(sig_id) => {
            let sig = interner.signature(sig_id);
            let mut params = Vec::with_capacity(sig.params.len());
            for &param in &sig.params {
                params.push(expand(interner, shape, param, expanding)?);
            }
            let output = expand(interner, shape, sig.output, expanding)?;
            return Ok(
                interner.with_modifiers(interner.constructor(params, output), node.modifiers)
            );
        }
        SchemaData::Intrinsic(_) | SchemaData::Literal(_) | SchemaData::TemplateLiteral(_) => {
            return Ok(id);
        }
    };
    Ok(interner.intern(Schema {
        data: rebuilt,
        modifiers: node.modifiers,
    }))
}

fn expand_list(
    interner: &SchemaInterner,
    shape: &CyclicShape,
    list: crate::types::SchemaListId,
    expanding: &mut FxHashSet<Atom>,
) -> Result<Vec<SchemaId>, SchemaError> {
    let members = interner.schema_list(list);
    let mut out = Vec::with_capacity(members.len());
    for &member in members.iter() {
        out.push(expand(interner, shape, member, expanding)?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod normalize_tests;
