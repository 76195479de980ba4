//! Schema interning.
//!
//! The interner deduplicates every constructed schema node and hands out
//! dense [`SchemaId`] handles. Composite payloads (member lists, object
//! shapes, signatures, cyclic definition groups) are interned into side
//! tables behind their own ids, so equal schemas always share one id and
//! structural equality is a handle comparison.
//!
//! All methods take `&self`: the interner uses interior mutability
//! (`DashMap` dedup maps plus `RwLock`ed row vectors) and is `Sync`, so
//! independent comparisons can run in parallel against one interner.

use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use skema_common::interner::{Atom, Interner};

use crate::types::{
    CyclicShape, CyclicShapeId, IntrinsicKind, LiteralValue, Modifiers, ObjectShape, ObjectShapeId,
    OrderedFloat, Property, Schema, SchemaData, SchemaId, SchemaListId, Signature, SignatureId,
};

/// Dedup side table: value -> dense id, id -> shared value.
struct Table<T: Eq + Hash> {
    dedup: DashMap<Arc<T>, u32>,
    rows: RwLock<Vec<Arc<T>>>,
}

impl<T: Eq + Hash> Table<T> {
    fn new() -> Self {
        Self {
            dedup: DashMap::new(),
            rows: RwLock::new(Vec::new()),
        }
    }

    fn intern(&self, value: T) -> u32 {
        if let Some(id) = self.dedup.get(&value) {
            return *id;
        }
        let mut rows = self.rows.write().expect("interner lock poisoned");
        // Re-check under the write lock: another thread may have interned
        // the same value between the miss and the lock acquisition.
        if let Some(id) = self.dedup.get(&value) {
            return *id;
        }
        let arc = Arc::new(value);
        let id = rows.len() as u32;
        rows.push(Arc::clone(&arc));
        self.dedup.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Arc<T> {
        let rows = self.rows.read().expect("interner lock poisoned");
        Arc::clone(&rows[id as usize])
    }
}

/// The schema interner.
///
/// Intrinsic schemas are pre-interned at construction in a fixed order so
/// that `SchemaId::ANY`, `SchemaId::STRING`, … are valid against every
/// interner instance.
pub struct SchemaInterner {
    atoms: Interner,
    dedup: DashMap<Schema, SchemaId>,
    rows: RwLock<Vec<Schema>>,
    lists: Table<Vec<SchemaId>>,
    object_shapes: Table<ObjectShape>,
    signatures: Table<Signature>,
    cyclic_shapes: Table<CyclicShape>,
}

impl SchemaInterner {
    pub fn new() -> Self {
        let interner = Self {
            atoms: Interner::new(),
            dedup: DashMap::new(),
            rows: RwLock::new(Vec::new()),
            lists: Table::new(),
            object_shapes: Table::new(),
            signatures: Table::new(),
            cyclic_shapes: Table::new(),
        };
        // Must match the SchemaId constants in declaration order.
        let intrinsics = [
            (IntrinsicKind::Any, SchemaId::ANY),
            (IntrinsicKind::Unknown, SchemaId::UNKNOWN),
            (IntrinsicKind::Never, SchemaId::NEVER),
            (IntrinsicKind::Void, SchemaId::VOID),
            (IntrinsicKind::Undefined, SchemaId::UNDEFINED),
            (IntrinsicKind::Null, SchemaId::NULL),
            (IntrinsicKind::Boolean, SchemaId::BOOLEAN),
            (IntrinsicKind::BigInt, SchemaId::BIGINT),
            (IntrinsicKind::Number, SchemaId::NUMBER),
            (IntrinsicKind::Integer, SchemaId::INTEGER),
            (IntrinsicKind::String, SchemaId::STRING),
            (IntrinsicKind::Symbol, SchemaId::SYMBOL),
        ];
        for (kind, expected) in intrinsics {
            let id = interner.intern(Schema::new(SchemaData::Intrinsic(kind)));
            debug_assert_eq!(id, expected, "intrinsic interning order drifted");
        }
        interner
    }

    /// Intern a complete node, returning its id. Idempotent.
    pub fn intern(&self, schema: Schema) -> SchemaId {
        if let Some(id) = self.dedup.get(&schema) {
            return *id;
        }
        let mut rows = self.rows.write().expect("interner lock poisoned");
        if let Some(id) = self.dedup.get(&schema) {
            return *id;
        }
        let id = SchemaId(rows.len() as u32);
        rows.push(schema);
        self.dedup.insert(schema, id);
        id
    }

    /// Look up the node behind an id.
    pub fn lookup(&self, id: SchemaId) -> Option<Schema> {
        let rows = self.rows.read().expect("interner lock poisoned");
        rows.get(id.0 as usize).copied()
    }

    /// Number of distinct interned schemas.
    pub fn len(&self) -> usize {
        self.rows.read().expect("interner lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Atoms ──

    pub fn atom(&self, text: &str) -> Atom {
        self.atoms.intern(text)
    }

    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.atoms.resolve(atom)
    }

    // ── Side tables ──

    pub fn schema_list(&self, id: SchemaListId) -> Arc<Vec<SchemaId>> {
        self.lists.get(id.0)
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        self.object_shapes.get(id.0)
    }

    pub fn signature(&self, id: SignatureId) -> Arc<Signature> {
        self.signatures.get(id.0)
    }

    pub fn cyclic_shape(&self, id: CyclicShapeId) -> Arc<CyclicShape> {
        self.cyclic_shapes.get(id.0)
    }

    fn intern_list(&self, members: Vec<SchemaId>) -> SchemaListId {
        SchemaListId(self.lists.intern(members))
    }

    // ── Constructors ──

    pub fn literal_string(&self, value: &str) -> SchemaId {
        let atom = self.atom(value);
        self.intern(Schema::new(SchemaData::Literal(LiteralValue::String(atom))))
    }

    pub fn literal_number(&self, value: f64) -> SchemaId {
        self.intern(Schema::new(SchemaData::Literal(LiteralValue::Number(
            OrderedFloat(value),
        ))))
    }

    pub fn literal_boolean(&self, value: bool) -> SchemaId {
        self.intern(Schema::new(SchemaData::Literal(LiteralValue::Boolean(value))))
    }

    pub fn literal_bigint(&self, value: i64) -> SchemaId {
        self.intern(Schema::new(SchemaData::Literal(LiteralValue::BigInt(value))))
    }

    /// Anchored template pattern, e.g. `^(on|off)$`.
    pub fn template_literal(&self, pattern: &str) -> SchemaId {
        let atom = self.atom(pattern);
        self.intern(Schema::new(SchemaData::TemplateLiteral(atom)))
    }

    pub fn array(&self, item: SchemaId) -> SchemaId {
        self.intern(Schema::new(SchemaData::Array(item)))
    }

    pub fn tuple(&self, items: Vec<SchemaId>) -> SchemaId {
        let list = self.intern_list(items);
        self.intern(Schema::new(SchemaData::Tuple(list)))
    }

    /// Object from (name, schema) pairs. Properties are sorted by name
    /// atom; a duplicate name keeps the last entry.
    pub fn object(&self, props: Vec<(&str, SchemaId)>) -> SchemaId {
        let mut properties: Vec<Property> = Vec::with_capacity(props.len());
        for (name, schema) in props {
            let name = self.atom(name);
            match properties.iter_mut().find(|p| p.name == name) {
                Some(existing) => existing.schema = schema,
                None => properties.push(Property { name, schema }),
            }
        }
        self.object_from_properties(properties)
    }

    /// Object from already-atomized properties.
    pub fn object_from_properties(&self, mut properties: Vec<Property>) -> SchemaId {
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        let shape = ObjectShapeId(self.object_shapes.intern(ObjectShape { properties }));
        self.intern(Schema::new(SchemaData::Object(shape)))
    }

    pub fn record(&self, key_pattern: &str, value: SchemaId) -> SchemaId {
        let pattern = self.atom(key_pattern);
        self.intern(Schema::new(SchemaData::Record(pattern, value)))
    }

    /// Union of members, deduplicated preserving first occurrence. `Never`
    /// members vanish; zero remaining members collapse to `Never`, one to
    /// itself.
    pub fn union(&self, members: Vec<SchemaId>) -> SchemaId {
        let mut seen = FxHashSet::default();
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            if member == SchemaId::NEVER {
                continue;
            }
            if seen.insert(member) {
                out.push(member);
            }
        }
        match out.len() {
            0 => SchemaId::NEVER,
            1 => out[0],
            _ => {
                let list = self.intern_list(out);
                self.intern(Schema::new(SchemaData::Union(list)))
            }
        }
    }

    pub fn union2(&self, a: SchemaId, b: SchemaId) -> SchemaId {
        self.union(vec![a, b])
    }

    /// Intersection of members. No evaluation happens here; see
    /// [`evaluate_intersect`](crate::evaluate::evaluate_intersect).
    pub fn intersect(&self, members: Vec<SchemaId>) -> SchemaId {
        match members.len() {
            0 => SchemaId::UNKNOWN,
            1 => members[0],
            _ => {
                let list = self.intern_list(members);
                self.intern(Schema::new(SchemaData::Intersect(list)))
            }
        }
    }

    /// Enum over literal member schemas.
    pub fn enum_of(&self, values: Vec<SchemaId>) -> SchemaId {
        let list = self.intern_list(values);
        self.intern(Schema::new(SchemaData::Enum(list)))
    }

    pub fn function(&self, params: Vec<SchemaId>, return_type: SchemaId) -> SchemaId {
        let sig = SignatureId(self.signatures.intern(Signature {
            params,
            output: return_type,
        }));
        self.intern(Schema::new(SchemaData::Function(sig)))
    }

    pub fn constructor(&self, params: Vec<SchemaId>, instance_type: SchemaId) -> SchemaId {
        let sig = SignatureId(self.signatures.intern(Signature {
            params,
            output: instance_type,
        }));
        self.intern(Schema::new(SchemaData::Constructor(sig)))
    }

    pub fn iterator(&self, item: SchemaId) -> SchemaId {
        self.intern(Schema::new(SchemaData::Iterator(item)))
    }

    pub fn async_iterator(&self, item: SchemaId) -> SchemaId {
        self.intern(Schema::new(SchemaData::AsyncIterator(item)))
    }

    pub fn promise(&self, item: SchemaId) -> SchemaId {
        self.intern(Schema::new(SchemaData::Promise(item)))
    }

    /// Named reference into an enclosing cyclic definition group.
    pub fn reference(&self, name: &str) -> SchemaId {
        let atom = self.atom(name);
        self.intern(Schema::new(SchemaData::Ref(atom)))
    }

    /// Cyclic definition group with a root reference.
    pub fn cyclic(&self, defs: Vec<(&str, SchemaId)>, root: &str) -> SchemaId {
        let mut defs: Vec<(Atom, SchemaId)> = defs
            .into_iter()
            .map(|(name, schema)| (self.atom(name), schema))
            .collect();
        defs.sort_by(|a, b| a.0.cmp(&b.0));
        let root = self.atom(root);
        let shape = CyclicShapeId(self.cyclic_shapes.intern(CyclicShape { defs, root }));
        self.intern(Schema::new(SchemaData::Cyclic(shape)))
    }

    /// Unconstrained inference placeholder (upper bound `Unknown`).
    pub fn infer(&self, name: &str) -> SchemaId {
        self.infer_with(name, SchemaId::UNKNOWN)
    }

    /// Inference placeholder with an explicit upper-bound constraint.
    pub fn infer_with(&self, name: &str, constraint: SchemaId) -> SchemaId {
        let atom = self.atom(name);
        self.intern(Schema::new(SchemaData::Infer(atom, constraint)))
    }

    pub fn rest(&self, inner: SchemaId) -> SchemaId {
        self.intern(Schema::new(SchemaData::Rest(inner)))
    }

    // ── Modifiers ──

    /// Current modifiers of a node. Unknown ids report empty.
    pub fn modifiers(&self, id: SchemaId) -> Modifiers {
        self.lookup(id).map(|s| s.modifiers).unwrap_or_default()
    }

    pub fn is_optional(&self, id: SchemaId) -> bool {
        self.modifiers(id).contains(Modifiers::OPTIONAL)
    }

    pub fn is_immutable(&self, id: SchemaId) -> bool {
        self.modifiers(id).contains(Modifiers::IMMUTABLE)
    }

    /// New node with the given modifiers added; payload unchanged.
    pub fn with_modifiers(&self, id: SchemaId, add: Modifiers) -> SchemaId {
        let Some(schema) = self.lookup(id) else {
            return id;
        };
        if schema.modifiers.contains(add) {
            return id;
        }
        self.intern(Schema {
            data: schema.data,
            modifiers: schema.modifiers | add,
        })
    }

    /// New node with the given modifiers removed; payload unchanged.
    pub fn without_modifiers(&self, id: SchemaId, remove: Modifiers) -> SchemaId {
        let Some(schema) = self.lookup(id) else {
            return id;
        };
        if !schema.modifiers.intersects(remove) {
            return id;
        }
        self.intern(Schema {
            data: schema.data,
            modifiers: schema.modifiers - remove,
        })
    }

    pub fn optional(&self, id: SchemaId) -> SchemaId {
        self.with_modifiers(id, Modifiers::OPTIONAL)
    }

    pub fn readonly(&self, id: SchemaId) -> SchemaId {
        self.with_modifiers(id, Modifiers::READONLY)
    }

    pub fn immutable(&self, id: SchemaId) -> SchemaId {
        self.with_modifiers(id, Modifiers::IMMUTABLE)
    }

    pub fn strip_optional(&self, id: SchemaId) -> SchemaId {
        self.without_modifiers(id, Modifiers::OPTIONAL)
    }
}

impl Default for SchemaInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod intern_tests;
