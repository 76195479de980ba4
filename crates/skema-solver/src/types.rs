//! Structural schema representation.
//!
//! Every schema is an immutable, interned value. `SchemaId` is a dense
//! handle into the [`SchemaInterner`](crate::intern::SchemaInterner);
//! interning gives O(1) equality and lets composite payloads (member lists,
//! object shapes, signatures) live in shared side tables behind small ids.
//!
//! A node is a [`SchemaData`] tag plus an orthogonal [`Modifiers`] set.
//! Modifiers are additive metadata, not separate tags: adding or removing
//! one interns a new node with the payload otherwise unchanged.

use bitflags::bitflags;
use skema_common::interner::Atom;

/// Interned schema handle.
///
/// Ids are only meaningful together with the interner that produced them.
/// Intrinsic schemas are pre-interned at fixed indices so they are
/// available as constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub u32);

impl SchemaId {
    pub const ANY: Self = Self(0);
    pub const UNKNOWN: Self = Self(1);
    pub const NEVER: Self = Self(2);
    pub const VOID: Self = Self(3);
    pub const UNDEFINED: Self = Self(4);
    pub const NULL: Self = Self(5);
    pub const BOOLEAN: Self = Self(6);
    pub const BIGINT: Self = Self(7);
    pub const NUMBER: Self = Self(8);
    pub const INTEGER: Self = Self(9);
    pub const STRING: Self = Self(10);
    pub const SYMBOL: Self = Self(11);
}

/// Handle for an interned list of schemas (union/intersection members,
/// tuple elements, enum values, parameter lists).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaListId(pub u32);

/// Handle for an interned object shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

/// Handle for an interned function/constructor signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignatureId(pub u32);

/// Handle for an interned cyclic definition group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CyclicShapeId(pub u32);

bitflags! {
    /// Orthogonal node modifiers.
    ///
    /// `OPTIONAL` marks object properties, tuple elements, and parameters
    /// that may be absent. `READONLY` marks properties that cannot be
    /// reassigned. `IMMUTABLE` marks arrays/tuples whose contents cannot
    /// be mutated.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const OPTIONAL = 1 << 0;
        const READONLY = 1 << 1;
        const IMMUTABLE = 1 << 2;
    }
}

/// Intrinsic (payload-free) schema kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    BigInt,
    Number,
    Integer,
    String,
    Symbol,
}

/// f64 wrapper with total equality and hashing over the bit pattern.
///
/// Literal schemas need to be interned, which requires `Eq + Hash`; plain
/// `f64` provides neither. Bit comparison is adequate here because literal
/// values come from schema construction, not arithmetic.
#[derive(Copy, Clone, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Literal schema payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat),
    Boolean(bool),
    BigInt(i64),
}

/// The schema tag union.
///
/// Composite payloads are ids into the interner's side tables, so the enum
/// itself stays `Copy` and cheap to pattern-match after a `lookup`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SchemaData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// Anchored pattern string denoting a (possibly infinite) set of
    /// string literals, e.g. `^(on|off)$`.
    TemplateLiteral(Atom),
    /// Finite set of literal member schemas. Sugar for the union of its
    /// members; never compared directly.
    Enum(SchemaListId),
    Array(SchemaId),
    Tuple(SchemaListId),
    Object(ObjectShapeId),
    /// Key pattern plus value schema.
    Record(Atom, SchemaId),
    Union(SchemaListId),
    Intersect(SchemaListId),
    Function(SignatureId),
    Constructor(SignatureId),
    Iterator(SchemaId),
    AsyncIterator(SchemaId),
    Promise(SchemaId),
    /// Named reference into an enclosing cyclic definition group.
    Ref(Atom),
    /// Self-referential definition group plus the root reference.
    Cyclic(CyclicShapeId),
    /// Named inference placeholder with an upper-bound constraint.
    Infer(Atom, SchemaId),
    /// "Zero or more of the inner schema" in tuple/parameter tails.
    Rest(SchemaId),
}

/// A complete interned node: tag payload plus modifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Schema {
    pub data: SchemaData,
    pub modifiers: Modifiers,
}

impl Schema {
    pub fn new(data: SchemaData) -> Self {
        Self {
            data,
            modifiers: Modifiers::empty(),
        }
    }
}

/// Named object property. Optional/readonly status lives on the property
/// schema's modifiers, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: Atom,
    pub schema: SchemaId,
}

/// Object shape: properties sorted by name atom for stable interning and
/// binary-search lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<Property>,
}

impl ObjectShape {
    /// Look up a property by name.
    pub fn property(&self, name: Atom) -> Option<&Property> {
        self.properties
            .binary_search_by(|p| p.name.cmp(&name))
            .ok()
            .map(|idx| &self.properties[idx])
    }
}

/// Function or constructor signature. For functions `output` is the return
/// schema; for constructors it is the instance schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<SchemaId>,
    pub output: SchemaId,
}

/// Cyclic definition group: a flat name-keyed arena of definitions plus
/// the root name. Self-reference is purely by name (`SchemaData::Ref`),
/// which sidesteps cyclic ownership entirely.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CyclicShape {
    /// Definitions sorted by name atom.
    pub defs: Vec<(Atom, SchemaId)>,
    pub root: Atom,
}

impl CyclicShape {
    pub fn definition(&self, name: Atom) -> Option<SchemaId> {
        self.defs
            .binary_search_by(|(n, _)| n.cmp(&name))
            .ok()
            .map(|idx| self.defs[idx].1)
    }
}

/// Structural invariant violations.
///
/// These are programming errors in the surrounding system (malformed
/// schema construction), not data-driven outcomes: a failed comparison is
/// the ordinary [`ExtendsResult::False`](crate::extends::ExtendsResult)
/// verdict and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("cyclic schema references missing definition `{name}`")]
    MissingDefinition { name: String },
    #[error("unresolved reference `{name}` outside a cyclic definition group")]
    UnresolvedRef { name: String },
    #[error("malformed template pattern `{pattern}`: {reason}")]
    MalformedPattern { pattern: String, reason: String },
    #[error("schema nesting exceeds the comparison depth limit ({limit})")]
    DepthExceeded { limit: u32 },
}
