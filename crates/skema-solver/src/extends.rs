//! The structural extends comparator.
//!
//! [`ExtendsChecker`] answers "does every value of `left` also satisfy
//! `right`?" with a tri-state [`ExtendsResult`]. A truthy verdict carries
//! the inference bindings collected from `Infer` placeholders on the right
//! side; [`ExtendsResult::Union`] is the truthy verdict produced when a
//! union on the left was distributed member-by-member, which downstream
//! conditional evaluation treats differently from a plain `True`.
//!
//! The comparator is two dispatchers. The left dispatcher owns the
//! structural rules (scalars, literals, containers, signatures); before a
//! structural rule runs, the right dispatcher gets a chance to consume the
//! right side generically (top schemas, unions, intersections, inference
//! placeholders, and the sugar kinds that rewrite to unions).
//!
//! Comparison never mutates the environment it is handed; bindings are
//! threaded through cloned maps so a failed branch leaves no trace.

use rustc_hash::{FxHashMap, FxHashSet};
use skema_common::interner::Atom;
use skema_common::limits::{MAX_EXTENDS_DEPTH, STACK_RED_ZONE, STACK_SEGMENT_SIZE};
use tracing::trace;

use crate::evaluate::evaluate_intersect;
use crate::extends_rules::{objects, params, tuples};
use crate::intern::SchemaInterner;
use crate::normalize::normalize;
use crate::template_literal::decode_template_literal;
use crate::types::{IntrinsicKind, Modifiers, SchemaData, SchemaError, SchemaId};

/// Inference bindings collected from `Infer` placeholders.
pub type Inferred = FxHashMap<Atom, SchemaId>;

/// Tri-state comparison verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendsResult {
    /// The relation does not hold.
    False,
    /// The relation holds, with the bindings collected along the way.
    True(Inferred),
    /// The relation holds and was established by distributing a union on
    /// the left over the right side.
    Union(Inferred),
}

impl ExtendsResult {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, ExtendsResult::False)
    }

    /// Bindings of a truthy verdict.
    pub fn inferred(&self) -> Option<&Inferred> {
        match self {
            ExtendsResult::False => None,
            ExtendsResult::True(env) | ExtendsResult::Union(env) => Some(env),
        }
    }

    pub fn into_inferred(self) -> Option<Inferred> {
        match self {
            ExtendsResult::False => None,
            ExtendsResult::True(env) | ExtendsResult::Union(env) => Some(env),
        }
    }

    /// Collapse the distribution marker to a plain `True`. Rules that
    /// re-enter the comparator for a sub-component use this so the
    /// `Union` verdict only ever describes the operands themselves.
    pub(crate) fn demote(self) -> ExtendsResult {
        match self {
            ExtendsResult::Union(env) => ExtendsResult::True(env),
            other => other,
        }
    }
}

/// One-shot comparison with an empty starting environment.
pub fn structural_extends(
    interner: &SchemaInterner,
    left: SchemaId,
    right: SchemaId,
) -> Result<ExtendsResult, SchemaError> {
    ExtendsChecker::new(interner).extends(&Inferred::default(), left, right)
}

/// Reusable comparison state over one interner.
pub struct ExtendsChecker<'a> {
    pub(crate) interner: &'a SchemaInterner,
    /// Pairs currently on the comparison path. A revisit is answered
    /// coinductively: the pending comparison is assumed to hold.
    in_progress: FxHashSet<(SchemaId, SchemaId)>,
    depth: u32,
}

impl<'a> ExtendsChecker<'a> {
    pub fn new(interner: &'a SchemaInterner) -> Self {
        Self {
            interner,
            in_progress: FxHashSet::default(),
            depth: 0,
        }
    }

    /// Does `left` extend `right` under the given bindings?
    ///
    /// The environment is input only; a truthy verdict carries the
    /// (possibly extended) environment back out.
    pub fn extends(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            self.extends_guarded(env, left, right)
        })
    }

    fn extends_guarded(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        if self.depth >= MAX_EXTENDS_DEPTH {
            return Err(SchemaError::DepthExceeded {
                limit: MAX_EXTENDS_DEPTH,
            });
        }
        let left = normalize(self.interner, left)?;
        let right = normalize(self.interner, right)?;
        if !self.in_progress.insert((left, right)) {
            // Already comparing this pair further up the path.
            return Ok(ExtendsResult::True(env.clone()));
        }
        self.depth += 1;
        trace!(left = left.0, right = right.0, depth = self.depth, "extends");
        let result = self.dispatch_left(env, left, right);
        self.depth -= 1;
        self.in_progress.remove(&(left, right));
        result
    }

    // ── Left dispatcher ──

    fn dispatch_left(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        let Some(node) = self.interner.lookup(left) else {
            return Ok(ExtendsResult::False);
        };
        match node.data {
            // Sugar kinds rewrite and re-enter.
            SchemaData::Enum(list) => {
                let members = self.interner.schema_list(list);
                let rewritten = self.interner.union(members.as_ref().clone());
                self.extends(env, rewritten, right)
            }
            SchemaData::TemplateLiteral(pattern) => {
                let decoded = decode_template_literal(self.interner, pattern)?;
                self.extends(env, decoded, right)
            }

            SchemaData::Union(list) => self.union_left(env, list, right),
            SchemaData::Intersect(list) => self.intersect_left(env, left, list, right),

            SchemaData::Intrinsic(kind) => self.intrinsic_left(env, kind, left, right),
            SchemaData::Literal(value) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                let holds = match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Literal(rv)) => value == rv,
                    Some(SchemaData::Intrinsic(kind)) => {
                        crate::evaluate::literal_fits_intrinsic(value, kind)
                    }
                    _ => false,
                };
                Ok(self.verdict(holds, env))
            }

            SchemaData::Array(item) => self.array_left(env, left, item, node.modifiers, right),
            SchemaData::Tuple(list) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                let items = self.interner.schema_list(list);
                match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Tuple(rlist)) => {
                        let right_items = self.interner.schema_list(rlist);
                        tuples::tuple_extends_tuple(self, env, &items, &right_items)
                    }
                    Some(SchemaData::Array(r_item)) => {
                        tuples::tuple_extends_array(self, env, &items, r_item)
                    }
                    _ => Ok(ExtendsResult::False),
                }
            }
            SchemaData::Object(shape) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Object(r_shape)) => {
                        objects::object_extends_object(self, env, shape, r_shape)
                    }
                    Some(SchemaData::Record(pattern, value)) => {
                        objects::object_extends_record(self, env, shape, pattern, value)
                    }
                    _ => Ok(ExtendsResult::False),
                }
            }
            SchemaData::Record(pattern, value) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Record(r_pattern, r_value)) => {
                        objects::record_extends_record(self, env, pattern, value, r_pattern, r_value)
                    }
                    Some(SchemaData::Object(r_shape)) => {
                        objects::record_extends_object(self, env, pattern, value, r_shape)
                    }
                    _ => Ok(ExtendsResult::False),
                }
            }

            SchemaData::Function(sig) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Function(r_sig)) => self.signature_extends(env, sig, r_sig),
                    _ => Ok(ExtendsResult::False),
                }
            }
            SchemaData::Constructor(sig) => {
                if let Some(result) = self.try_right(env, left, right)? {
                    return Ok(result);
                }
                match self.interner.lookup(right).map(|s| s.data) {
                    Some(SchemaData::Constructor(r_sig)) => self.signature_extends(env, sig, r_sig),
                    _ => Ok(ExtendsResult::False),
                }
            }

            SchemaData::Promise(item) => self.wrapper_left(env, left, item, right, |data| {
                match data {
                    SchemaData::Promise(inner) => Some(inner),
                    _ => None,
                }
            }),
            SchemaData::Iterator(item) => self.wrapper_left(env, left, item, right, |data| {
                match data {
                    SchemaData::Iterator(inner) => Some(inner),
                    _ => None,
                }
            }),
            SchemaData::AsyncIterator(item) => self.wrapper_left(env, left, item, right, |data| {
                match data {
                    SchemaData::AsyncIterator(inner) => Some(inner),
                    _ => None,
                }
            }),

            // A bare reference escaped its definition group.
            SchemaData::Ref(name) => Err(SchemaError::UnresolvedRef {
                name: self.interner.resolve_atom(name).to_string(),
            }),
            // Normalization rewrote every Cyclic before dispatch.
            SchemaData::Cyclic(_) => unreachable!("cyclic schema survived normalization"),

            // Placeholders are positional; they have no meaning as a
            // standalone left operand.
            SchemaData::Infer(..) | SchemaData::Rest(..) => Ok(ExtendsResult::False),
        }
    }

    /// Distribute a union on the left: the relation holds only if every
    /// member holds, and the verdict is marked [`ExtendsResult::Union`].
    fn union_left(
        &mut self,
        env: &Inferred,
        list: crate::types::SchemaListId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        let members = self.interner.schema_list(list);
        let mut acc = env.clone();
        for &member in members.iter() {
            match self.extends(&acc, member, right)? {
                ExtendsResult::False => return Ok(ExtendsResult::False),
                result => {
                    if let Some(bindings) = result.into_inferred() {
                        acc = bindings;
                    }
                }
            }
        }
        Ok(ExtendsResult::Union(acc))
    }

    /// An intersection on the left is evaluated first; if evaluation made
    /// progress the result re-enters the comparator. An irreducible
    /// intersection falls back to member existence: the intersection is at
    /// least as narrow as each of its members.
    fn intersect_left(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        list: crate::types::SchemaListId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        let evaluated = evaluate_intersect(self.interner, &[left])?;
        if evaluated != left {
            return self.extends(env, evaluated, right);
        }
        if let Some(result) = self.try_right(env, left, right)? {
            return Ok(result);
        }
        let members = self.interner.schema_list(list);
        for &member in members.iter() {
            let result = self.extends(env, member, right)?;
            if result.is_truthy() {
                return Ok(result);
            }
        }
        Ok(ExtendsResult::False)
    }

    fn intrinsic_left(
        &mut self,
        env: &Inferred,
        kind: IntrinsicKind,
        left: SchemaId,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        if let Some(result) = self.try_right(env, left, right)? {
            return Ok(result);
        }
        // Never is the bottom schema: it extends everything, and nothing
        // else extends it.
        if kind == IntrinsicKind::Never {
            return Ok(ExtendsResult::True(env.clone()));
        }
        if kind == IntrinsicKind::Any {
            let rejects = matches!(
                self.interner.lookup(right).map(|s| s.data),
                Some(SchemaData::Intrinsic(IntrinsicKind::Never))
            );
            return Ok(self.verdict(!rejects, env));
        }
        let holds = match self.interner.lookup(right).map(|s| s.data) {
            Some(SchemaData::Intrinsic(rk)) => {
                kind == rk
                    || matches!(
                        (kind, rk),
                        (IntrinsicKind::Integer, IntrinsicKind::Number)
                            | (IntrinsicKind::Undefined, IntrinsicKind::Void)
                    )
            }
            _ => false,
        };
        Ok(self.verdict(holds, env))
    }

    fn array_left(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        item: SchemaId,
        modifiers: Modifiers,
        right: SchemaId,
    ) -> Result<ExtendsResult, SchemaError> {
        if let Some(result) = self.try_right(env, left, right)? {
            return Ok(result);
        }
        let Some(right_node) = self.interner.lookup(right) else {
            return Ok(ExtendsResult::False);
        };
        let SchemaData::Array(r_item) = right_node.data else {
            return Ok(ExtendsResult::False);
        };
        // An immutable array offers fewer capabilities than a mutable one.
        if modifiers.contains(Modifiers::IMMUTABLE)
            && !right_node.modifiers.contains(Modifiers::IMMUTABLE)
        {
            return Ok(ExtendsResult::False);
        }
        Ok(self.extends(env, item, r_item)?.demote())
    }

    /// Covariant single-item wrappers (Promise, Iterator, AsyncIterator).
    fn wrapper_left(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        item: SchemaId,
        right: SchemaId,
        unwrap: fn(SchemaData) -> Option<SchemaId>,
    ) -> Result<ExtendsResult, SchemaError> {
        if let Some(result) = self.try_right(env, left, right)? {
            return Ok(result);
        }
        match self.interner.lookup(right).map(|s| s.data).and_then(unwrap) {
            Some(r_item) => Ok(self.extends(env, item, r_item)?.demote()),
            None => Ok(ExtendsResult::False),
        }
    }

    fn signature_extends(
        &mut self,
        env: &Inferred,
        left: crate::types::SignatureId,
        right: crate::types::SignatureId,
    ) -> Result<ExtendsResult, SchemaError> {
        let left_sig = self.interner.signature(left);
        let right_sig = self.interner.signature(right);
        let Some(after_params) =
            params::compare_parameters(self, env, &left_sig.params, &right_sig.params)?
        else {
            return Ok(ExtendsResult::False);
        };
        match self.extends(&after_params, left_sig.output, right_sig.output)? {
            ExtendsResult::False => Ok(ExtendsResult::False),
            result => Ok(ExtendsResult::True(
                result.into_inferred().unwrap_or(after_params),
            )),
        }
    }

    // ── Right dispatcher ──

    /// Generic right-side rules. Returns `None` when the right side is a
    /// structural kind the left rule must decide on.
    pub(crate) fn try_right(
        &mut self,
        env: &Inferred,
        left: SchemaId,
        right: SchemaId,
    ) -> Result<Option<ExtendsResult>, SchemaError> {
        let Some(node) = self.interner.lookup(right) else {
            return Ok(Some(ExtendsResult::False));
        };
        match node.data {
            SchemaData::Intrinsic(IntrinsicKind::Any | IntrinsicKind::Unknown) => {
                Ok(Some(ExtendsResult::True(env.clone())))
            }
            SchemaData::Enum(list) => {
                let members = self.interner.schema_list(list);
                let rewritten = self.interner.union(members.as_ref().clone());
                self.extends(env, left, rewritten).map(Some)
            }
            SchemaData::TemplateLiteral(pattern) => {
                let decoded = decode_template_literal(self.interner, pattern)?;
                self.extends(env, left, decoded).map(Some)
            }
            // Existence: the first member the left fits decides, with that
            // branch's bindings.
            SchemaData::Union(list) => {
                let members = self.interner.schema_list(list);
                for &member in members.iter() {
                    let result = self.extends(env, left, member)?;
                    if result.is_truthy() {
                        return Ok(Some(result));
                    }
                }
                Ok(Some(ExtendsResult::False))
            }
            // Universality: every member must admit the left, threading
            // bindings through the members in order.
            SchemaData::Intersect(list) => {
                let members = self.interner.schema_list(list);
                let mut acc = env.clone();
                for &member in members.iter() {
                    match self.extends(&acc, left, member)? {
                        ExtendsResult::False => return Ok(Some(ExtendsResult::False)),
                        result => {
                            if let Some(bindings) = result.into_inferred() {
                                acc = bindings;
                            }
                        }
                    }
                }
                Ok(Some(ExtendsResult::True(acc)))
            }
            // The placeholder admits anything inside its upper bound and
            // captures the left operand under its name.
            SchemaData::Infer(name, constraint) => {
                match self.extends(env, left, constraint)? {
                    ExtendsResult::False => Ok(Some(ExtendsResult::False)),
                    result => {
                        let mut bindings =
                            result.into_inferred().unwrap_or_else(|| env.clone());
                        bindings.insert(name, left);
                        Ok(Some(ExtendsResult::True(bindings)))
                    }
                }
            }
            SchemaData::Ref(name) => Err(SchemaError::UnresolvedRef {
                name: self.interner.resolve_atom(name).to_string(),
            }),
            _ => Ok(None),
        }
    }

    pub(crate) fn verdict(&self, holds: bool, env: &Inferred) -> ExtendsResult {
        if holds {
            ExtendsResult::True(env.clone())
        } else {
            ExtendsResult::False
        }
    }
}

#[cfg(test)]
#[path = "tests/extends_tests.rs"]
mod extends_tests;
