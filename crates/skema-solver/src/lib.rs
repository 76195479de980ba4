//! Structural schema relations.
//!
//! The crate answers one question: given two interned schemas, does the
//! left extend the right, and if so, what did any inference placeholders
//! on the right capture? Everything else (the interner, cyclic
//! normalization, template pattern decoding, intersection evaluation)
//! exists to feed that comparison.
//!
//! ```
//! use skema_solver::{structural_extends, SchemaInterner, SchemaId};
//!
//! let interner = SchemaInterner::new();
//! let left = interner.tuple(vec![SchemaId::NUMBER, SchemaId::STRING]);
//! let head = interner.infer("Head");
//! let tail = interner.rest(interner.infer("Tail"));
//! let pattern = interner.tuple(vec![head, tail]);
//!
//! let result = structural_extends(&interner, left, pattern).unwrap();
//! let bindings = result.inferred().unwrap();
//! assert_eq!(bindings[&interner.atom("Head")], SchemaId::NUMBER);
//! ```

pub mod evaluate;
pub mod extends;
mod extends_rules;
pub mod guards;
pub mod intern;
pub mod normalize;
pub mod template_literal;
pub mod types;

pub use extends::{structural_extends, ExtendsChecker, ExtendsResult, Inferred};
pub use intern::SchemaInterner;
pub use normalize::normalize;
pub use types::{
    IntrinsicKind, LiteralValue, Modifiers, Schema, SchemaData, SchemaError, SchemaId,
};

pub use skema_common::interner::Atom;

// Test modules: unit tests are loaded by their source files via
// #[path = "tests/..."] declarations; the comprehensive suites in tests/
// are loaded here so they share the crate's internals.
#[cfg(test)]
#[path = "../tests/extends_comprehensive_tests.rs"]
mod extends_comprehensive_tests;
#[cfg(test)]
#[path = "../tests/object_comprehensive_tests.rs"]
mod object_comprehensive_tests;
#[cfg(test)]
#[path = "../tests/tuple_comprehensive_tests.rs"]
mod tuple_comprehensive_tests;
#[cfg(test)]
#[path = "../tests/cyclic_tests.rs"]
mod cyclic_tests;
#[cfg(test)]
#[path = "../tests/parallel_tests.rs"]
mod parallel_tests;
