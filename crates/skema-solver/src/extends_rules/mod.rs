//! Structural comparison rules that are big enough to live on their own:
//! object property matching, tuple element matching, and parameter lists.

pub(crate) mod objects;
pub(crate) mod params;
pub(crate) mod tuples;
