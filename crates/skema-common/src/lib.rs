//! Common types and utilities for the skema structural schema engine.
//!
//! This crate provides foundational pieces used across the skema crates:
//! - String interning (`Atom`, `Interner`)
//! - Centralized limits and thresholds

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
