//! Centralized limits and thresholds for the schema engine.
//!
//! Keeping these in one place prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum recursion depth for structural comparison.
///
/// Comparison depth equals schema nesting depth, which is finite after
/// cyclic normalization, so this limit only trips on pathologically deep
/// (or malformed) inputs. Exceeding it is reported as a structural error,
/// never as a negative comparison verdict.
pub const MAX_EXTENDS_DEPTH: u32 = 512;

/// Stack red-zone size for the comparison dispatcher.
///
/// When less than this much stack remains, a new segment is allocated
/// before recursing further.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Stack segment size allocated when the red zone is hit.
pub const STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Maximum number of string literals a template pattern may expand to.
///
/// Patterns whose finite language is larger than this are treated as
/// infinite and widen to `String` instead of materializing the union.
pub const TEMPLATE_EXPANSION_LIMIT: usize = 10_000;

/// Maximum union members to distribute an intersection over.
///
/// Evaluating `(A | B | ...) & X` distributes the intersection across the
/// union; this caps the fan-out to prevent combinatorial blowup.
pub const MAX_INTERSECT_DISTRIBUTION: usize = 100;
