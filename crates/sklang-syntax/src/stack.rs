//! Stack headroom for the recursive passes.
//!
//! Parsing, checking and evaluation all recurse over the tree. Each recursive
//! entry point runs through [`grow`], which moves onto a fresh heap segment
//! when the current stack runs low, so the configured limits are reached
//! whatever stack the caller started on.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 256 * 1024;

/// Size of each newly allocated segment.
const SEGMENT: usize = 4 * 1024 * 1024;

#[inline]
pub fn grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}
