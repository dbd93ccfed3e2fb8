// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Compile-time constants for the solver core.
//!
//! This module defines the board-size ceiling and the caps that bound the
//! work-distribution machinery. The caps are deliberately conservative:
//! they exist so that degenerate puzzles cannot make the enumerator or the
//! depth calibrator blow up, not to tune performance.

/// Maximum supported board size (N in an N×N puzzle).
///
/// The candidate arena allocates `N³` slots in the worst case and a work
/// unit carries up to `3·N_MAX` integers on the wire, so this constant is
/// part of the inter-process message contract as well as a validation
/// bound for the parser.
pub const N_MAX: usize = 50;

/// Sentinel color for an unfilled cell, both on the board and in a
/// partially built solution grid.
pub const EMPTY: Color = 0;

/// A cell value. `1..=size` are real colors, [`EMPTY`] means unfilled.
///
/// `u8` is sufficient because `N_MAX < 256`; keeping cells a single byte
/// keeps a 50×50 grid within a few cache lines, which matters in the
/// backtracker's hot loop.
pub type Color = u8;

/// Hard cap on the number of work units the enumerator will materialize.
///
/// The generator stops emitting once this many units exist and logs a
/// warning. Truncation is safe for correctness (a truncated list still
/// only contains safe prefixes) but can cost completeness of coverage,
/// so the cap is large enough that it is not reached for any realistic
/// puzzle.
pub const WORK_UNIT_CAP: usize = 100_000;

/// Number of `i32` words in the fixed-size wire encoding of a work unit:
/// one depth word followed by `(row, col, color)` triples.
pub const UNIT_WIRE_WORDS: usize = 1 + 3 * N_MAX;

/// Upper bound on the calibration depth for a given board size.
///
/// Depth calibration counts every safe prefix of length `d`; the count
/// grows roughly as `size^d`, so larger boards get a smaller ceiling to
/// keep the pure counting pass bounded.
pub const fn max_enumeration_depth(size: usize) -> usize {
    if size <= 9 {
        5
    } else if size <= 15 {
        4
    } else {
        3
    }
}

/// Compile-time guard: a `Color` must be able to hold every value in
/// `0..=N_MAX`.
const _: () = assert!(N_MAX < (1 << Color::BITS), "Color type too small for N_MAX");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_enumeration_depth_bands() {
        assert_eq!(max_enumeration_depth(1), 5);
        assert_eq!(max_enumeration_depth(9), 5);
        assert_eq!(max_enumeration_depth(10), 4);
        assert_eq!(max_enumeration_depth(15), 4);
        assert_eq!(max_enumeration_depth(16), 3);
        assert_eq!(max_enumeration_depth(N_MAX), 3);
    }

    #[test]
    fn test_unit_wire_words() {
        assert_eq!(UNIT_WIRE_WORDS, 151);
    }
}
