// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Properties of the constraint kernel and the pre-coloring pass over
//! the sample puzzles: candidate soundness and idempotence.

mod common;

use common::{load, load_prepared};
use futoshiki_search::propagation::{compute_candidates, satisfies_inequalities};

const SOLVABLE_SAMPLES: &[&str] = &[
    "4x4_vee.txt",
    "5x5_sparse.txt",
    "9x9_extreme1.txt",
    "3x3_propagation.txt",
];

const SAMPLES: &[&str] = &[
    "4x4_vee.txt",
    "5x5_sparse.txt",
    "9x9_extreme1.txt",
    "3x3_propagation.txt",
    "3x3_unsolvable.txt",
];

/// After pre-coloring, every surviving candidate of every empty cell is
/// individually consistent with its inequality edges, and on a solvable
/// board every given cell's list is exactly its given value. (On an
/// unsolvable board a given's list may be starved empty; that is how
/// contradictory givens surface.)
#[test]
fn test_candidate_soundness_after_precoloring() {
    for name in SAMPLES {
        let puzzle = load_prepared(name);
        for row in 0..puzzle.size() {
            for col in 0..puzzle.size() {
                if puzzle.is_empty_cell(row, col) {
                    for &color in puzzle.candidates().cell(row, col) {
                        assert!(
                            satisfies_inequalities(&puzzle, row, col, color),
                            "{name}: unsound candidate {color} at ({row},{col})"
                        );
                    }
                }
            }
        }
    }
    for name in SOLVABLE_SAMPLES {
        let puzzle = load_prepared(name);
        for row in 0..puzzle.size() {
            for col in 0..puzzle.size() {
                if !puzzle.is_empty_cell(row, col) {
                    assert_eq!(
                        puzzle.candidates().cell(row, col),
                        &[puzzle.board(row, col)],
                        "{name}: given cell ({row},{col}) must be a singleton"
                    );
                }
            }
        }
    }
}

/// Running the pass a second time changes nothing.
#[test]
fn test_precoloring_is_idempotent() {
    for name in SAMPLES {
        let mut puzzle = load(name);
        let first = compute_candidates(&mut puzzle, true);
        let snapshot = puzzle.candidates().clone();
        let second = compute_candidates(&mut puzzle, true);
        assert_eq!(puzzle.candidates(), &snapshot, "{name}: lists changed on rerun");
        assert_eq!(first, second, "{name}: removal count changed on rerun");
    }
}

/// Pre-coloring alone solves the propagation-only sample: every cell
/// collapses to a singleton, and the removal count is exactly the
/// initial total minus one survivor per cell.
#[test]
fn test_propagation_only_sample_collapses() {
    let mut puzzle = load("3x3_propagation.txt");
    let initial: u32 = 8 + 3; // eight givens, one open cell
    let removed = compute_candidates(&mut puzzle, true);
    assert_eq!(removed, initial - 9);
    for row in 0..3 {
        for col in 0..3 {
            assert_eq!(
                puzzle.candidates().len(row, col),
                1,
                "cell ({row},{col}) should be forced"
            );
        }
    }
    assert_eq!(puzzle.candidates().cell(2, 2), &[2]);
}
