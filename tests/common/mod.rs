// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use futoshiki_search::io::read_puzzle_from_file;
use futoshiki_search::model::{Grid, Ineq, Puzzle};
use futoshiki_search::propagation::compute_candidates;

/// Absolute path of a file under the repository's `puzzles/` directory.
pub fn puzzle_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("puzzles")
        .join(name)
}

/// Load a sample puzzle without running pre-coloring.
pub fn load(name: &str) -> Puzzle {
    read_puzzle_from_file(puzzle_path(name))
        .unwrap_or_else(|e| panic!("sample puzzle {name} must parse: {e}"))
}

/// Load a sample puzzle and run pre-coloring.
pub fn load_prepared(name: &str) -> Puzzle {
    let mut puzzle = load(name);
    compute_candidates(&mut puzzle, true);
    puzzle
}

/// Assert that `grid` is a complete, valid solution of `puzzle`: every
/// cell colored in range, every given honored, rows and columns
/// duplicate-free, every inequality edge satisfied.
pub fn assert_valid_solution(puzzle: &Puzzle, grid: &Grid) {
    let size = puzzle.size();
    assert_eq!(grid.size(), size);

    for row in 0..size {
        for col in 0..size {
            let value = grid.get(row, col);
            assert!(
                (1..=size as u8).contains(&value),
                "cell ({row},{col}) holds {value}, outside 1..={size}"
            );
            if !puzzle.is_empty_cell(row, col) {
                assert_eq!(
                    value,
                    puzzle.board(row, col),
                    "given cell ({row},{col}) was overwritten"
                );
            }
            for i in 0..size {
                assert!(
                    i == col || grid.get(row, i) != value,
                    "duplicate {value} in row {row}"
                );
                assert!(
                    i == row || grid.get(i, col) != value,
                    "duplicate {value} in column {col}"
                );
            }
        }
    }

    for row in 0..size {
        for col in 0..size - 1 {
            let left = grid.get(row, col);
            let right = grid.get(row, col + 1);
            match puzzle.h_cons(row, col) {
                Ineq::Greater => {
                    assert!(left > right, "({row},{col}) > ({row},{}) violated", col + 1)
                }
                Ineq::Smaller => {
                    assert!(left < right, "({row},{col}) < ({row},{}) violated", col + 1)
                }
                Ineq::None => {}
            }
        }
    }
    for row in 0..size - 1 {
        for col in 0..size {
            let upper = grid.get(row, col);
            let lower = grid.get(row + 1, col);
            match puzzle.v_cons(row, col) {
                Ineq::Greater => {
                    assert!(upper > lower, "({row},{col}) > ({},{col}) violated", row + 1)
                }
                Ineq::Smaller => {
                    assert!(upper < lower, "({row},{col}) < ({},{col}) violated", row + 1)
                }
                Ineq::None => {}
            }
        }
    }
}
