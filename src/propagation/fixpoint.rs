// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The pre-coloring pass: candidate filtering iterated to a fixed point.
//!
//! Each round applies two narrowing steps to every cell in row-major
//! order:
//!
//! 1. discard candidates that [`satisfies_inequalities`] rejects against
//!    the neighbors' current lists;
//! 2. when a cell's list is a singleton, delete that color from every
//!    other cell in the same row and column.
//!
//! Rounds repeat until a full sweep changes no list length. One cell
//! collapsing to a singleton can cascade through its row and column, so
//! a handful of rounds routinely solves easy puzzles outright.
//!
//! An emptied candidate list is *not* an error here: the pass records it
//! and returns normally, and the backtracker later fails cleanly on the
//! empty list. Keeping the pass infallible lets every rank of a
//! distributed solve run it unconditionally and agree on the result.

use log::debug;

use crate::model::constants::N_MAX;
use crate::model::{Color, Puzzle};
use crate::propagation::rules::satisfies_inequalities;

/// Initialize candidate lists and, unless disabled, narrow them to a
/// fixed point. Returns the number of candidate values removed.
///
/// After this returns, a pre-set cell's list is exactly its given value,
/// and (with pre-coloring enabled) every surviving candidate of an empty
/// cell is arc-consistent with its inequality edges.
pub fn compute_candidates(puzzle: &mut Puzzle, use_precoloring: bool) -> u32 {
    debug!("starting pre-coloring phase");

    let size = puzzle.size();
    for row in 0..size {
        for col in 0..size {
            if puzzle.is_empty_cell(row, col) {
                puzzle.candidates_mut().fill_cell(row, col);
            } else {
                let given = puzzle.board(row, col);
                puzzle.candidates_mut().set_singleton(row, col, given);
            }
        }
    }
    let initial_colors = puzzle.candidates().total();

    if use_precoloring {
        loop {
            let before = puzzle.candidates().length_snapshot();

            for row in 0..size {
                for col in 0..size {
                    filter_cell(puzzle, row, col);
                    propagate_singleton(puzzle, row, col);
                }
            }

            if puzzle.candidates().length_snapshot() == before {
                break;
            }
        }
    }

    let removed = initial_colors - puzzle.candidates().total();
    debug!("pre-coloring phase complete, removed {removed} candidates");
    removed
}

/// Step 1: keep only the candidates of `(row, col)` that can coexist
/// with the cell's inequality edges. Pre-set cells are reset to their
/// given value.
fn filter_cell(puzzle: &mut Puzzle, row: usize, col: usize) {
    if !puzzle.is_empty_cell(row, col) {
        let given = puzzle.board(row, col);
        puzzle.candidates_mut().set_singleton(row, col, given);
        return;
    }

    let mut kept = [0 as Color; N_MAX];
    let mut kept_len = 0;
    for &color in puzzle.candidates().cell(row, col) {
        if satisfies_inequalities(puzzle, row, col, color) {
            kept[kept_len] = color;
            kept_len += 1;
        }
    }
    puzzle.candidates_mut().set_cell(row, col, &kept[..kept_len]);
}

/// Step 2: a singleton cell claims its color, removing it from every
/// other cell in the same row and column.
fn propagate_singleton(puzzle: &mut Puzzle, row: usize, col: usize) {
    if puzzle.candidates().len(row, col) != 1 {
        return;
    }
    let color = puzzle.candidates().cell(row, col)[0];

    for i in 0..puzzle.size() {
        if i != col {
            puzzle.candidates_mut().remove(row, i, color);
        }
        if i != row {
            puzzle.candidates_mut().remove(i, col, color);
        }
    }
}
