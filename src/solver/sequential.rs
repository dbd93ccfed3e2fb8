// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The sequential backtracker.
//!
//! This is the ultimate worker for every scheduler in the crate: the
//! thread-pool tasks, the cluster workers and the single-process fallback
//! all bottom out here. The function is reentrant from any `(row, col)`
//! position over a partially filled grid, which is what lets a work unit
//! hand it a mid-board continuation point.
//!
//! The visit order is strict row-major, and candidates are tried in
//! arena order (ascending). Both orders are load-bearing: the work-unit
//! enumerator replays exactly this traversal, so a unit's continuation
//! point drops back into the identical search tree.

use crate::model::{Grid, Puzzle, EMPTY};
use crate::propagation::safe;

/// Complete `grid` from `(row, col)` onward.
///
/// Returns true iff a full solution was reached; on success the grid is
/// left fully populated, on failure it is restored to its entry state.
/// Pre-set board cells are copied through and never searched. Recursion
/// depth is bounded by `size² + size`, and no frame allocates.
pub fn color_g_seq(puzzle: &Puzzle, grid: &mut Grid, row: usize, col: usize) -> bool {
    let size = puzzle.size();

    if row >= size {
        return true;
    }
    if col >= size {
        return color_g_seq(puzzle, grid, row + 1, 0);
    }

    if !puzzle.is_empty_cell(row, col) {
        grid.set(row, col, puzzle.board(row, col));
        return color_g_seq(puzzle, grid, row, col + 1);
    }

    for i in 0..puzzle.candidates().len(row, col) {
        let color = puzzle.candidates().cell(row, col)[i];
        if safe(puzzle, row, col, grid, color) {
            grid.set(row, col, color);
            if color_g_seq(puzzle, grid, row, col + 1) {
                return true;
            }
            grid.set(row, col, EMPTY);
        }
    }

    false
}

/// Solve from the top of the board on a grid seeded with the givens.
///
/// Convenience wrapper used by every "fall back to sequential" path.
pub fn solve_sequential(puzzle: &Puzzle) -> Option<Grid> {
    let mut grid = puzzle.seeded_grid();
    if color_g_seq(puzzle, &mut grid, 0, 0) {
        Some(grid)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ineq;
    use crate::propagation::compute_candidates;

    fn prepared(mut p: Puzzle) -> Puzzle {
        compute_candidates(&mut p, true);
        p
    }

    #[test]
    fn test_trivial_1x1() {
        let p = prepared(Puzzle::new(1));
        let grid = solve_sequential(&p).expect("1x1 must solve");
        assert_eq!(grid.get(0, 0), 1);
    }

    #[test]
    fn test_fully_given_board_is_copied() {
        let mut p = Puzzle::new(2);
        p.set_board(0, 0, 1);
        p.set_board(0, 1, 2);
        p.set_board(1, 0, 2);
        p.set_board(1, 1, 1);
        let p = prepared(p);
        let grid = solve_sequential(&p).expect("given board must solve");
        for r in 0..2 {
            for c in 0..2 {
                assert_eq!(grid.get(r, c), p.board(r, c));
            }
        }
    }

    #[test]
    fn test_latin_square_constraints_hold() {
        let p = prepared(Puzzle::new(4));
        let grid = solve_sequential(&p).expect("blank 4x4 must solve");
        for r in 0..4 {
            for c in 0..4 {
                let v = grid.get(r, c);
                assert!((1..=4).contains(&v));
                for i in 0..4 {
                    assert!(i == c || grid.get(r, i) != v);
                    assert!(i == r || grid.get(i, c) != v);
                }
            }
        }
    }

    #[test]
    fn test_inequalities_steer_the_search() {
        // Force the first row of a 3x3 to be ascending.
        let mut p = Puzzle::new(3);
        p.set_h_cons(0, 0, Ineq::Smaller);
        p.set_h_cons(0, 1, Ineq::Smaller);
        let p = prepared(p);
        let grid = solve_sequential(&p).expect("must solve");
        assert!(grid.get(0, 0) < grid.get(0, 1));
        assert!(grid.get(0, 1) < grid.get(0, 2));
    }

    #[test]
    fn test_unsolvable_returns_false_and_restores_grid() {
        // Duplicate givens in a row make the puzzle unsolvable.
        let mut p = Puzzle::new(3);
        p.set_board(0, 0, 1);
        p.set_board(0, 1, 1);
        let p = prepared(p);
        assert!(solve_sequential(&p).is_none());
    }

    #[test]
    fn test_reentrant_from_mid_board() {
        // Fix the entire first row by hand, then ask the solver to finish
        // from (1, 0). The first row must survive untouched.
        let p = prepared(Puzzle::new(3));
        let mut grid = p.seeded_grid();
        grid.set(0, 0, 2);
        grid.set(0, 1, 3);
        grid.set(0, 2, 1);
        assert!(color_g_seq(&p, &mut grid, 1, 0));
        assert_eq!(grid.get(0, 0), 2);
        assert_eq!(grid.get(0, 1), 3);
        assert_eq!(grid.get(0, 2), 1);
        assert!(grid.is_complete());
    }
}
