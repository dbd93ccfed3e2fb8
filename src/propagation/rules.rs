// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The constraint kernel: three pure predicates over the puzzle.
//!
//! These are the only rules the solver knows. They deliberately do not
//! coordinate with one another: [`safe`] judges a placement against a
//! concrete partial grid, while [`satisfies_inequalities`] judges a
//! candidate against the *candidate lists* of its neighbors. Combining
//! them into a fixed point is the job of [`super::fixpoint`].

use crate::model::{Color, Grid, Ineq, Puzzle, EMPTY};

/// Can `color` legally be placed at `(row, col)` given the partial grid?
///
/// True iff:
/// - a pre-set board cell only accepts its own value;
/// - every inequality edge against an already-colored neighbor holds;
/// - no other cell in the same row or column already holds `color`.
pub fn safe(puzzle: &Puzzle, row: usize, col: usize, grid: &Grid, color: Color) -> bool {
    // A given cell admits exactly its given value.
    if !puzzle.is_empty_cell(row, col) {
        return puzzle.board(row, col) == color;
    }

    let size = puzzle.size();

    // Horizontal inequality edges against colored neighbors.
    if col > 0 {
        let left = grid.get(row, col - 1);
        if left != EMPTY {
            match puzzle.h_cons(row, col - 1) {
                Ineq::Greater if left <= color => return false,
                Ineq::Smaller if left >= color => return false,
                _ => {}
            }
        }
    }
    if col < size - 1 {
        let right = grid.get(row, col + 1);
        if right != EMPTY {
            match puzzle.h_cons(row, col) {
                Ineq::Greater if color <= right => return false,
                Ineq::Smaller if color >= right => return false,
                _ => {}
            }
        }
    }

    // Vertical inequality edges against colored neighbors.
    if row > 0 {
        let above = grid.get(row - 1, col);
        if above != EMPTY {
            match puzzle.v_cons(row - 1, col) {
                Ineq::Greater if above <= color => return false,
                Ineq::Smaller if above >= color => return false,
                _ => {}
            }
        }
    }
    if row < size - 1 {
        let below = grid.get(row + 1, col);
        if below != EMPTY {
            match puzzle.v_cons(row, col) {
                Ineq::Greater if color <= below => return false,
                Ineq::Smaller if color >= below => return false,
                _ => {}
            }
        }
    }

    // Row and column uniqueness.
    for i in 0..size {
        if i != col && grid.get(row, i) == color {
            return false;
        }
        if i != row && grid.get(i, col) == color {
            return false;
        }
    }

    true
}

/// Does the candidate list of `(row, col)` contain a value strictly
/// greater (or strictly smaller) than `color`?
///
/// This is the arc-consistency half-check used by
/// [`satisfies_inequalities`]: it asks whether the *neighbor* could still
/// satisfy an inequality edge against `color`.
pub fn has_valid_neighbor(
    puzzle: &Puzzle,
    row: usize,
    col: usize,
    color: Color,
    need_greater: bool,
) -> bool {
    puzzle.candidates().cell(row, col).iter().any(|&neighbor| {
        if need_greater {
            neighbor > color
        } else {
            neighbor < color
        }
    })
}

/// Could `color` at `(row, col)` coexist with each of the four inequality
/// edges, judged against the neighbors' current candidate lists?
pub fn satisfies_inequalities(puzzle: &Puzzle, row: usize, col: usize, color: Color) -> bool {
    let size = puzzle.size();

    if col > 0 {
        match puzzle.h_cons(row, col - 1) {
            // Left > current: the left cell needs a candidate above color.
            Ineq::Greater if !has_valid_neighbor(puzzle, row, col - 1, color, true) => {
                return false
            }
            Ineq::Smaller if !has_valid_neighbor(puzzle, row, col - 1, color, false) => {
                return false
            }
            _ => {}
        }
    }
    if col < size - 1 {
        match puzzle.h_cons(row, col) {
            // Current > right: the right cell needs a candidate below color.
            Ineq::Greater if !has_valid_neighbor(puzzle, row, col + 1, color, false) => {
                return false
            }
            Ineq::Smaller if !has_valid_neighbor(puzzle, row, col + 1, color, true) => {
                return false
            }
            _ => {}
        }
    }
    if row > 0 {
        match puzzle.v_cons(row - 1, col) {
            Ineq::Greater if !has_valid_neighbor(puzzle, row - 1, col, color, true) => {
                return false
            }
            Ineq::Smaller if !has_valid_neighbor(puzzle, row - 1, col, color, false) => {
                return false
            }
            _ => {}
        }
    }
    if row < size - 1 {
        match puzzle.v_cons(row, col) {
            Ineq::Greater if !has_valid_neighbor(puzzle, row + 1, col, color, false) => {
                return false
            }
            Ineq::Smaller if !has_valid_neighbor(puzzle, row + 1, col, color, true) => {
                return false
            }
            _ => {}
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_puzzle(size: usize) -> Puzzle {
        let mut p = Puzzle::new(size);
        p.candidates_mut().fill_all_colors();
        p
    }

    #[test]
    fn test_safe_rejects_row_and_column_duplicates() {
        let p = blank_puzzle(3);
        let mut g = Grid::new(3);
        g.set(0, 0, 2);
        assert!(!safe(&p, 0, 2, &g, 2)); // same row
        assert!(!safe(&p, 2, 0, &g, 2)); // same column
        assert!(safe(&p, 1, 1, &g, 2)); // different row and column
    }

    #[test]
    fn test_safe_honors_preset_cells() {
        let mut p = blank_puzzle(3);
        p.set_board(1, 1, 3);
        let g = Grid::new(3);
        assert!(safe(&p, 1, 1, &g, 3));
        assert!(!safe(&p, 1, 1, &g, 2));
    }

    #[test]
    fn test_safe_checks_horizontal_edges() {
        let mut p = blank_puzzle(3);
        // (0,0) > (0,1)
        p.set_h_cons(0, 0, Ineq::Greater);
        let mut g = Grid::new(3);
        g.set(0, 0, 2);
        assert!(safe(&p, 0, 1, &g, 1));
        assert!(!safe(&p, 0, 1, &g, 3));
        assert!(!safe(&p, 0, 1, &g, 2)); // equality also violates
    }

    #[test]
    fn test_safe_checks_vertical_edges_both_directions() {
        let mut p = blank_puzzle(3);
        // (0,1) < (1,1)
        p.set_v_cons(0, 1, Ineq::Smaller);
        let mut g = Grid::new(3);
        g.set(1, 1, 2);
        // Placing into the upper cell against the colored lower one.
        assert!(safe(&p, 0, 1, &g, 1));
        assert!(!safe(&p, 0, 1, &g, 3));
        g.clear(1, 1);
        g.set(0, 1, 1);
        // And the mirror: placing into the lower cell.
        assert!(safe(&p, 1, 1, &g, 2));
        assert!(!safe(&p, 1, 1, &g, 1));
    }

    #[test]
    fn test_safe_ignores_uncolored_neighbors() {
        let mut p = blank_puzzle(2);
        p.set_h_cons(0, 0, Ineq::Greater);
        let g = Grid::new(2);
        // Neighbor is EMPTY, the edge cannot be judged yet.
        assert!(safe(&p, 0, 1, &g, 2));
    }

    #[test]
    fn test_has_valid_neighbor() {
        let mut p = Puzzle::new(4);
        p.candidates_mut().set_cell(2, 2, &[2, 3]);
        assert!(has_valid_neighbor(&p, 2, 2, 2, true)); // 3 > 2
        assert!(!has_valid_neighbor(&p, 2, 2, 3, true)); // nothing above 3
        assert!(has_valid_neighbor(&p, 2, 2, 3, false)); // 2 < 3
        assert!(!has_valid_neighbor(&p, 2, 2, 2, false)); // nothing below 2
    }

    #[test]
    fn test_satisfies_inequalities_prunes_extremes() {
        let mut p = blank_puzzle(3);
        // (0,0) > (0,1): color 1 at (0,0) leaves the neighbor no smaller
        // candidate; color 3 at (0,1) leaves the left no greater one.
        p.set_h_cons(0, 0, Ineq::Greater);
        assert!(!satisfies_inequalities(&p, 0, 0, 1));
        assert!(satisfies_inequalities(&p, 0, 0, 2));
        assert!(!satisfies_inequalities(&p, 0, 1, 3));
        assert!(satisfies_inequalities(&p, 0, 1, 2));
    }

    #[test]
    fn test_satisfies_inequalities_reads_narrowed_lists() {
        let mut p = blank_puzzle(3);
        p.set_v_cons(0, 0, Ineq::Smaller); // (0,0) < (1,0)
        p.candidates_mut().set_cell(1, 0, &[1, 2]);
        // (0,0) = 2 would need the lower cell to exceed 2; its list tops
        // out at 2, so the candidate dies.
        assert!(!satisfies_inequalities(&p, 0, 0, 2));
        assert!(satisfies_inequalities(&p, 0, 0, 1));
    }
}
