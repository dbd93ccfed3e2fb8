// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Independent solution checking.
//!
//! Deliberately does not reuse the search-side `safe` predicate: a
//! checker that shares code with the solver would inherit its bugs. The
//! CLI's `--verify` flag runs this against the reported solution.

use std::fmt;

use crate::model::{Grid, Ineq, Puzzle, EMPTY};

/// The first constraint violation found in a claimed solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A cell is unfilled or outside `1..=size`.
    BadValue { row: usize, col: usize },
    /// A given cell does not hold its given value.
    GivenOverwritten { row: usize, col: usize },
    /// A color appears twice in a row.
    RowDuplicate { row: usize, color: u8 },
    /// A color appears twice in a column.
    ColumnDuplicate { col: usize, color: u8 },
    /// An inequality edge does not hold. `(row, col)` names the
    /// left/upper cell of the edge; `horizontal` says which direction.
    EdgeViolated { row: usize, col: usize, horizontal: bool },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BadValue { row, col } => {
                write!(f, "cell ({row},{col}) holds no legal color")
            }
            Violation::GivenOverwritten { row, col } => {
                write!(f, "given cell ({row},{col}) was overwritten")
            }
            Violation::RowDuplicate { row, color } => {
                write!(f, "color {color} repeats in row {row}")
            }
            Violation::ColumnDuplicate { col, color } => {
                write!(f, "color {color} repeats in column {col}")
            }
            Violation::EdgeViolated { row, col, horizontal } => {
                let direction = if *horizontal { "horizontal" } else { "vertical" };
                write!(f, "{direction} inequality at ({row},{col}) does not hold")
            }
        }
    }
}

/// Check a claimed solution against the puzzle. Returns the first
/// violation found, or `Ok(())` for a genuine solution.
pub fn verify_solution(puzzle: &Puzzle, grid: &Grid) -> Result<(), Violation> {
    let size = puzzle.size();

    for row in 0..size {
        for col in 0..size {
            let value = grid.get(row, col);
            if value == EMPTY || value as usize > size {
                return Err(Violation::BadValue { row, col });
            }
            if !puzzle.is_empty_cell(row, col) && value != puzzle.board(row, col) {
                return Err(Violation::GivenOverwritten { row, col });
            }
        }
    }

    // Row/column uniqueness via per-line seen masks.
    for i in 0..size {
        let mut row_seen = vec![false; size + 1];
        let mut col_seen = vec![false; size + 1];
        for j in 0..size {
            let row_value = grid.get(i, j) as usize;
            if row_seen[row_value] {
                return Err(Violation::RowDuplicate {
                    row: i,
                    color: row_value as u8,
                });
            }
            row_seen[row_value] = true;

            let col_value = grid.get(j, i) as usize;
            if col_seen[col_value] {
                return Err(Violation::ColumnDuplicate {
                    col: i,
                    color: col_value as u8,
                });
            }
            col_seen[col_value] = true;
        }
    }

    for row in 0..size {
        for col in 0..size - 1 {
            let holds = match puzzle.h_cons(row, col) {
                Ineq::Greater => grid.get(row, col) > grid.get(row, col + 1),
                Ineq::Smaller => grid.get(row, col) < grid.get(row, col + 1),
                Ineq::None => true,
            };
            if !holds {
                return Err(Violation::EdgeViolated {
                    row,
                    col,
                    horizontal: true,
                });
            }
        }
    }
    for row in 0..size - 1 {
        for col in 0..size {
            let holds = match puzzle.v_cons(row, col) {
                Ineq::Greater => grid.get(row, col) > grid.get(row + 1, col),
                Ineq::Smaller => grid.get(row, col) < grid.get(row + 1, col),
                Ineq::None => true,
            };
            if !holds {
                return Err(Violation::EdgeViolated {
                    row,
                    col,
                    horizontal: false,
                });
            }
        }
    }

    Ok(())
}
