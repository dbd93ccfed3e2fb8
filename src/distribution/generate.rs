// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Work-unit materialization.
//!
//! Replays the backtracker's exact traversal (row-major cells, ascending
//! candidates, every placement gated by `safe`) down to the target
//! depth, and records each surviving prefix as a [`WorkUnit`]. Because
//! the traversal and ordering are identical to the search proper, the
//! emitted list is deterministic for a given puzzle and depth, and every
//! unit is safe by construction.

use log::{info, warn};

use crate::distribution::unit::{Assignment, WorkUnit};
use crate::model::{Grid, Puzzle, EMPTY};
use crate::propagation::safe;

/// Materialize every safe prefix of `depth` assignments, up to `cap`
/// units.
///
/// Pre-set cells are traversed but consume no depth. A prefix that
/// exhausts the board before reaching `depth` is emitted as-is (it may
/// already be a terminal solution prefix). When the cap is hit the list
/// is silently truncated apart from a single warning log.
pub fn generate_work_units(puzzle: &Puzzle, depth: usize, cap: usize) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    let mut grid = puzzle.seeded_grid();
    let mut assignments = Vec::with_capacity(depth);

    emit_units(
        puzzle,
        &mut grid,
        depth,
        &mut assignments,
        0,
        0,
        cap,
        &mut units,
    );

    info!("generated {} work units at depth {}", units.len(), depth);
    units
}

#[allow(clippy::too_many_arguments)]
fn emit_units(
    puzzle: &Puzzle,
    grid: &mut Grid,
    target_depth: usize,
    assignments: &mut Vec<Assignment>,
    mut row: usize,
    mut col: usize,
    cap: usize,
    units: &mut Vec<WorkUnit>,
) {
    if units.len() >= cap {
        return;
    }

    let size = puzzle.size();

    // Advance to the next cell that is open both on the board and in the
    // scratch grid (cells assigned earlier in this prefix are filled in
    // the grid but empty on the board).
    while row < size {
        if col >= size {
            row += 1;
            col = 0;
            continue;
        }
        if puzzle.is_empty_cell(row, col) && grid.is_empty(row, col) {
            break;
        }
        col += 1;
    }

    if assignments.len() >= target_depth || row >= size {
        units.push(WorkUnit::new(assignments.clone()));
        if units.len() == cap {
            warn!("work unit cap reached ({cap} units); truncating the list");
        }
        return;
    }

    for i in 0..puzzle.candidates().len(row, col) {
        let color = puzzle.candidates().cell(row, col)[i];
        if safe(puzzle, row, col, grid, color) {
            grid.set(row, col, color);
            assignments.push(Assignment {
                row: row as u8,
                col: col as u8,
                color,
            });
            emit_units(
                puzzle,
                grid,
                target_depth,
                assignments,
                row,
                col + 1,
                cap,
                units,
            );
            assignments.pop();
            grid.set(row, col, EMPTY);
        }
    }
}
