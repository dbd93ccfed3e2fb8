// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Depth calibration: how deep to cut the search tree into work units.
//!
//! The calibrator never materializes anything. It counts the exact number
//! of safe prefixes of length `d` over the first `d` empty cells, for
//! `d = 1, 2, …`, and stops at the first depth whose count exceeds the
//! task target. Counting is strictly cheaper than materializing, and the
//! over-subscription target gives the schedulers load-balance slack
//! without drowning them in units.

use log::{debug, info, warn};

use crate::model::constants::max_enumeration_depth;
use crate::model::{Grid, Puzzle, EMPTY};
use crate::propagation::safe;

/// The number of work units a scheduler should aim for, given its worker
/// count and over-subscription factor.
///
/// At least one unit is always targeted, and a factor of one or more
/// guarantees at least one unit per worker.
pub fn target_tasks(num_workers: usize, factor: f64, scheduler: &str) -> usize {
    let workers = num_workers.max(1);
    let mut target = (workers as f64 * factor).ceil() as usize;
    if factor >= 1.0 && target < workers {
        target = workers;
    }
    if target < 1 {
        target = 1;
    }
    info!("{scheduler} task target: {workers} workers x {factor:.2} factor = {target} tasks");
    target
}

/// All empty cells of the board in row-major order.
pub fn find_empty_cells(puzzle: &Puzzle) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for row in 0..puzzle.size() {
        for col in 0..puzzle.size() {
            if puzzle.is_empty_cell(row, col) {
                cells.push((row, col));
            }
        }
    }
    cells
}

/// Count safe prefixes of length `target_depth` over `empty_cells`,
/// starting at `cell_idx` with `grid` reflecting the assignments made so
/// far. Pure enumeration, no materialization.
pub fn count_safe_prefixes(
    puzzle: &Puzzle,
    grid: &mut Grid,
    empty_cells: &[(usize, usize)],
    cell_idx: usize,
    target_depth: usize,
) -> u64 {
    if cell_idx >= target_depth || cell_idx >= empty_cells.len() {
        return 1;
    }

    let (row, col) = empty_cells[cell_idx];
    let mut count = 0;
    for i in 0..puzzle.candidates().len(row, col) {
        let color = puzzle.candidates().cell(row, col)[i];
        if safe(puzzle, row, col, grid, color) {
            grid.set(row, col, color);
            count += count_safe_prefixes(puzzle, grid, empty_cells, cell_idx + 1, target_depth);
            grid.set(row, col, EMPTY);
        }
    }
    count
}

/// Choose the distribution depth for a task target.
///
/// Returns the smallest depth whose prefix count exceeds `target`, capped
/// at `min(empty cells, max_enumeration_depth(size))`. Returns 0 when the
/// board has no empty cells, meaning nothing to distribute.
pub fn calibrate_depth(puzzle: &Puzzle, target: usize) -> usize {
    let empty_cells = find_empty_cells(puzzle);
    if empty_cells.is_empty() {
        debug!("no empty cells; nothing to distribute");
        return 0;
    }

    let max_depth = max_enumeration_depth(puzzle.size()).min(empty_cells.len());
    let mut grid = puzzle.seeded_grid();
    let mut chosen = 0;
    let mut prefix_count = 0;

    for depth in 1..=max_depth {
        prefix_count = count_safe_prefixes(puzzle, &mut grid, &empty_cells, 0, depth);
        debug!("depth {depth}: {prefix_count} safe prefixes");
        chosen = depth;
        if prefix_count as usize > target {
            break;
        }
    }

    if prefix_count == 0 {
        warn!("no safe prefixes at any depth; puzzle is likely unsolvable");
    }
    info!("chosen distribution depth {chosen} ({prefix_count} work units)");
    chosen
}
