// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The intra-node scheduler: one task per work unit on a thread pool.
//!
//! Cancellation is cooperative. Each task looks at the shared `found`
//! flag once, on entry; a task already inside the backtracker runs to
//! completion. Correctness does not depend on that early exit at all;
//! it only saves work. What correctness does depend on is the
//! publication protocol: a winning task takes the mutex, re-checks that
//! no other winner was recorded, and only then stores its grid and
//! raises the flag. The flag is written with release ordering inside the
//! critical section, so any task that observes it also observes the
//! completed grid.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use log::{debug, info};

use crate::distribution::{calibrate_depth, generate_work_units, target_tasks};
use crate::model::constants::WORK_UNIT_CAP;
use crate::model::{Grid, Puzzle};
use crate::runtime::SolverError;
use crate::solver::sequential::{color_g_seq, solve_sequential};
use crate::solver::stats::{Counter, Counters};

/// Tuning for the intra-node pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Worker thread count; `None` lets the pool pick its default (which
    /// honors `RAYON_NUM_THREADS`).
    pub threads: Option<usize>,
    /// Over-subscription factor: units targeted per thread.
    pub factor: f64,
    /// Cap forwarded to the work-unit enumerator.
    pub unit_cap: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            threads: None,
            factor: 4.0,
            unit_cap: WORK_UNIT_CAP,
        }
    }
}

/// Solve on a cooperative task pool, one task per work unit.
///
/// Falls back to the plain sequential solver when calibration reports
/// nothing to distribute or the enumerator comes back empty.
pub fn solve_pool(
    puzzle: &Puzzle,
    options: &PoolOptions,
    counters: &Counters,
) -> Result<Option<Grid>, SolverError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| SolverError::PoolBuild(e.to_string()))?;
    let threads = pool.current_num_threads();

    let target = target_tasks(threads, options.factor, "task pool");
    let depth = calibrate_depth(puzzle, target);
    if depth == 0 {
        info!("falling back to the sequential solver (nothing to distribute)");
        return Ok(solve_sequential(puzzle));
    }

    let units = generate_work_units(puzzle, depth, options.unit_cap);
    counters.add(Counter::UnitsGenerated, units.len() as u64);
    if units.is_empty() {
        info!("falling back to the sequential solver (no work units)");
        return Ok(solve_sequential(puzzle));
    }

    debug!("processing {} tasks on {} threads", units.len(), threads);

    let found = AtomicBool::new(false);
    let winner: Mutex<Option<Grid>> = Mutex::new(None);

    pool.scope(|scope| {
        for unit in &units {
            counters.increment(Counter::TasksSpawned);
            let found = &found;
            let winner = &winner;
            scope.spawn(move |_| {
                // Advisory early exit; see the module docs.
                if !found.load(Ordering::Acquire) {
                    let mut grid = unit.apply(puzzle);
                    let (row, col) = unit.continuation();
                    if color_g_seq(puzzle, &mut grid, row, col) {
                        counters.increment(Counter::SolutionsFound);
                        let mut slot = winner.lock().unwrap_or_else(PoisonError::into_inner);
                        // Re-check under the lock: first winner wins.
                        if slot.is_none() {
                            *slot = Some(grid);
                            found.store(true, Ordering::Release);
                        }
                    }
                }
                counters.increment(Counter::TasksCompleted);
            });
        }
    });

    Ok(winner.into_inner().unwrap_or_else(PoisonError::into_inner))
}
