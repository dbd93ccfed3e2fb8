// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Scheduling runtimes and the solve entry point.
//!
//! Three runtimes share the same work-distribution pipeline and the same
//! sequential core:
//!
//! - [`pool`], intra-node: one task per work unit on a thread pool,
//!   cooperating through a found-flag and a mutexed winner slot;
//! - [`exchange`] over [`cluster`], inter-node: a master arbitrating
//!   unit assignment to message-passing workers;
//! - the hybrid composition, which is the exchange with the pool plugged in as
//!   each worker's engine.
//!
//! [`solve`] is the single entry point: it times the pre-coloring pass,
//! dispatches to the selected runtime, and assembles the
//! [`SolverStats`](crate::solver::SolverStats) record. There is no global
//! state anywhere in the crate; everything a runtime needs arrives as an
//! explicit argument.

pub mod cluster;
pub mod exchange;
pub mod pool;

use std::time::Instant;

use log::{log_enabled, trace, Level};
use thiserror::Error;

use crate::model::constants::WORK_UNIT_CAP;
use crate::model::{Grid, Puzzle};
use crate::propagation::compute_candidates;
use crate::solver::sequential::solve_sequential;
use crate::solver::stats::{Counters, SolverStats};

pub use cluster::{Cluster, Message, SingletonCluster};
pub use exchange::{solve_cluster, ClusterOptions, WorkerEngine};
pub use pool::{solve_pool, PoolOptions};

/// Fatal scheduler faults. Recoverable situations (no units, degenerate
/// worker counts) never surface here; they fall back to a simpler
/// runtime instead.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to build the task pool: {0}")]
    PoolBuild(String),
    #[error("cluster channel to rank {rank} closed unexpectedly")]
    Disconnected { rank: usize },
    #[error("malformed cluster frame from rank {rank}")]
    MalformedFrame { rank: usize },
    #[error("unexpected protocol message involving rank {rank}")]
    Protocol { rank: usize },
    #[error("a cluster rank panicked")]
    RankPanicked,
}

/// Which runtime drives the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain backtracking, no distribution.
    Sequential,
    /// Intra-node task pool.
    Threads,
    /// Inter-node master/worker exchange with sequential workers.
    Cluster,
    /// Master/worker exchange with a task pool inside each worker.
    Hybrid,
}

/// Everything a solve needs beyond the puzzle itself.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub mode: Mode,
    /// Run the pre-coloring pass (disabled by the CLI's `-n`).
    pub use_precoloring: bool,
    /// Intra-node thread count; `None` defers to the pool default.
    pub threads: Option<usize>,
    /// Task-multiplier factor for the intra-node tier.
    pub pool_factor: f64,
    /// Task-multiplier factor for the inter-node tier.
    pub master_factor: f64,
    /// Worker rank count for the inter-node tiers.
    pub workers: usize,
    /// Work-unit cap forwarded to the enumerator.
    pub unit_cap: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Threads,
            use_precoloring: true,
            threads: None,
            pool_factor: 4.0,
            master_factor: 1.0,
            workers: 4,
            unit_cap: WORK_UNIT_CAP,
        }
    }
}

/// The outcome of one solve.
#[derive(Debug)]
pub struct SolveReport {
    pub stats: SolverStats,
    pub solution: Option<Grid>,
    pub counters: Counters,
}

/// Run the full solve: pre-color, dispatch to the selected runtime,
/// assemble statistics.
pub fn solve(puzzle: &mut Puzzle, options: &SolveOptions) -> Result<SolveReport, SolverError> {
    let counters = Counters::new();
    let solve_start = Instant::now();

    let pre_color_start = Instant::now();
    let colors_removed = compute_candidates(puzzle, options.use_precoloring);
    let pre_color_seconds = pre_color_start.elapsed().as_secs_f64();

    if log_enabled!(Level::Trace) {
        for row in 0..puzzle.size() {
            for col in 0..puzzle.size() {
                trace!("cell [{row}][{col}]: {:?}", puzzle.candidates().cell(row, col));
            }
        }
    }

    let coloring_start = Instant::now();
    let solution = match options.mode {
        Mode::Sequential => solve_sequential(puzzle),
        Mode::Threads => {
            let pool_options = PoolOptions {
                threads: options.threads,
                factor: options.pool_factor,
                unit_cap: options.unit_cap,
            };
            solve_pool(puzzle, &pool_options, &counters)?
        }
        Mode::Cluster => {
            let cluster_options = ClusterOptions {
                workers: options.workers,
                factor: options.master_factor,
                unit_cap: options.unit_cap,
                engine: WorkerEngine::Sequential,
            };
            solve_cluster(puzzle, &cluster_options, &counters)?
        }
        Mode::Hybrid => {
            let cluster_options = ClusterOptions {
                workers: options.workers,
                factor: options.master_factor,
                unit_cap: options.unit_cap,
                engine: WorkerEngine::Pool(PoolOptions {
                    threads: options.threads,
                    factor: options.pool_factor,
                    unit_cap: options.unit_cap,
                }),
            };
            solve_cluster(puzzle, &cluster_options, &counters)?
        }
    };
    let coloring_seconds = coloring_start.elapsed().as_secs_f64();

    let size = puzzle.size();
    let stats = SolverStats {
        pre_color_seconds,
        coloring_seconds,
        total_seconds: solve_start.elapsed().as_secs_f64(),
        colors_removed,
        remaining_colors: puzzle.candidates().total(),
        total_processed: (size * size * size) as u64,
        found_solution: solution.is_some(),
    };

    Ok(SolveReport {
        stats,
        solution,
        counters,
    })
}
