// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Parallel solver for N×N Futoshiki puzzles.
//!
//! Futoshiki is Latin-square completion with inequality edges between
//! adjacent cells. The solving algorithm is ordinary backtracking over
//! pre-narrowed candidate lists; the interesting machinery is the
//! two-tier work-distribution runtime wrapped around it.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: the puzzle (immutable)
//!
//! The [`Puzzle`](model::Puzzle) (board, inequality edges, and per-cell
//! candidate lists) is fixed after the pre-coloring pass and shared
//! read-only by every worker.
//!
//! ## Tier 2: solution grids (mutable)
//!
//! Each task or worker owns a private [`Grid`](model::Grid) seeded from
//! the board. No search state is ever shared between concurrent
//! searches; the only cross-worker traffic is the found-flag/winner pair
//! (intra-node) or tagged messages (inter-node).
//!
//! # Solve pipeline
//!
//! 1. [`propagation`] narrows candidate lists to a fixed point.
//! 2. [`distribution`] picks a cut depth for the target task count and
//!    materializes the safe prefixes at that depth as work units.
//! 3. A [`runtime`] drives the units: the intra-node task pool, the
//!    inter-node master/worker exchange, or the hybrid of the two. Every
//!    unit bottoms out in the sequential backtracker in [`solver`].
//!
//! Degenerate inputs (nothing to distribute, a single rank) fall back
//! down the ladder until plain sequential search remains.
//!
//! # Example
//!
//! ```
//! use futoshiki_search::io::parse_puzzle;
//! use futoshiki_search::runtime::{solve, Mode, SolveOptions};
//!
//! let mut puzzle = parse_puzzle("0 < 0\n0   0\n").unwrap();
//! let report = solve(
//!     &mut puzzle,
//!     &SolveOptions {
//!         mode: Mode::Sequential,
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//! assert!(report.stats.found_solution);
//! let grid = report.solution.unwrap();
//! assert!(grid.get(0, 0) < grid.get(0, 1));
//! ```

pub mod distribution;
pub mod io;
pub mod model;
pub mod propagation;
pub mod runtime;
pub mod solver;

// Re-export the types that make up the public solving surface.
pub use model::{Grid, Puzzle};
pub use runtime::{solve, Mode, SolveOptions, SolveReport, SolverError};
pub use solver::{SolverStats, Counters};
