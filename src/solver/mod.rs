// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The sequential search core and solve accounting.

pub mod sequential;
pub mod stats;
pub mod verify;

pub use sequential::{color_g_seq, solve_sequential};
pub use stats::{Counter, Counters, SolverStats};
pub use verify::{verify_solution, Violation};
