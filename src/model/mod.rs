// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Core data model: the immutable puzzle and the mutable solution grid.

pub mod candidates;
pub mod constants;
pub mod grid;
pub mod puzzle;

pub use candidates::CandidateArena;
pub use constants::{Color, EMPTY, N_MAX};
pub use grid::Grid;
pub use puzzle::{Ineq, Puzzle};
