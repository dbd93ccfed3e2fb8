// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint checking and pre-coloring.
//!
//! [`rules`] holds the three pure predicates every worker evaluates during
//! search; [`fixpoint`] iterates them into the pre-coloring pass that
//! narrows candidate lists before any search begins.

pub mod fixpoint;
pub mod rules;

pub use fixpoint::compute_candidates;
pub use rules::{has_valid_neighbor, safe, satisfies_inequalities};
