// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Work units: safe partial-solution prefixes.
//!
//! A [`WorkUnit`] is a sequence of `(row, col, color)` assignments taken
//! in the backtracker's visit order. Applying the assignments to a fresh
//! board yields the root of an independent subtree of the search space;
//! the unit's continuation point says where the backtracker picks up.
//!
//! Units cross the process boundary in cluster mode, so they have a
//! fixed-size wire encoding: one depth word followed by `3·N_MAX`
//! assignment words, always [`UNIT_WIRE_WORDS`] `i32`s regardless of the
//! actual depth. Fixed framing keeps the transport a single contiguous
//! buffer on every build.

use std::fmt;

use crate::model::constants::{UNIT_WIRE_WORDS, N_MAX};
use crate::model::{Color, Grid, Puzzle};

/// One cell assignment inside a work unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub row: u8,
    pub col: u8,
    pub color: Color,
}

/// A safe partial solution delimiting an independent sub-problem.
///
/// `depth == 0` means "start from the top of the board", the unit a
/// single-process run implicitly works on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkUnit {
    assignments: Vec<Assignment>,
}

impl WorkUnit {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        debug_assert!(assignments.len() <= N_MAX);
        Self { assignments }
    }

    /// Number of assignments in the unit.
    pub fn depth(&self) -> usize {
        self.assignments.len()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The assignments as plain `(row, col, color)` triples.
    pub fn triples(&self) -> Vec<(usize, usize, Color)> {
        self.assignments
            .iter()
            .map(|a| (a.row as usize, a.col as usize, a.color))
            .collect()
    }

    /// A grid seeded with the puzzle's givens plus this unit's
    /// assignments. Every task and worker starts from one of these.
    pub fn apply(&self, puzzle: &Puzzle) -> Grid {
        let mut grid = puzzle.seeded_grid();
        for a in &self.assignments {
            grid.set(a.row as usize, a.col as usize, a.color);
        }
        grid
    }

    /// Where the backtracker resumes after this unit's assignments.
    ///
    /// Strict row-major: the cell after the last assignment. A column of
    /// `size` is fine; the backtracker's row-advance case absorbs it.
    pub fn continuation(&self) -> (usize, usize) {
        match self.assignments.last() {
            Some(last) => (last.row as usize, last.col as usize + 1),
            None => (0, 0),
        }
    }

    /// Fixed-size wire encoding: `[depth, r0, c0, v0, r1, c1, v1, ...]`
    /// padded with zeros to [`UNIT_WIRE_WORDS`] words.
    pub fn encode(&self) -> Vec<i32> {
        let mut words = vec![0i32; UNIT_WIRE_WORDS];
        words[0] = self.assignments.len() as i32;
        for (i, a) in self.assignments.iter().enumerate() {
            words[1 + i * 3] = a.row as i32;
            words[1 + i * 3 + 1] = a.col as i32;
            words[1 + i * 3 + 2] = a.color as i32;
        }
        words
    }

    /// Decode a wire frame. Returns `None` on a malformed frame (wrong
    /// length, impossible depth, out-of-range coordinates).
    pub fn decode(words: &[i32]) -> Option<Self> {
        if words.len() != UNIT_WIRE_WORDS {
            return None;
        }
        let depth = usize::try_from(words[0]).ok()?;
        if depth > N_MAX {
            return None;
        }
        let mut assignments = Vec::with_capacity(depth);
        for i in 0..depth {
            let row = u8::try_from(words[1 + i * 3]).ok()?;
            let col = u8::try_from(words[1 + i * 3 + 1]).ok()?;
            let color = u8::try_from(words[1 + i * 3 + 2]).ok()?;
            if row as usize >= N_MAX || col as usize >= N_MAX {
                return None;
            }
            assignments.push(Assignment { row, col, color });
        }
        Some(Self { assignments })
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth={}", self.depth())?;
        for a in &self.assignments {
            write!(f, " ({},{},{})", a.row, a.col, a.color)?;
        }
        Ok(())
    }
}
