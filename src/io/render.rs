// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pretty-printing of boards and solutions.

use std::fmt::Write as _;

use crate::model::{Grid, Ineq, Puzzle};

/// Render a solution grid with the puzzle's inequality glyphs
/// interleaved, in the same layout the parser accepts.
pub fn render_board(puzzle: &Puzzle, grid: &Grid) -> String {
    let size = puzzle.size();
    let mut out = String::new();

    for row in 0..size {
        for col in 0..size {
            let _ = write!(out, "{:2}", grid.get(row, col));
            if col < size - 1 {
                out.push_str(match puzzle.h_cons(row, col) {
                    Ineq::Greater => " > ",
                    Ineq::Smaller => " < ",
                    Ineq::None => "   ",
                });
            }
        }
        out.push('\n');

        if row < size - 1 {
            for col in 0..size {
                out.push(' ');
                out.push(match puzzle.v_cons(row, col) {
                    Ineq::Greater => 'v',
                    Ineq::Smaller => '^',
                    Ineq::None => ' ',
                });
                if col < size - 1 {
                    out.push_str("   ");
                }
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_board_layout() {
        let mut p = Puzzle::new(2);
        p.set_h_cons(0, 0, Ineq::Smaller);
        p.set_v_cons(0, 1, Ineq::Greater);
        let mut g = Grid::new(2);
        g.set(0, 0, 1);
        g.set(0, 1, 2);
        g.set(1, 0, 2);
        g.set(1, 1, 1);
        let text = render_board(&p, &g);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], " 1 <  2");
        assert_eq!(lines[1], "      v");
        assert_eq!(lines[2], " 2    1");
    }
}
