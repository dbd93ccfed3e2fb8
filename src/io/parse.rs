// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The textual puzzle format.
//!
//! The grammar, by example (a 4×4 with two horizontal and one vertical
//! edge):
//!
//! ```text
//!  0 < 0   0   0
//!  v
//!  3   0   0   0
//!
//!  0   0   0   0
//!  0   0 > 0   0
//! ```
//!
//! - The board size is the count of numeric tokens in the first numeric
//!   row; `0` means empty.
//! - A `<` or `>` between two numbers on the same row is a horizontal
//!   inequality edge on that pair.
//! - A row without digits but with `^`, `v` or `V` characters is a
//!   vertical-edge row: each glyph binds to the column whose number (in
//!   the numeric row above) sits closest to the glyph's position.
//!   `v`/`V` means upper > lower, `^` means upper < lower.
//! - Blank lines and surrounding whitespace are ignored.

use std::fmt::Write as _;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::model::constants::N_MAX;
use crate::model::{Color, Ineq, Puzzle};

/// Largest puzzle file the reader accepts, in bytes. Far beyond any
/// legitimate `N_MAX` puzzle; purely a guard against feeding the parser
/// something that is not a puzzle.
pub const MAX_PUZZLE_FILE_BYTES: u64 = 16_384;

/// Input-layer failures. All are terminal: there is no recovery from a
/// bad puzzle file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read puzzle file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("puzzle file '{path}' is too large ({len} bytes, max {MAX_PUZZLE_FILE_BYTES})")]
    FileTooLarge { path: String, len: u64 },
    #[error("puzzle input contains no numeric rows")]
    EmptyInput,
    #[error("puzzle size {size} exceeds the supported maximum {N_MAX}")]
    SizeOutOfRange { size: usize },
    #[error("unparseable cell value in row {row}")]
    InvalidNumber { row: usize },
    #[error("cell value {value} in row {row} is outside 0..={size}")]
    ValueOutOfRange { row: usize, value: usize, size: usize },
}

/// Read and parse a puzzle file.
pub fn read_puzzle_from_file(path: impl AsRef<Path>) -> Result<Puzzle, ParseError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    debug!("reading puzzle file {shown}");

    let metadata = std::fs::metadata(path).map_err(|source| ParseError::Io {
        path: shown.clone(),
        source,
    })?;
    if metadata.len() > MAX_PUZZLE_FILE_BYTES {
        return Err(ParseError::FileTooLarge {
            path: shown,
            len: metadata.len(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: shown,
        source,
    })?;
    parse_puzzle(&content)
}

/// Parse puzzle text into a [`Puzzle`].
pub fn parse_puzzle(input: &str) -> Result<Puzzle, ParseError> {
    let size = infer_size(input)?;
    debug!("puzzle size inferred as {size}x{size}");

    let mut puzzle = Puzzle::new(size);
    // Byte position of each column's number in the most recent numeric
    // row; vertical-edge glyphs bind to the nearest of these.
    let mut number_positions = vec![0usize; size];
    let mut board_row = 0usize;

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let has_digits = line.bytes().any(|b| b.is_ascii_digit());
        if has_digits {
            if board_row >= size {
                warn!("ignoring extra numeric row beyond the {size} expected");
                continue;
            }
            parse_numeric_row(line, board_row, &mut puzzle, &mut number_positions)?;
            board_row += 1;
        } else if line.bytes().any(|b| matches!(b, b'v' | b'V' | b'^')) {
            if board_row == 0 || board_row >= size {
                warn!("ignoring vertical-edge row with no row pair to bind to");
                continue;
            }
            parse_vertical_row(line, board_row, &mut puzzle, &number_positions);
        }
    }

    Ok(puzzle)
}

/// The size is the count of numeric tokens in the first numeric row.
fn infer_size(input: &str) -> Result<usize, ParseError> {
    for line in input.lines() {
        let bytes = line.as_bytes();
        if !bytes.iter().any(|b| b.is_ascii_digit()) {
            continue;
        }
        let mut tokens = 0;
        let mut in_number = false;
        for &b in bytes {
            if b.is_ascii_digit() {
                if !in_number {
                    tokens += 1;
                }
                in_number = true;
            } else {
                in_number = false;
            }
        }
        if tokens > N_MAX {
            return Err(ParseError::SizeOutOfRange { size: tokens });
        }
        return Ok(tokens);
    }
    Err(ParseError::EmptyInput)
}

fn parse_numeric_row(
    line: &str,
    board_row: usize,
    puzzle: &mut Puzzle,
    number_positions: &mut [usize],
) -> Result<(), ParseError> {
    let size = puzzle.size();
    let bytes = line.as_bytes();
    let mut col = 0;
    let mut i = 0;

    while i < bytes.len() && col < size {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        number_positions[col] = start;

        let value: usize = line[start..i]
            .parse()
            .map_err(|_| ParseError::InvalidNumber { row: board_row })?;
        if value > size {
            return Err(ParseError::ValueOutOfRange {
                row: board_row,
                value,
                size,
            });
        }
        puzzle.set_board(board_row, col, value as Color);

        // An inequality sign may follow the number, separated by spaces.
        if col < size - 1 {
            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < bytes.len() {
                match bytes[j] {
                    b'>' => puzzle.set_h_cons(board_row, col, Ineq::Greater),
                    b'<' => puzzle.set_h_cons(board_row, col, Ineq::Smaller),
                    _ => {}
                }
            }
        }
        col += 1;
    }

    Ok(())
}

fn parse_vertical_row(
    line: &str,
    board_row: usize,
    puzzle: &mut Puzzle,
    number_positions: &[usize],
) {
    let size = puzzle.size();
    for (i, b) in line.bytes().enumerate() {
        let cons = match b {
            b'v' | b'V' => Ineq::Greater,
            b'^' => Ineq::Smaller,
            _ => continue,
        };

        let mut best_col = 0;
        let mut best_dist = number_positions[0].abs_diff(i);
        for (col, &pos) in number_positions.iter().enumerate().take(size).skip(1) {
            let dist = pos.abs_diff(i);
            if dist < best_dist {
                best_dist = dist;
                best_col = col;
            }
        }
        puzzle.set_v_cons(board_row - 1, best_col, cons);
    }
}

/// Render a puzzle's givens back to the textual format. Primarily a
/// debugging aid; the output re-parses to the same puzzle.
pub fn render_puzzle(puzzle: &Puzzle) -> String {
    let size = puzzle.size();
    let mut out = String::new();
    for row in 0..size {
        for col in 0..size {
            let _ = write!(out, "{:2}", puzzle.board(row, col));
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
    fn test_size_inference_counts_tokens_not_digits() {
        // Multi-digit numbers are single tokens.
        assert_eq!(infer_size("10 0 3 0 0 0 0 0 0 0").unwrap(), 10);
        assert_eq!(infer_size("1").unwrap(), 1);
        assert!(matches!(infer_size(""), Err(ParseError::EmptyInput)));
        assert!(matches!(infer_size("^ v <"), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_minimal_1x1() {
        let p = parse_puzzle("1").unwrap();
        assert_eq!(p.size(), 1);
        assert_eq!(p.board(0, 0), 1);
    }

    #[test]
    fn test_horizontal_edges() {
        let p = parse_puzzle("0 < 2   0\n0   0 > 0\n0   0   0\n").unwrap();
        assert_eq!(p.size(), 3);
        assert_eq!(p.board(0, 1), 2);
        assert_eq!(p.h_cons(0, 0), Ineq::Smaller);
        assert_eq!(p.h_cons(0, 1), Ineq::None);
        assert_eq!(p.h_cons(1, 1), Ineq::Greater);
    }

    #[test]
    fn test_vertical_edges_bind_to_nearest_column() {
        let input = " 0   0   0\n v       ^\n 0   0   0\n 0   0   0\n";
        let p = parse_puzzle(input).unwrap();
        assert_eq!(p.v_cons(0, 0), Ineq::Greater);
        assert_eq!(p.v_cons(0, 2), Ineq::Smaller);
        assert_eq!(p.v_cons(0, 1), Ineq::None);
        assert_eq!(p.v_cons(1, 0), Ineq::None);
    }

    #[test]
    fn test_capital_v_binds_too() {
        let input = "0 0\nV\n0 0\n";
        let p = parse_puzzle(input).unwrap();
        assert_eq!(p.v_cons(0, 0), Ineq::Greater);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let input = "\n\n0 0\n\n0 0\n\n";
        let p = parse_puzzle(input).unwrap();
        assert_eq!(p.size(), 2);
        assert_eq!(p.empty_cell_count(), 4);
    }

    #[test]
    fn test_leading_vertical_row_ignored() {
        // A vertical row before any numeric row has nothing to bind to.
        let p = parse_puzzle("v v\n0 0\n0 0\n").unwrap();
        assert_eq!(p.v_cons(0, 0), Ineq::None);
    }

    #[test]
    fn test_value_out_of_range_rejected() {
        let err = parse_puzzle("0 5\n0 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::ValueOutOfRange { row: 0, value: 5, size: 2 }
        ));
    }

    #[test]
    fn test_render_round_trips() {
        let mut p = Puzzle::new(3);
        p.set_board(0, 0, 2);
        p.set_h_cons(0, 1, Ineq::Smaller);
        p.set_v_cons(1, 2, Ineq::Greater);
        let rendered = render_puzzle(&p);
        let reparsed = parse_puzzle(&rendered).unwrap();
        assert_eq!(reparsed.size(), 3);
        assert_eq!(reparsed.board(0, 0), 2);
        assert_eq!(reparsed.h_cons(0, 1), Ineq::Smaller);
        assert_eq!(reparsed.v_cons(1, 2), Ineq::Greater);
    }
}
