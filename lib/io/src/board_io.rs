//! # board_io.rs
//!
//! Implements board formatting and visualization functions.
//!
//! Boards are drawn with Unicode box-drawing characters. Ranks are labelled
//! on the left and files below, both with the zero-based coordinates used
//! by move tokens, so a tile reads off the drawing as `file,rank`.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use game::{
    representations::bitboard::Bitboard, Board, Bounds, Destination, Position,
};

use crate::game_io::Config;

fn format_grid(
    bounds: Bounds,
    symbol_at: impl Fn(Position) -> Option<char>,
) -> String {
    let files = bounds.files as usize;
    let mut result = String::new();

    result.push_str(&format!("   ╔{}═══╗\n", "═══╤".repeat(files - 1)));

    for rank in (0..bounds.ranks).rev() {
        let cells: Vec<String> = (0..bounds.files)
            .map(|file| {
                symbol_at(Position::new(file, rank))
                    .unwrap_or(' ')
                    .to_string()
            })
            .collect();

        result.push_str(&format!("{:02} ║ {} ║\n", rank, cells.join(" │ ")));

        if rank > 0 {
            result.push_str(&format!("   ╟{}───╢\n", "───┼".repeat(files - 1)));
        }
    }

    result.push_str(&format!("   ╚{}═══╝\n     ", "═══╧".repeat(files - 1)));

    for file in 0..bounds.files {
        result.push_str(&format!("{file:02}  "));
    }

    let mut result = result.trim_end().to_string();
    result.push('\n');

    result
}

/// Draws the tiles set in a bitboard with `mark`.
pub fn format_bitboard(bitboard: &Bitboard, mark: char) -> String {
    format_grid(bitboard.bounds, |position| {
        bitboard.get(position).then_some(mark)
    })
}

/// Draws every live piece with the symbol its config declares.
pub fn format_board(board: &Board, config: &Config) -> String {
    format_grid(board.bounds(), |position| {
        let id = board.id_at(position)?;
        let piece = board.piece_by_id(id);
        Some(config.symbol(&piece.piece_type, piece.orientation))
    })
}

/// Overlays two drawings of the same board. Where the first has a blank
/// the second shows through; everything else comes from the first.
pub fn combine_board_strings(board1: &str, board2: &str) -> String {
    board1
        .chars()
        .zip(board2.chars())
        .map(|(c1, c2)| if c1.is_whitespace() { c2 } else { c1 })
        .collect()
}

/// The board with every destination marked by `*`. Occupied destinations
/// keep the symbol of the piece standing there.
pub fn format_destinations(
    board: &Board,
    config: &Config,
    destinations: &[Destination],
) -> String {
    let mut marks = Bitboard::new(board.bounds());
    for destination in destinations {
        marks.set(destination.position);
    }

    combine_board_strings(
        &format_board(board, config),
        &format_bitboard(&marks, '*'),
    )
}
