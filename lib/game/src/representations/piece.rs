//! # piece.rs
//!
//! Defines the piece record kept by the board's piece registry.
//!
//! A piece keeps its id for its whole lifetime. It is relocated by moves,
//! retyped by promotion and marked dead when it loses a combat, but it is
//! never removed from the registry, so log entries can always refer to it.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use crate::representations::position::{Orientation, Position};

pub type PieceId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Tile(Position),
    Off,                                                                        /* Lifted from the board, not killed  */
    Dead,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub piece_type: String,
    pub orientation: Orientation,
    pub location: Location,
}

impl Piece {
    pub fn new(
        id: PieceId,
        piece_type: &str,
        orientation: Orientation,
        position: Position,
    ) -> Self {
        Piece {
            id,
            piece_type: piece_type.to_string(),
            orientation,
            location: Location::Tile(position),
        }
    }

    #[inline(always)]
    pub fn position(&self) -> Option<Position> {
        match self.location {
            Location::Tile(position) => Some(position),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn is_dead(&self) -> bool {
        self.location == Location::Dead
    }

    pub fn is_opponent_of(&self, other: &Piece) -> bool {
        self.orientation != other.orientation
    }
}
