//! # bitboard.rs
//!
//! Defines an occupancy bitboard sized to the playing area.
//!
//! Each side keeps one `Bitboard` with a bit set for every tile it occupies.
//! The word is a `U4096`, so a board may hold at most 4096 tiles; the files
//! and ranks are carried along so that indices can be checked and turned back
//! into positions.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use bnum::types::U4096;
use std::ops::{BitAnd, BitOrAssign};

use crate::representations::position::{Bounds, Position};

#[derive(Debug, PartialEq, Clone)]
pub struct Bitboard {
    pub bounds: Bounds,
    pub bits: U4096,
}

impl Bitboard {
    pub fn new(bounds: Bounds) -> Bitboard {
        Bitboard {
            bounds,
            bits: U4096::ZERO,
        }
    }

    pub fn set(&mut self, position: Position) {
        assert!(
            self.bounds.contains(position),
            "Tile {position} out of bounds for a {}x{} board.",
            self.bounds.files,
            self.bounds.ranks
        );

        twiddling::set_bit(&mut self.bits, self.bounds.index(position));
    }

    pub fn clear(&mut self, position: Position) {
        assert!(
            self.bounds.contains(position),
            "Tile {position} out of bounds for a {}x{} board.",
            self.bounds.files,
            self.bounds.ranks
        );

        twiddling::clear_bit(&mut self.bits, self.bounds.index(position));
    }

    pub fn get(&self, position: Position) -> bool {
        self.bounds.contains(position)
            && twiddling::get_bit(&self.bits, self.bounds.index(position))
    }

    pub fn count(&self) -> u32 {
        twiddling::count_bits(&self.bits)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == U4096::ZERO
    }

    pub fn positions(&self) -> Vec<Position> {
        twiddling::bit_indices(&self.bits)
            .into_iter()
            .map(|index| self.bounds.position(index))
            .collect()
    }
}

impl BitOrAssign<&Bitboard> for Bitboard {
    fn bitor_assign(&mut self, rhs: &Bitboard) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for &Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard {
            bounds: self.bounds,
            bits: self.bits & rhs.bits,
        }
    }
}
