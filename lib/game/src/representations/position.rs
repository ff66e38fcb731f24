//! # position.rs
//!
//! Defines tile coordinates, board bounds and side orientation.
//!
//! A `Position` is a plain `(x, y)` pair. Whether it lies on the board is a
//! question for `Bounds`, which describes the closed range `[0, files - 1] x
//! [0, ranks - 1]`. An `Orientation` marks a side by the sign of its forward
//! direction: `Up` (+1) moves toward higher ranks, `Down` (-1) toward lower.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::{fmt, str::FromStr};

use crate::{
    constants::*,
    representations::record::RecordError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = RecordError;

    /// Parses the `x,y` tile id used by move tokens and log records.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| RecordError::Tile(s.to_string()))?;

        let x = x.trim().parse().map_err(|_| RecordError::Tile(s.to_string()))?;
        let y = y.trim().parse().map_err(|_| RecordError::Tile(s.to_string()))?;

        Ok(Position::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub files: i32,
    pub ranks: i32,
}

impl Bounds {
    pub fn new(files: i32, ranks: i32) -> Self {
        assert!(
            (1..=MAX_FILES).contains(&files),
            "Number of files {files} must lie in 1..={MAX_FILES}."
        );
        assert!(
            (1..=MAX_RANKS).contains(&ranks),
            "Number of ranks {ranks} must lie in 1..={MAX_RANKS}."
        );

        Bounds { files, ranks }
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.files).contains(&position.x)
            && (0..self.ranks).contains(&position.y)
    }

    pub fn tile_count(&self) -> usize {
        (self.files * self.ranks) as usize
    }

    /// Row-major bit index of an on-board tile.
    pub fn index(&self, position: Position) -> u32 {
        debug_assert!(self.contains(position), "{position} is off the board");
        (position.y * self.files + position.x) as u32
    }

    pub fn position(&self, index: u32) -> Position {
        let index = index as i32;
        Position::new(index % self.files, index / self.files)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::new(DEFAULT_FILES, DEFAULT_RANKS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Down,
}

impl Orientation {
    pub const BOTH: [Orientation; 2] = [Orientation::Up, Orientation::Down];

    #[inline(always)]
    pub fn sign(self) -> i32 {
        match self {
            Orientation::Up => 1,
            Orientation::Down => -1,
        }
    }

    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Orientation::Up),
            -1 => Some(Orientation::Down),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Orientation::Up => 0,
            Orientation::Down => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.sign())
    }
}
