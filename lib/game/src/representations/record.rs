//! # record.rs
//!
//! Implements the move log and its text encoding.
//!
//! The log is an append-only sequence of entries and the single source of
//! truth for whose turn it is, who won and whether a draw offer is pending.
//! Those answers are cached and updated on every append instead of being
//! re-derived from the text each time.
//!
//! Entries are written as semicolon-terminated records:
//!
//! ```text
//! fromX,fromY:toX,toY:dead1,dead2,...:outcome[:newType]
//! ```
//!
//! where `outcome` is empty, `won`, `lost` or `draw`. The draw protocol
//! tokens `offer_draw`, `accept_draw`, `reject_draw` and the automatic
//! `draw` stand alone in place of a record.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use lazy_static::lazy_static;
use regex::Regex;
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::{
    constants::*,
    representations::{
        piece::PieceId,
        position::{Orientation, Position},
    },
};

lazy_static! {
    static ref RECORD_PATTERN: Regex = Regex::new(
        concat!(
            r"^(-?\d+,-?\d+):(-?\d+,-?\d+):((?:\d+(?:,\d+)*)?):",
            r"(won|lost|draw)?(?::([A-Za-z_][A-Za-z0-9_]*))?$"
        )
    ).unwrap();
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid tile id `{0}`")]
    Tile(String),
    #[error("record `{0}` is missing its origin or destination")]
    Incomplete(String),
    #[error("malformed record `{0}`")]
    Malformed(String),
    #[error("`{0}` cannot follow the previous entry")]
    OutOfSequence(String),
    #[error("`{0}` is not a move the rules allow")]
    Illegal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    Won,
    Lost,
    Draw,
}

impl Outcome {
    pub fn tag(self) -> &'static str {
        match self {
            Outcome::None => "",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Draw => DRAW,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "" => Some(Outcome::None),
            "won" => Some(Outcome::Won),
            "lost" => Some(Outcome::Lost),
            DRAW => Some(Outcome::Draw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    pub casualties: Vec<PieceId>,
    pub outcome: Outcome,
    pub promotion: Option<String>,
}

impl MoveRecord {
    pub fn new(from: Position, to: Position) -> Self {
        MoveRecord {
            from,
            to,
            casualties: Vec::new(),
            outcome: Outcome::None,
            promotion: None,
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let casualties = self
            .casualties
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        write!(
            f,
            "{}:{}:{}:{}",
            self.from,
            self.to,
            casualties,
            self.outcome.tag()
        )?;

        if let Some(promotion) = &self.promotion {
            write!(f, ":{promotion}")?;
        }

        Ok(())
    }
}

impl FromStr for MoveRecord {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let fields: Vec<&str> = s.split(':').collect();

        if fields.len() < 2 || fields[0].is_empty() || fields[1].is_empty() {
            return Err(RecordError::Incomplete(s.to_string()));
        }

        let cap = RECORD_PATTERN
            .captures(s)
            .ok_or_else(|| RecordError::Malformed(s.to_string()))?;

        let casualties = cap[3]
            .split(',')
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse()
                    .map_err(|_| RecordError::Malformed(s.to_string()))
            })
            .collect::<Result<Vec<PieceId>, _>>()?;

        let outcome = Outcome::from_tag(cap.get(4).map_or("", |m| m.as_str()))
            .ok_or_else(|| RecordError::Malformed(s.to_string()))?;

        Ok(MoveRecord {
            from: cap[1].parse()?,
            to: cap[2].parse()?,
            casualties,
            outcome,
            promotion: cap.get(5).map(|m| m.as_str().to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Move(MoveRecord),
    OfferDraw,
    AcceptDraw,
    RejectDraw,
    Draw,                                                                       /* Offer granted by the quiet rule    */
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Move(record) => write!(f, "{record}"),
            LogEntry::OfferDraw => write!(f, "{OFFER_DRAW}"),
            LogEntry::AcceptDraw => write!(f, "{ACCEPT_DRAW}"),
            LogEntry::RejectDraw => write!(f, "{REJECT_DRAW}"),
            LogEntry::Draw => write!(f, "{DRAW}"),
        }
    }
}

impl FromStr for LogEntry {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            OFFER_DRAW => Ok(LogEntry::OfferDraw),
            ACCEPT_DRAW => Ok(LogEntry::AcceptDraw),
            REJECT_DRAW => Ok(LogEntry::RejectDraw),
            DRAW => Ok(LogEntry::Draw),
            record => Ok(LogEntry::Move(record.parse()?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    Open,
    DrawPending,
    Decided(Orientation),                                                       /* Winning side                       */
    Drawn,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveLog {
    entries: Vec<LogEntry>,
    status: GameStatus,
    quiet_moves: usize,
}

impl MoveLog {
    pub fn new() -> Self {
        MoveLog::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Side to act next: even log length means `Up`, odd means `Down`.
    #[inline(always)]
    pub fn turn(&self) -> Orientation {
        if self.entries.len() % 2 == 0 {
            Orientation::Up
        } else {
            Orientation::Down
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// `0` while undecided, otherwise the sign of the winning side.
    pub fn winner(&self) -> i32 {
        match self.status {
            GameStatus::Decided(side) => side.sign(),
            _ => 0,
        }
    }

    pub fn draw_pending(&self) -> bool {
        self.status == GameStatus::DrawPending
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, GameStatus::Decided(_) | GameStatus::Drawn)
    }

    /// Trailing run of move records without casualties.
    pub fn quiet_moves(&self) -> usize {
        self.quiet_moves
    }

    /// Whether `entry` may be appended in the current state.
    pub fn admits(&self, entry: &LogEntry) -> bool {
        match (self.status, entry) {
            (GameStatus::Open, LogEntry::Move(_)) => true,
            (GameStatus::Open, LogEntry::OfferDraw) => true,
            (GameStatus::Open, LogEntry::Draw) => {
                self.quiet_moves >= QUIET_DRAW_WINDOW
            }
            (GameStatus::DrawPending, LogEntry::AcceptDraw) => true,
            (GameStatus::DrawPending, LogEntry::RejectDraw) => true,
            _ => false,
        }
    }

    /// Appends an entry and updates the cached turn, winner and draw state.
    ///
    /// # Panics
    ///
    /// Panics if the entry is not admitted in the current state.
    pub fn push(&mut self, entry: LogEntry) {
        assert!(
            self.admits(&entry),
            "Log entry `{entry}` cannot follow status {:?}",
            self.status
        );

        let mover = self.turn();

        self.status = match &entry {
            LogEntry::Move(record) => {
                if record.casualties.is_empty() {
                    self.quiet_moves += 1;
                } else {
                    self.quiet_moves = 0;
                }

                match record.outcome {
                    Outcome::None => GameStatus::Open,
                    Outcome::Won => GameStatus::Decided(mover),
                    Outcome::Lost => GameStatus::Decided(mover.opposite()),
                    Outcome::Draw => GameStatus::Drawn,
                }
            }
            LogEntry::OfferDraw => GameStatus::DrawPending,
            LogEntry::RejectDraw => GameStatus::Open,
            LogEntry::AcceptDraw | LogEntry::Draw => GameStatus::Drawn,
        };

        self.entries.push(entry);
    }
}

impl fmt::Display for MoveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{entry};")?;
        }

        Ok(())
    }
}

impl FromStr for MoveLog {
    type Err = RecordError;

    /// Rebuilds a log from its text, replaying every entry so that the
    /// cached state matches a log built move by move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut log = MoveLog::new();

        for token in s.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let entry: LogEntry = token.parse()?;

            if !log.admits(&entry) {
                return Err(RecordError::OutOfSequence(token.to_string()));
            }

            log.push(entry);
        }

        Ok(log)
    }
}
