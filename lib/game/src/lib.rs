//! # lib.rs
//!
//! Probabilistic move-rule engine for chess-like games.
//!
//! Pieces move according to declarative rules (a direction, a step range, a
//! collision policy and a probability schedule) that can be chained into
//! compound rules. Captures are not certain: every contested tile on a walk
//! is resolved by a roll against the rule's schedule, and the attacker may
//! die instead of the defender.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

pub mod representations {
    pub mod position;
    pub mod piece;
    pub mod bitboard;
    pub mod board;
    pub mod record;
}

pub mod moves {
    pub mod direction;
    pub mod schedule;
    pub mod walk;
    pub mod rule;
    pub mod rule_parse;
    pub mod catalog;
    pub mod random;
    pub mod resolver;
}

pub mod constants;

pub use moves::{
    catalog::{Catalog, Destination, Presets, PromotionRule},
    direction::{Collision, Direction},
    random::{seeded, RandomSource, ScriptedRolls},
    resolver::{Game, MoveRequest},
    rule::{Compound, Primitive, Rule, RuleError, Steps},
    rule_parse::{parse_rule, parse_rules, NotationError},
    schedule::Schedule,
    walk::{Walk, WalkTile},
};
pub use representations::{
    board::{Board, TileContent},
    piece::{Location, Piece, PieceId},
    position::{Bounds, Orientation, Position},
    record::{
        GameStatus, LogEntry, MoveLog, MoveRecord, Outcome, RecordError,
    },
};

/// Shorthand for building a `Position`.
#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        $crate::representations::position::Position::new($x, $y)
    };
}
