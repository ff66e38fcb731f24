//! # constants.rs
//!
//! Defines engine-wide limits and default configuration values.
//!
//! The probability presets below are only the built-in fallbacks; a game
//! configuration can override every one of them.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

pub const MAX_FILES: i32 = 64;
pub const MAX_RANKS: i32 = 64;

pub const DEFAULT_FILES: i32 = 8;
pub const DEFAULT_RANKS: i32 = 8;

pub const RNG_SEED: u64 = 0xDEADBEEFCAFEBABE;

pub const STRONG_PROBABILITY: f64 = 0.9;
pub const WEAK_PROBABILITY: f64 = 0.2;
pub const DEFAULT_PROBABILITY: f64 = 0.75;

pub const MAX_RULE_DEPTH: usize = 8;                                            /* Nesting cap for compound rules     */
pub const QUIET_DRAW_WINDOW: usize = 140;                                       /* Casualty-free half-moves for draw  */

pub const UNBOUNDED: u32 = 0;

pub const OFFER_DRAW: &str = "offer_draw";
pub const ACCEPT_DRAW: &str = "accept_draw";
pub const REJECT_DRAW: &str = "reject_draw";
pub const DRAW: &str = "draw";

pub const ROYAL_TYPE: &str = "king";
