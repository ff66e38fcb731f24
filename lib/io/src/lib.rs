//! # lib.rs
//!
//! Reading game configurations and drawing games for the terminal.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

pub mod board_io;
pub mod game_io;
pub mod piece_io;

pub use game_io::{
    parse_config, parse_config_file, standard_config, Config, ConfigError,
    PieceKind, Placement,
};
