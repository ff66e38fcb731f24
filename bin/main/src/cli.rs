//! # cli.rs
//!
//! Command line interface of the `mess` driver.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mess",
    version,
    about = "Chess-like games where every capture is a dice roll"
)]
pub struct Cli {
    /// Game configuration; falls back to `MESS_CONFIG_PATH`, then to the
    /// built-in standard game.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw the starting position.
    Show {
        #[arg(short, long)]
        verbose: bool,

        /// Also print the piece type table.
        #[arg(long)]
        pieces: bool,

        /// Also print every piece type's rules.
        #[arg(long)]
        rules: bool,
    },

    /// List where the piece on a tile may move.
    Moves {
        /// Tile as `x,y`.
        tile: String,

        /// Log to replay before looking, as `record;record;...;`.
        #[arg(long, default_value = "")]
        after: String,
    },

    /// Play move tokens (`fx,fy:tx,ty[:promotion]` or a draw literal) in
    /// order from the starting position.
    Play {
        tokens: Vec<String>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let both sides make random moves until the game ends.
    Playout {
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 400)]
        max_plies: usize,
    },
}
