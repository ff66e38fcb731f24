//! # piece_io.rs
//!
//! Implements piece type formatting functions.
//!
//! This file formats the piece types of a configuration into tables with
//! Unicode box-drawing characters, and lists their movement rules in rule
//! notation.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use game::{Catalog, Orientation};

use crate::game_io::{Config, PieceKind};

/// Widest piece name a config may declare.
pub const PIECE_WIDTH: usize = 12;

const HEADERS: [&str; 7] = [
    "Name",
    "Up",
    "Down",
    "Royal",
    "Promote",
    "Rules",
    "Promo From",
];

/// Formats a piece type as a column of 7 rows:
/// - Row 0: Name
/// - Row 1: Symbol for the upward side (`-` if it has none)
/// - Row 2: Symbol for the downward side
/// - Row 3: Royal status (`*` if royal)
/// - Row 4: Promotion ability (`*` if it may promote)
/// - Row 5: Number of rules
/// - Row 6: Placeholder for "promoted from", filled in by the table
pub fn format_piece(kind: &PieceKind, catalog: &Catalog) -> String {
    let symbol = |orientation| {
        kind.symbol(orientation)
            .map_or("-".to_string(), |c| c.to_string())
    };

    let rows = [
        kind.name.clone(),
        symbol(Orientation::Up),
        symbol(Orientation::Down),
        if kind.royal { "*" } else { "" }.to_string(),
        if kind.promotes { "*" } else { "" }.to_string(),
        catalog.rules_for(&kind.name).len().to_string(),
        "-".to_string(),
    ];

    let mut result = String::new();
    result.push_str(&format!("┌{}┐\n", "─".repeat(PIECE_WIDTH + 2)));

    for row in rows {
        result.push_str(&format!("│ {:^PIECE_WIDTH$} │\n", row));
    }

    result.push_str(&format!("└{}┘", "─".repeat(PIECE_WIDTH + 2)));

    result
}

/// Formats all piece types of a config as tables of up to 6 types each.
pub fn format_piece_types(config: &Config) -> String {
    const HEADER_WIDTH: usize = 10;
    const PIECES_PER_TABLE: usize = 6;

    let rule = |left: char, middle: char, right: char, fill: &str, n: usize| {
        let mut line = String::new();
        line.push(left);
        line.push_str(&fill.repeat(HEADER_WIDTH + 2));
        for _ in 0..n {
            line.push(middle);
            line.push_str(&fill.repeat(PIECE_WIDTH + 2));
        }
        line.push(right);
        line.push('\n');
        line
    };

    let mut result = String::new();

    for kinds in config.kinds.chunks(PIECES_PER_TABLE) {
        let columns: Vec<Vec<String>> = kinds
            .iter()
            .map(|kind| {
                let formatted = format_piece(kind, &config.catalog);
                let mut column: Vec<String> = formatted
                    .lines()
                    .skip(1)
                    .take(HEADERS.len())
                    .map(|line| {
                        line.trim_start_matches("│ ")
                            .trim_end_matches(" │")
                            .to_string()
                    })
                    .collect();

                let sources: String = config
                    .kinds
                    .iter()
                    .filter(|other| {
                        promotes_into(other, kind, &config.catalog)
                    })
                    .filter_map(|other| other.symbol(Orientation::Up))
                    .collect();

                if !sources.is_empty() {
                    column[HEADERS.len() - 1] =
                        format!("{:^PIECE_WIDTH$}", sources);
                }

                column
            })
            .collect();

        result.push_str(&rule('╔', '╤', '╗', "═", kinds.len()));

        for (row, header) in HEADERS.iter().enumerate() {
            result.push_str(&format!("║ {header:<HEADER_WIDTH$} "));
            for column in &columns {
                result.push_str(&format!("│ {} ", column[row]));
            }
            result.push_str("║\n");

            if row < HEADERS.len() - 1 {
                result.push_str(&rule('╟', '┼', '╢', "─", kinds.len()));
            }
        }

        result.push_str(&rule('╚', '╧', '╝', "═", kinds.len()));
    }

    result
}

fn promotes_into(
    from: &PieceKind,
    into: &PieceKind,
    catalog: &Catalog,
) -> bool {
    catalog
        .promotions(&from.name)
        .iter()
        .any(|promotion| promotion.into.contains(&into.name))
}

/// Every piece type followed by its rules in notation, one rule per line.
pub fn format_rules(config: &Config) -> String {
    let mut result = String::new();

    for kind in &config.kinds {
        result.push_str(&format!("{}:\n", kind.name));
        for rule in config.catalog.rules_for(&kind.name) {
            result.push_str(&format!("    {rule}\n"));
        }
    }

    result
}
