//! # game_io.rs
//!
//! Implements configuration parsing and game state formatting.
//!
//! A configuration file declares the board size, the probability presets,
//! every piece type with its symbols and movement rules, promotions and the
//! starting layout. The parsed `Config` builds boards and games, and the
//! formatting functions here turn a running game into terminal text.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use log::debug;
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;

use game::{
    constants::*, Board, Bounds, Catalog, Game, GameStatus, LogEntry,
    MoveLog, NotationError, Orientation, Position, Presets, PromotionRule,
    RandomSource,
};

use crate::{board_io::format_board, piece_io::PIECE_WIDTH};

/// Default 8x8 configuration with the standard layout.
pub const STANDARD_CONFIG: &str =
    include_str!("../../../configs/standard.mess");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config ends before the {0}")]
    Missing(&'static str),
    #[error("invalid dimensions line `{0}`")]
    Dimensions(String),
    #[error("invalid preset `{0}`")]
    Preset(String),
    #[error("invalid piece definition `{0}`")]
    Piece(String),
    #[error("invalid rules for `{piece}`")]
    Rules {
        piece: String,
        #[source]
        source: NotationError,
    },
    #[error("invalid promotion `{0}`")]
    Promotion(String),
    #[error("invalid promotion ranks `{0}`")]
    Ranks(String),
    #[error("invalid layout: {0}")]
    Layout(String),
    #[error("unexpected line `{0}` after the layout")]
    Trailing(String),
}

/// A piece type as declared in a config: its name, the symbol drawn for
/// each side, and its flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceKind {
    pub name: String,
    pub symbols: [Option<char>; 2],                                             /* Indexed by orientation             */
    pub royal: bool,
    pub promotes: bool,
}

impl PieceKind {
    pub fn symbol(&self, orientation: Orientation) -> Option<char> {
        self.symbols[orientation.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub piece_type: &'a str,
    pub position: Position,
    pub orientation: Orientation,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub bounds: Bounds,
    pub kinds: Vec<PieceKind>,
    pub catalog: Catalog,
    layout: Vec<(usize, Position, Orientation)>,                                /* Kind index, tile, side             */
}

impl Config {
    pub fn kind(&self, piece_type: &str) -> Option<&PieceKind> {
        self.kinds.iter().find(|kind| kind.name == piece_type)
    }

    /// Symbol of a piece type for one side, `?` for types the config does
    /// not declare.
    pub fn symbol(&self, piece_type: &str, orientation: Orientation) -> char {
        self.kind(piece_type)
            .and_then(|kind| kind.symbol(orientation))
            .unwrap_or('?')
    }

    pub fn layout(&self) -> impl Iterator<Item = Placement<'_>> {
        self.layout
            .iter()
            .map(|&(kind, position, orientation)| Placement {
                piece_type: &self.kinds[kind].name,
                position,
                orientation,
            })
    }

    /// Fresh board holding the starting layout. Piece ids follow the layout
    /// order: top rank first, left to right.
    pub fn board(&self) -> Board {
        let mut board = Board::new(self.bounds);

        for placement in self.layout() {
            board.add_piece(
                placement.piece_type,
                placement.position,
                placement.orientation,
            );
        }

        board
    }

    pub fn game<R: RandomSource>(&self, rng: R) -> Game<R> {
        Game::new(self.board(), self.catalog.clone(), rng)
    }
}

/// Parsed form of `STANDARD_CONFIG`.
///
/// # Panics
///
/// Panics if the embedded configuration does not parse, which only a broken
/// build can cause.
pub fn standard_config() -> Config {
    parse_config(STANDARD_CONFIG).unwrap_or_else(|error| {
        panic!("Embedded standard config is invalid: {error}")
    })
}

pub fn parse_config_file(
    path: impl AsRef<Path>,
) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

    parse_config(&contents)
}

/// Parses a configuration.
///
/// Blank lines are skipped; every other line is read in this order:
/// - a title
/// - `files,ranks,piece_types`
/// - presets as `name=value` pairs separated by commas (may be partial)
/// - `piece_types` piece lines `[#][^]name,up_char,down_char,rules`, where
///   `#` marks a royal type, `^` a type that may promote, `_` stands for a
///   side without that piece, and `rules` is `|` separated rule notation
/// - a count `m` of promotion lines, then `m` lines `X->YZ..` of symbols
/// - promotion ranks `up_rank,down_rank`
/// - the layout: ranks from the top separated by `/`, digits for empty
///   tiles, symbols for pieces
///
/// # Examples
///
/// ```plaintext
/// Tiny
/// 4,4,2
/// weak=0.3
/// ^pawn,P,p,forward[1]=weak|diagonal_forward_left[1]
/// #king,K,k,forward[1]|backward[1]|left[1]|right[1]
/// 1
/// P->K
/// 3,0
/// k3/p3/3P/3K
/// ```
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let mut lines = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let title = next_line(&mut lines, "title")?.to_string();

    let dimensions = next_line(&mut lines, "dimensions line")?;
    let (bounds, type_count) = parse_dimensions(dimensions)?;

    let presets = parse_presets(next_line(&mut lines, "presets line")?)?;
    let mut catalog = Catalog::new(presets);

    let mut kinds: Vec<PieceKind> = Vec::with_capacity(type_count);
    let mut symbols: HashMap<char, (usize, Orientation)> = HashMap::new();

    for _ in 0..type_count {
        let line = next_line(&mut lines, "piece definitions")?;
        let (kind, rules) = parse_piece(line)?;

        if kinds.iter().any(|other| other.name == kind.name) {
            return Err(ConfigError::Piece(line.to_string()));
        }

        for orientation in Orientation::BOTH {
            let Some(symbol) = kind.symbol(orientation) else {
                continue;
            };
            if symbols
                .insert(symbol, (kinds.len(), orientation))
                .is_some()
            {
                return Err(ConfigError::Piece(line.to_string()));
            }
        }

        catalog
            .register_notation(&kind.name, rules)
            .map_err(|source| ConfigError::Rules {
                piece: kind.name.clone(),
                source,
            })?;
        kinds.push(kind);
    }

    catalog.set_royals(
        kinds
            .iter()
            .filter(|kind| kind.royal)
            .map(|kind| kind.name.as_str()),
    );

    let count = next_line(&mut lines, "promotion count")?;
    let count: usize = count
        .parse()
        .map_err(|_| ConfigError::Promotion(count.to_string()))?;

    let mut promotions: Vec<(usize, Vec<String>)> = Vec::with_capacity(count);
    for _ in 0..count {
        let line = next_line(&mut lines, "promotion lines")?;
        promotions.push(parse_promotion(line, &kinds, &symbols)?);
    }

    let ranks = next_line(&mut lines, "promotion ranks")?;
    let ranks = parse_promotion_ranks(ranks, bounds)?;

    for (from, into) in promotions {
        catalog.add_promotion(&kinds[from].name, PromotionRule { ranks, into });
    }

    let layout = parse_layout(
        next_line(&mut lines, "layout")?,
        bounds,
        &symbols,
    )?;

    if let Some(line) = lines.next() {
        return Err(ConfigError::Trailing(line.to_string()));
    }

    debug!(
        "Loaded config `{title}`: {}x{} board, {} piece types, {} pieces",
        bounds.files,
        bounds.ranks,
        kinds.len(),
        layout.len()
    );

    Ok(Config {
        title,
        bounds,
        kinds,
        catalog,
        layout,
    })
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<&'a str, ConfigError> {
    lines.next().ok_or(ConfigError::Missing(what))
}

fn parse_dimensions(line: &str) -> Result<(Bounds, usize), ConfigError> {
    let invalid = || ConfigError::Dimensions(line.to_string());

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [files, ranks, types] = parts.as_slice() else {
        return Err(invalid());
    };

    let files: i32 = files.parse().map_err(|_| invalid())?;
    let ranks: i32 = ranks.parse().map_err(|_| invalid())?;
    let types: usize = types.parse().map_err(|_| invalid())?;

    if !(1..=MAX_FILES).contains(&files)
        || !(1..=MAX_RANKS).contains(&ranks)
        || types == 0
    {
        return Err(invalid());
    }

    Ok((Bounds::new(files, ranks), types))
}

fn parse_presets(line: &str) -> Result<Presets, ConfigError> {
    let mut presets = Presets::default();

    for pair in line.split(',').map(str::trim) {
        let invalid = || ConfigError::Preset(pair.to_string());

        let (name, value) = pair.split_once('=').ok_or_else(invalid)?;
        let value: f64 = value.trim().parse().map_err(|_| invalid())?;

        if !(0.0..=1.0).contains(&value) || !presets.set(name.trim(), value) {
            return Err(invalid());
        }
    }

    Ok(presets)
}

fn parse_piece(line: &str) -> Result<(PieceKind, &str), ConfigError> {
    let invalid = || ConfigError::Piece(line.to_string());

    let parts: Vec<&str> = line.splitn(4, ',').map(str::trim).collect();
    let [raw_name, up, down, rules] = parts.as_slice() else {
        return Err(invalid());
    };

    let royal = raw_name.contains('#');
    let promotes = raw_name.contains('^');
    let name = raw_name.trim_start_matches(['#', '^']);

    if name.is_empty()
        || name.len() > PIECE_WIDTH
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(invalid());
    }

    let symbol = |text: &str| -> Result<Option<char>, ConfigError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some('_'), None) => Ok(None),
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Some(c)),
            _ => Err(invalid()),
        }
    };

    let kind = PieceKind {
        name: name.to_string(),
        symbols: [symbol(*up)?, symbol(*down)?],
        royal,
        promotes,
    };

    Ok((kind, *rules))
}

fn parse_promotion(
    line: &str,
    kinds: &[PieceKind],
    symbols: &HashMap<char, (usize, Orientation)>,
) -> Result<(usize, Vec<String>), ConfigError> {
    let invalid = || ConfigError::Promotion(line.to_string());

    let (from, into) = line.split_once("->").ok_or_else(invalid)?;

    let mut from_chars = from.trim().chars();
    let (Some(from), None) = (from_chars.next(), from_chars.next()) else {
        return Err(invalid());
    };
    let &(from, _) = symbols.get(&from).ok_or_else(invalid)?;

    if !kinds[from].promotes {
        return Err(invalid());
    }

    let mut targets: Vec<String> = Vec::new();
    for symbol in into.trim().chars() {
        let &(target, _) = symbols.get(&symbol).ok_or_else(invalid)?;
        let name = &kinds[target].name;
        if !targets.contains(name) {
            targets.push(name.clone());
        }
    }

    if targets.is_empty() {
        return Err(invalid());
    }

    Ok((from, targets))
}

fn parse_promotion_ranks(
    line: &str,
    bounds: Bounds,
) -> Result<[i32; 2], ConfigError> {
    let invalid = || ConfigError::Ranks(line.to_string());

    let (up, down) = line.split_once(',').ok_or_else(invalid)?;
    let up: i32 = up.trim().parse().map_err(|_| invalid())?;
    let down: i32 = down.trim().parse().map_err(|_| invalid())?;

    if !(0..bounds.ranks).contains(&up) || !(0..bounds.ranks).contains(&down) {
        return Err(invalid());
    }

    Ok([up, down])
}

/// Parses the layout line into placements. Ranks run from the top of the
/// board down, and a number of any length skips that many files.
fn parse_layout(
    line: &str,
    bounds: Bounds,
    symbols: &HashMap<char, (usize, Orientation)>,
) -> Result<Vec<(usize, Position, Orientation)>, ConfigError> {
    let rows: Vec<&str> = line.split('/').collect();

    if rows.len() != bounds.ranks as usize {
        return Err(ConfigError::Layout(format!(
            "{} ranks given, the board has {}",
            rows.len(),
            bounds.ranks
        )));
    }

    let mut layout = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let rank = bounds.ranks - 1 - row_index as i32;
        let mut file = 0;
        let mut chars = row.chars().peekable();

        while let Some(c) = chars.next() {
            if let Some(digit) = c.to_digit(10) {
                let mut skip = digit as i32;
                while let Some(next) = chars.peek().and_then(|n| n.to_digit(10))
                {
                    skip = skip * 10 + next as i32;
                    chars.next();
                }
                file += skip;
                continue;
            }

            let &(kind, orientation) = symbols.get(&c).ok_or_else(|| {
                ConfigError::Layout(format!("unknown piece symbol `{c}`"))
            })?;

            if file < bounds.files {
                layout.push((kind, Position::new(file, rank), orientation));
            }
            file += 1;
        }

        if file != bounds.files {
            return Err(ConfigError::Layout(format!(
                "rank {rank} spans {file} files, the board has {}",
                bounds.files
            )));
        }
    }

    Ok(layout)
}

pub fn side_name(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Up => "Up",
        Orientation::Down => "Down",
    }
}

pub fn format_status(status: GameStatus) -> String {
    match status {
        GameStatus::Open => "Open".to_string(),
        GameStatus::DrawPending => "Draw offered".to_string(),
        GameStatus::Decided(side) => format!("{} won", side_name(side)),
        GameStatus::Drawn => "Drawn".to_string(),
    }
}

/// Numbered log, one entry per line.
pub fn format_log(log: &MoveLog) -> String {
    let mut result = String::new();

    for (index, entry) in log.entries().iter().enumerate() {
        let note = match entry {
            LogEntry::Move(record) if !record.casualties.is_empty() => {
                format!("  ({} dead)", record.casualties.len())
            }
            _ => String::new(),
        };
        result.push_str(&format!("{:>4}. {entry}{note}\n", index + 1));
    }

    result
}

pub fn format_game_state<R: RandomSource>(
    game: &Game<R>,
    config: &Config,
    verbose: bool,
) -> String {
    let mut result = format_board(game.board(), config);

    if verbose {
        result.push_str(&format!("\nTitle\t\t: {}\n", config.title));
        result.push_str(&format!(
            "Current move\t: {}\n",
            side_name(game.turn())
        ));
        result.push_str(&format!(
            "Status\t\t: {}\n",
            format_status(game.status())
        ));
        result.push_str(&format!("Entries\t\t: {}\n", game.log().len()));
        result.push_str(&format!(
            "Quiet moves\t: {}/{}\n",
            game.log().quiet_moves(),
            QUIET_DRAW_WINDOW
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::{pos, MoveRecord, ScriptedRolls};

    const TINY: &str = "
        Tiny
        4,4,2
        weak=0.3
        ^pawn,P,p,forward[1]=weak|diagonal_forward_left[1]
        #king,K,k,forward[1]|backward[1]|left[1]|right[1]
        1
        P->K
        3,0
        k3/p3/3P/3K
    ";

    #[test]
    fn tiny_config_parses() {
        let config = parse_config(TINY).unwrap();

        assert_eq!(config.title, "Tiny");
        assert_eq!(config.bounds, Bounds::new(4, 4));
        assert_eq!(config.catalog.presets().weak, 0.3);
        assert_eq!(config.catalog.presets().strong, STRONG_PROBABILITY);
        assert!(config.catalog.is_royal("king"));
        assert!(!config.catalog.is_royal("pawn"));
        assert_eq!(
            config.catalog.promotion_options(
                "pawn",
                Orientation::Up,
                pos!(1, 3)
            ),
            vec!["king"]
        );

        let layout: Vec<Placement> = config.layout().collect();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout[0], Placement {
            piece_type: "king",
            position: pos!(0, 3),
            orientation: Orientation::Down,
        });
        assert_eq!(layout[3].position, pos!(3, 0));
        assert_eq!(config.symbol("pawn", Orientation::Up), 'P');
        assert_eq!(config.symbol("dragon", Orientation::Up), '?');
    }

    #[test]
    fn config_games_play() {
        let config = parse_config(TINY).unwrap();
        let mut game = config.game(ScriptedRolls::new([0.0]));

        assert!(game.execute_token("3,1:3,2"));
        assert_eq!(
            game.log().last(),
            Some(&LogEntry::Move(MoveRecord::new(pos!(3, 1), pos!(3, 2))))
        );
    }

    #[test]
    fn broken_configs_are_reported() {
        let broken = |from: &str, to: &str| {
            parse_config(&TINY.replacen(from, to, 1)).unwrap_err()
        };

        let dimensions = |to| broken("4,4,2", to);
        assert!(matches!(dimensions("4,4"), ConfigError::Dimensions(_)));
        assert!(matches!(dimensions("99,4,2"), ConfigError::Dimensions(_)));

        let preset = |to| broken("weak=0.3", to);
        assert!(matches!(preset("weak=3"), ConfigError::Preset(_)));
        assert!(matches!(preset("mighty=0.3"), ConfigError::Preset(_)));

        assert!(matches!(broken(",P,p,", ",PP,p,"), ConfigError::Piece(_)));
        assert!(matches!(broken(",K,k,", ",P,k,"), ConfigError::Piece(_)));
        assert!(matches!(
            broken("forward[1]=weak", "sideways"),
            ConfigError::Rules { .. }
        ));
        assert!(matches!(broken("P->K", "K->P"), ConfigError::Promotion(_)));
        assert!(matches!(broken("P->K", "P->Q"), ConfigError::Promotion(_)));
        assert!(matches!(broken("3,0", "4,0"), ConfigError::Ranks(_)));
        assert!(matches!(broken("k3/", "k4/"), ConfigError::Layout(_)));
        assert!(matches!(broken("k3/", "x3/"), ConfigError::Layout(_)));
        assert!(matches!(broken("k3/p3/", "k3/"), ConfigError::Layout(_)));
        assert!(matches!(
            broken("3K", "3K\nextra"),
            ConfigError::Trailing(_)
        ));
        assert!(matches!(
            parse_config("Only a title"),
            Err(ConfigError::Missing("dimensions line"))
        ));
    }

    #[test]
    fn missing_files_are_read_errors() {
        assert!(matches!(
            parse_config_file("/nonexistent/mess/config"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn logs_are_numbered() {
        let log: MoveLog = "0,1:0,3::;7,6:7,4:3:;offer_draw;".parse().unwrap();
        assert_eq!(
            format_log(&log),
            "   1. 0,1:0,3::\n   2. 7,6:7,4:3:  (1 dead)\n   3. offer_draw\n"
        );
    }
}
