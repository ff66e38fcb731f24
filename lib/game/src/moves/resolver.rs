//! # resolver.rs
//!
//! Implements the game: move resolution, combat and the draw protocol.
//!
//! A move attempt runs as one transition. The request is checked against the
//! game status, the turn and the catalog; the matching rule's walk is then
//! fought tile by tile, and only after every roll is known are the board and
//! the log written. A rejected request leaves everything untouched and is
//! reported as `false`.
//!
//! Every contested tile is one roll: below the attacker's chance the
//! defender dies and the walk goes on, otherwise the attacker dies where it
//! stands and the walk ends.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use regex::Regex;
use std::{fmt, str::FromStr};

use crate::{
    constants::*,
    moves::{
        catalog::{Catalog, Destination},
        random::RandomSource,
        rule::Rule,
        walk::Walk,
    },
    representations::{
        board::Board,
        piece::PieceId,
        position::{Orientation, Position},
        record::{
            GameStatus, LogEntry, MoveLog, MoveRecord, Outcome, RecordError,
        },
    },
};

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(
        r"^(-?\d+,-?\d+):(-?\d+,-?\d+)(?::([A-Za-z_][A-Za-z0-9_]*)?)?$"
    ).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequest {
    Move {
        from: Position,
        to: Position,
        promotion: Option<String>,
    },
    OfferDraw,
    AcceptDraw,
    RejectDraw,
}

impl MoveRequest {
    pub fn new(from: Position, to: Position) -> Self {
        MoveRequest::Move {
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(from: Position, to: Position, into: &str) -> Self {
        MoveRequest::Move {
            from,
            to,
            promotion: Some(into.to_string()),
        }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRequest::Move {
                from,
                to,
                promotion: Some(into),
            } => write!(f, "{from}:{to}:{into}"),
            MoveRequest::Move { from, to, .. } => write!(f, "{from}:{to}"),
            MoveRequest::OfferDraw => write!(f, "{OFFER_DRAW}"),
            MoveRequest::AcceptDraw => write!(f, "{ACCEPT_DRAW}"),
            MoveRequest::RejectDraw => write!(f, "{REJECT_DRAW}"),
        }
    }
}

impl FromStr for MoveRequest {
    type Err = RecordError;

    /// Parses `fx,fy:tx,ty[:promotion]` or one of the draw tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        match s {
            OFFER_DRAW => return Ok(MoveRequest::OfferDraw),
            ACCEPT_DRAW => return Ok(MoveRequest::AcceptDraw),
            REJECT_DRAW => return Ok(MoveRequest::RejectDraw),
            _ => {}
        }

        let fields: Vec<&str> = s.split(':').collect();

        if fields.len() < 2 || fields[0].is_empty() || fields[1].is_empty() {
            return Err(RecordError::Incomplete(s.to_string()));
        }

        let cap = TOKEN_PATTERN
            .captures(s)
            .ok_or_else(|| RecordError::Malformed(s.to_string()))?;

        Ok(MoveRequest::Move {
            from: cap[1].parse()?,
            to: cap[2].parse()?,
            promotion: cap.get(3).map(|m| m.as_str().to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Game<R: RandomSource = StdRng> {
    board: Board,
    catalog: Catalog,
    log: MoveLog,
    rng: R,
}

impl<R: RandomSource> Game<R> {
    /// Starts a game on a set-up board.
    ///
    /// # Panics
    ///
    /// Panics if a piece on the board has a type without rules.
    pub fn new(board: Board, catalog: Catalog, rng: R) -> Self {
        for piece in board.live_pieces() {
            catalog.rules_for(&piece.piece_type);
        }

        Game {
            board,
            catalog,
            log: MoveLog::new(),
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn turn(&self) -> Orientation {
        self.log.turn()
    }

    pub fn status(&self) -> GameStatus {
        self.log.status()
    }

    /// `0` while undecided, `1` or `-1` for the winning side.
    pub fn winner(&self) -> i32 {
        self.log.winner()
    }

    pub fn draw_pending(&self) -> bool {
        self.log.draw_pending()
    }

    /// # Panics
    ///
    /// Panics if the type has no rules or the tile is taken or off the
    /// board.
    pub fn add_piece(
        &mut self,
        piece_type: &str,
        position: Position,
        orientation: Orientation,
    ) -> PieceId {
        self.catalog.rules_for(piece_type);
        self.board.add_piece(piece_type, position, orientation)
    }

    pub fn add_rule(&mut self, piece_type: &str, rule: Rule) {
        self.catalog.register(piece_type, rule);
    }

    /// Whether the piece's rules allow the move on the current board. Turn
    /// and game status are not considered; see `turn` and `status`.
    pub fn is_legal(&self, piece: PieceId, to: Position) -> bool {
        let piece = self.board.piece_by_id(piece);
        piece.position().is_some()
            && self.catalog.is_legal(&self.board, piece, to)
    }

    pub fn legal_destinations(&self, piece: PieceId) -> Vec<Destination> {
        let piece = self.board.piece_by_id(piece);

        if piece.position().is_none() {
            return Vec::new();
        }

        self.catalog.legal_destinations(&self.board, piece)
    }

    /// Every move the side to act could make right now.
    pub fn legal_moves(&self) -> Vec<(PieceId, Destination)> {
        if self.log.status() != GameStatus::Open {
            return Vec::new();
        }

        let side = self.log.turn();

        self.board
            .live_pieces()
            .filter(|piece| piece.orientation == side)
            .flat_map(|piece| {
                self.catalog
                    .legal_destinations(&self.board, piece)
                    .into_iter()
                    .map(move |destination| (piece.id, destination))
            })
            .collect()
    }

    /// Moves a piece by id.
    pub fn move_piece(
        &mut self,
        piece: PieceId,
        to: Position,
        promotion: Option<&str>,
    ) -> bool {
        let Some(from) = self.board.tile_of(piece) else {
            debug!("Rejected move of piece {piece}: it is not on the board");
            return false;
        };

        self.execute(MoveRequest::Move {
            from,
            to,
            promotion: promotion.map(str::to_string),
        })
    }

    pub fn execute_token(&mut self, token: &str) -> bool {
        match token.parse::<MoveRequest>() {
            Ok(request) => self.execute(request),
            Err(err) => {
                debug!("Rejected token `{token}`: {err}");
                false
            }
        }
    }

    /// Applies a request. Returns `true` if it was applied, including a move
    /// in which the mover itself died.
    pub fn execute(&mut self, request: MoveRequest) -> bool {
        match request {
            MoveRequest::Move {
                from,
                to,
                promotion,
            } => self.execute_move(from, to, promotion),
            MoveRequest::OfferDraw if self.log.admits(&LogEntry::Draw) => {
                self.append_control(LogEntry::Draw)
            }                                                                   /* Quiet game, granted outright       */
            MoveRequest::OfferDraw => self.append_control(LogEntry::OfferDraw),
            MoveRequest::AcceptDraw => {
                self.append_control(LogEntry::AcceptDraw)
            }
            MoveRequest::RejectDraw => {
                self.append_control(LogEntry::RejectDraw)
            }
        }
    }

    /// Replays a recorded log onto the current position without rolling.
    ///
    /// Each move must be allowed by the rules and its casualties must be a
    /// possible result of its walk. Replay stops at the first entry that
    /// does not fit; entries before it stay applied.
    pub fn replay(&mut self, log: &MoveLog) -> Result<(), RecordError> {
        for entry in log.entries() {
            match entry {
                LogEntry::Move(record) => self.replay_move(record)?,
                control => {
                    if !self.append_control(control.clone()) {
                        return Err(RecordError::OutOfSequence(
                            control.to_string(),
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    fn execute_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<String>,
    ) -> bool {
        let Some((mover, walk)) = self.plan(from, to) else {
            return false;
        };

        let casualties = self.fight(mover, &walk);
        let record = self.commit(mover, from, to, casualties, promotion);

        self.push_move(record);
        true
    }

    fn replay_move(&mut self, record: &MoveRecord) -> Result<(), RecordError> {
        let illegal = || RecordError::Illegal(record.to_string());

        let (mover, walk) =
            self.plan(record.from, record.to).ok_or_else(illegal)?;
        let contested: Vec<PieceId> =
            walk.contests().map(|(id, _)| id).collect();

        let consistent = record.casualties == contested
            || matches!(
                record.casualties.split_last(),
                Some((&last, won)) if last == mover
                    && won.len() < contested.len()
                    && contested.starts_with(won)
            );

        if !consistent
            || self.outcome(mover, &record.casualties) != record.outcome
        {
            return Err(illegal());
        }

        if let Some(choice) = &record.promotion {
            let piece = self.board.piece_by_id(mover);
            let options = self.catalog.promotion_options(
                &piece.piece_type,
                piece.orientation,
                record.to,
            );

            if record.casualties.contains(&mover)
                || !options.contains(choice)
                || !self.catalog.knows(choice)
            {
                return Err(illegal());
            }
        }

        let record = self.commit(
            mover,
            record.from,
            record.to,
            record.casualties.clone(),
            record.promotion.clone(),
        );

        self.push_move(record);
        Ok(())
    }

    /// Checks a move without touching anything and returns the mover and the
    /// matching rule's walk.
    fn plan(&self, from: Position, to: Position) -> Option<(PieceId, Walk)> {
        if self.log.status() != GameStatus::Open {
            debug!("Rejected {from}:{to}: game is {:?}", self.log.status());
            return None;
        }

        let Some(id) = self.board.id_at(from) else {
            debug!("Rejected {from}:{to}: no piece on {from}");
            return None;
        };

        let piece = self.board.piece_by_id(id);

        if piece.orientation != self.log.turn() {
            debug!(
                "Rejected {from}:{to}: side {} is not to move",
                piece.orientation
            );
            return None;
        }

        let Some((_, walk)) = self.catalog.matching_rule(&self.board, piece, to)
        else {
            debug!(
                "Rejected {from}:{to}: no {} rule allows it",
                piece.piece_type
            );
            return None;
        };

        Some((id, walk))
    }

    /// Rolls every contest of the walk in travel order and returns the dead.
    fn fight(&mut self, attacker: PieceId, walk: &Walk) -> Vec<PieceId> {
        let mut casualties = Vec::new();

        for (defender, chance) in walk.contests() {
            let roll = self.rng.roll();
            trace!("{attacker} attacks {defender}: {roll:.4} vs {chance}");

            if roll < chance {
                casualties.push(defender);
            } else {
                casualties.push(attacker);
                break;
            }
        }

        casualties
    }

    fn commit(
        &mut self,
        mover: PieceId,
        from: Position,
        to: Position,
        casualties: Vec<PieceId>,
        promotion: Option<String>,
    ) -> MoveRecord {
        let survived = !casualties.contains(&mover);

        for &id in &casualties {
            self.board.mark_dead(id);
        }

        if survived {
            self.board.relocate(mover, to);
        }

        let mut record = MoveRecord::new(from, to);
        record.outcome = self.outcome(mover, &casualties);
        record.casualties = casualties;

        if let Some(choice) = promotion {
            record.promotion = self.promote(mover, survived, to, choice);
        }

        #[cfg(debug_assertions)]
        self.board.verify();

        record
    }

    /// `draw` if both sides lost a royal piece, `lost` or `won` if only the
    /// attacker's side or only the other side did.
    fn outcome(&self, mover: PieceId, casualties: &[PieceId]) -> Outcome {
        let attacker = self.board.piece_by_id(mover).orientation;
        let mut fallen = [false; 2];

        for &id in casualties {
            let piece = self.board.piece_by_id(id);

            if self.catalog.is_royal(&piece.piece_type) {
                fallen[piece.orientation.index()] = true;
            }
        }

        match fallen {
            [true, true] => Outcome::Draw,
            [false, false] => Outcome::None,
            _ if fallen[attacker.index()] => Outcome::Lost,
            _ => Outcome::Won,
        }
    }

    fn promote(
        &mut self,
        mover: PieceId,
        survived: bool,
        to: Position,
        choice: String,
    ) -> Option<String> {
        if !survived {
            debug!("Promotion to {choice} dropped: piece {mover} died");
            return None;
        }

        let piece = self.board.piece_by_id(mover);
        let from_type = piece.piece_type.clone();
        let options =
            self.catalog
                .promotion_options(&from_type, piece.orientation, to);

        if !options.contains(&choice) || !self.catalog.knows(&choice) {
            warn!(
                "Ignoring promotion of {from_type} to {choice} on {to}, \
                 allowed: {options:?}"
            );
            return None;
        }

        self.board.change_type(mover, &choice);
        info!("Piece {mover} promoted from {from_type} to {choice} on {to}");

        Some(choice)
    }

    fn push_move(&mut self, record: MoveRecord) {
        self.log.push(LogEntry::Move(record));
        self.announce();
    }

    fn append_control(&mut self, entry: LogEntry) -> bool {
        if !self.log.admits(&entry) {
            debug!("Rejected `{entry}`: game is {:?}", self.log.status());
            return false;
        }

        self.log.push(entry);
        self.announce();
        true
    }

    fn announce(&self) {
        match self.log.status() {
            GameStatus::Decided(side) => {
                info!("Side {side} wins after {} entries", self.log.len());
            }
            GameStatus::Drawn => {
                info!("Game drawn after {} entries", self.log.len());
            }
            GameStatus::DrawPending => {
                info!("Side {} offers a draw", self.log.turn().opposite());
            }
            GameStatus::Open => {}
        }
    }
}
