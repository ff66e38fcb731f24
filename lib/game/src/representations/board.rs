//! # board.rs
//!
//! Defines the board state: piece registry, tile map and side occupancy.
//!
//! The registry is an arena indexed by `PieceId`; ids are handed out in
//! insertion order and never reused. Tile occupancy is a sparse map from
//! position to piece id, mirrored by one occupancy bitboard per side so that
//! collision walks can ask "whose piece is here" without touching the map.
//! At most one piece may stand on a tile, and a live piece's location always
//! agrees with the tile map.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::collections::HashMap;

use crate::representations::{
    bitboard::Bitboard,
    piece::{Location, Piece, PieceId},
    position::{Bounds, Orientation, Position},
};

/// What a rule sees when it looks at a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileContent<'a> {
    Empty,
    Occupied(&'a Piece),
    OffBoard,
}

#[derive(Debug, Clone)]
pub struct Board {
    bounds: Bounds,
    pieces: Vec<Piece>,
    tiles: HashMap<Position, PieceId>,
    occupancy: [Bitboard; 2],
}

impl Board {
    pub fn new(bounds: Bounds) -> Self {
        Board {
            bounds,
            pieces: Vec::new(),
            tiles: HashMap::new(),
            occupancy: [Bitboard::new(bounds), Bitboard::new(bounds)],
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn on_board(&self, position: Position) -> bool {
        self.bounds.contains(position)
    }

    pub fn piece_at(&self, position: Position) -> TileContent<'_> {
        if !self.on_board(position) {
            return TileContent::OffBoard;
        }

        match self.tiles.get(&position) {
            Some(&id) => TileContent::Occupied(&self.pieces[id]),
            None => TileContent::Empty,
        }
    }

    pub fn id_at(&self, position: Position) -> Option<PieceId> {
        self.tiles.get(&position).copied()
    }

    /// Side occupying a tile, answered from the occupancy bitboards.
    #[inline(always)]
    pub fn side_at(&self, position: Position) -> Option<Orientation> {
        Orientation::BOTH
            .into_iter()
            .find(|side| self.occupancy[side.index()].get(position))
    }

    /// Looks up a piece by id.
    ///
    /// # Panics
    ///
    /// Panics if no piece with this id was ever added. Ids come from the
    /// registry itself, so an unknown id means the caller is corrupted.
    pub fn piece_by_id(&self, id: PieceId) -> &Piece {
        self.pieces
            .get(id)
            .unwrap_or_else(|| panic!("Unknown piece id: {id}"))
    }

    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn tile_of(&self, id: PieceId) -> Option<Position> {
        self.piece_by_id(id).position()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn live_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|piece| piece.position().is_some())
    }

    pub fn occupancy(&self, side: Orientation) -> &Bitboard {
        &self.occupancy[side.index()]
    }

    /// Registers a new piece on an empty tile and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the tile is off the board or already occupied.
    pub fn add_piece(
        &mut self,
        piece_type: &str,
        position: Position,
        orientation: Orientation,
    ) -> PieceId {
        assert!(
            self.on_board(position),
            "Cannot add {piece_type} at {position}: tile is off the board"
        );
        assert!(
            !self.tiles.contains_key(&position),
            "Cannot add {piece_type} at {position}: tile is occupied"
        );

        let id = self.pieces.len();
        self.pieces.push(Piece::new(id, piece_type, orientation, position));
        self.set_tile(position, id);

        id
    }

    /// Places a piece on a tile and updates its location.
    ///
    /// # Panics
    ///
    /// Panics if the tile is off the board or held by another piece.
    pub fn set_tile(&mut self, position: Position, id: PieceId) {
        assert!(self.on_board(position), "Tile {position} is off the board");

        if let Some(&holder) = self.tiles.get(&position) {
            assert_eq!(
                holder, id,
                "Tile {position} already holds piece {holder}"
            );
        }

        let side = self.piece_by_id(id).orientation;
        self.tiles.insert(position, id);
        self.occupancy[side.index()].set(position);
        self.pieces[id].location = Location::Tile(position);
    }

    /// Empties a tile and returns the id that stood there. The piece is
    /// left off the board; callers decide whether it died or moves on.
    pub fn clear_tile(&mut self, position: Position) -> Option<PieceId> {
        let id = self.tiles.remove(&position)?;
        let side = self.pieces[id].orientation;

        self.occupancy[side.index()].clear(position);
        self.pieces[id].location = Location::Off;

        Some(id)
    }

    pub fn relocate(&mut self, id: PieceId, to: Position) {
        let from = self
            .tile_of(id)
            .unwrap_or_else(|| panic!("Piece {id} is not on the board"));

        self.clear_tile(from);
        self.set_tile(to, id);
    }

    /// Lifts a piece off its tile without killing it.
    pub fn remove_piece(&mut self, position: Position) -> Option<&Piece> {
        let id = self.clear_tile(position)?;
        Some(&self.pieces[id])
    }

    /// Kills a piece wherever it stands. Dead pieces stay in the registry.
    pub fn mark_dead(&mut self, id: PieceId) {
        if let Some(position) = self.tile_of(id) {
            self.clear_tile(position);
        }

        self.pieces[id].location = Location::Dead;
    }

    pub fn change_type(&mut self, id: PieceId, piece_type: &str) {
        self.piece_by_id(id);
        self.pieces[id].piece_type = piece_type.to_string();
    }

    /// Asserts that the registry, tile map and bitboards agree.
    pub fn verify(&self) {
        for (position, &id) in &self.tiles {
            let piece = self.piece_by_id(id);
            assert_eq!(
                piece.location,
                Location::Tile(*position),
                "Piece {id} is mapped to {position} but located at {:?}",
                piece.location
            );
            assert!(
                self.occupancy[piece.orientation.index()].get(*position),
                "Occupancy of side {} is missing {position}",
                piece.orientation
            );
        }

        for piece in &self.pieces {
            if let Location::Tile(position) = piece.location {
                assert_eq!(
                    self.tiles.get(&position),
                    Some(&piece.id),
                    "Piece {} claims {position} but the tile disagrees",
                    piece.id
                );
            }
        }

        let mapped = self.tiles.len() as u32;
        let counted = self.occupancy[0].count() + self.occupancy[1].count();
        assert_eq!(mapped, counted, "Tile map and bitboards disagree");
        assert!(
            (&self.occupancy[0] & &self.occupancy[1]).is_empty(),
            "A tile is occupied by both sides"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos;

    fn board() -> Board {
        Board::new(Bounds::default())
    }

    #[test]
    fn tells_which_piece_is_on_a_tile() {
        let mut board = board();
        let pawn = board.add_piece("pawn", pos!(2, 4), Orientation::Up);
        let king = board.add_piece("king", pos!(4, 5), Orientation::Down);

        match board.piece_at(pos!(2, 4)) {
            TileContent::Occupied(piece) => assert_eq!(piece.id, pawn),
            other => panic!("expected a pawn, got {other:?}"),
        }
        assert_eq!(board.side_at(pos!(4, 5)), Some(Orientation::Down));
        assert_eq!(board.id_at(pos!(4, 5)), Some(king));
        assert_eq!(board.piece_at(pos!(1, 1)), TileContent::Empty);
        assert_eq!(board.piece_at(pos!(9, 9)), TileContent::OffBoard);
        board.verify();
    }

    #[test]
    fn killing_keeps_the_piece_addressable() {
        let mut board = board();
        let id = board.add_piece("pawn", pos!(1, 1), Orientation::Up);
        board.mark_dead(id);

        assert_eq!(board.piece_at(pos!(1, 1)), TileContent::Empty);
        assert!(board.piece_by_id(id).is_dead());
        assert_eq!(board.tile_of(id), None);
        assert_eq!(board.side_at(pos!(1, 1)), None);
        board.verify();
    }

    #[test]
    fn removing_lifts_without_killing() {
        let mut board = board();
        board.add_piece("pawn", pos!(3, 4), Orientation::Up);
        let removed = board.remove_piece(pos!(3, 4)).cloned().unwrap();

        assert_eq!(removed.location, Location::Off);
        assert!(!removed.is_dead());
        assert_eq!(board.piece_at(pos!(3, 4)), TileContent::Empty);
        assert!(board.remove_piece(pos!(3, 4)).is_none());
    }

    #[test]
    fn relocation_moves_occupancy() {
        let mut board = board();
        let id = board.add_piece("rook", pos!(0, 0), Orientation::Down);
        board.relocate(id, pos!(0, 5));

        assert_eq!(board.tile_of(id), Some(pos!(0, 5)));
        assert_eq!(board.side_at(pos!(0, 0)), None);
        assert_eq!(board.occupancy(Orientation::Down).positions(), vec![
            pos!(0, 5)
        ]);
        board.verify();
    }

    #[test]
    fn promotion_changes_type_only() {
        let mut board = board();
        let id = board.add_piece("pawn", pos!(3, 7), Orientation::Up);
        board.change_type(id, "queen");
        assert_eq!(board.piece_by_id(id).piece_type, "queen");
        assert_eq!(board.tile_of(id), Some(pos!(3, 7)));
    }

    #[test]
    #[should_panic(expected = "tile is occupied")]
    fn one_piece_per_tile() {
        let mut board = board();
        board.add_piece("pawn", pos!(3, 3), Orientation::Up);
        board.add_piece("pawn", pos!(3, 3), Orientation::Down);
    }

    #[test]
    #[should_panic(expected = "Unknown piece id")]
    fn unknown_ids_fail_loudly() {
        board().piece_by_id(12);
    }
}
