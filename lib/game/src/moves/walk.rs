//! # walk.rs
//!
//! Defines the collision walk produced by a rule.
//!
//! A walk lists every tile a move traverses in travel order, together with
//! whoever stood there and, for tiles that start a combat, the attacker's
//! probability of winning it. Compound moves concatenate the walks of their
//! legs, and the last leg decides the chance reported for the destination.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use crate::representations::{piece::PieceId, position::Position};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkTile {
    pub position: Position,
    pub occupant: Option<PieceId>,
    pub contest: Option<f64>,                                                   /* Attacker's chance, if contested    */
}

#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    tiles: Vec<WalkTile>,
    chance: f64,                                                                /* Reported for the destination       */
}

impl Walk {
    pub fn new(chance: f64) -> Self {
        Walk {
            tiles: Vec::new(),
            chance,
        }
    }

    pub fn push(&mut self, tile: WalkTile) {
        self.tiles.push(tile);
    }

    /// Appends the walk of the following leg.
    pub fn then(mut self, next: Walk) -> Self {
        self.tiles.extend(next.tiles);
        self.chance = next.chance;
        self
    }

    pub fn tiles(&self) -> &[WalkTile] {
        &self.tiles
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }

    pub fn destination(&self) -> Option<&WalkTile> {
        self.tiles.last()
    }

    /// Contested occupants in travel order with the attacker's chance.
    pub fn contests(&self) -> impl Iterator<Item = (PieceId, f64)> + '_ {
        self.tiles
            .iter()
            .filter_map(|tile| Some((tile.occupant?, tile.contest?)))
    }

    /// Whether the walk may end here: on an empty tile or a contested one.
    pub fn settles(&self) -> bool {
        match self.destination() {
            Some(tile) => tile.occupant.is_none() || tile.contest.is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos;

    fn tile(
        x: i32,
        y: i32,
        occupant: Option<PieceId>,
        p: Option<f64>,
    ) -> WalkTile {
        WalkTile {
            position: pos!(x, y),
            occupant,
            contest: p,
        }
    }

    #[test]
    fn contests_keep_travel_order() {
        let mut first = Walk::new(0.5);
        first.push(tile(3, 4, Some(7), Some(0.5)));
        first.push(tile(3, 5, None, None));

        let mut second = Walk::new(0.25);
        second.push(tile(3, 6, Some(2), None));
        second.push(tile(3, 7, Some(4), Some(0.25)));

        let walk = first.then(second);
        assert_eq!(walk.contests().collect::<Vec<_>>(), vec![
            (7, 0.5),
            (4, 0.25)
        ]);
        assert_eq!(walk.destination().map(|t| t.position), Some(pos!(3, 7)));
        assert!(walk.settles());
        assert_eq!(walk.chance(), 0.25);
    }

    #[test]
    fn uncontested_occupant_does_not_settle() {
        let mut walk = Walk::new(0.75);
        walk.push(tile(0, 1, Some(3), None));
        assert!(!walk.settles());
        assert!(!Walk::new(0.75).settles());
    }
}
