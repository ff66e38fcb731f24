//! # rule.rs
//!
//! Implements primitive and compound movement rules.
//!
//! A primitive rule moves along one direction for a bounded number of steps
//! and judges the occupied tiles it passes with its collision policy. A
//! compound rule chains legs: the destination of one leg is the origin of the
//! next, and a destination is legal if any chain of leg destinations reaches
//! it.
//!
//! Rules are evaluated at two levels. At leg level a walk only has to obey
//! its own collision policy, so a `disabled` leg may end on an occupied tile.
//! At move level the final tile must also be empty or contested, since two
//! pieces can never share a tile.
//!
//! The moving piece's own origin counts as empty throughout, so a compound
//! leg may pass back over it. So does the tile of an occupant an earlier leg
//! already contested: a piece is fought at most once per move.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::{collections::BTreeMap, fmt};
use thiserror::Error;

use crate::{
    constants::*,
    moves::{
        direction::{Collision, Direction},
        schedule::Schedule,
        walk::{Walk, WalkTile},
    },
    representations::{
        board::Board,
        piece::{Piece, PieceId},
        position::Position,
    },
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("invalid step range {min}..{max}")]
    Steps { min: u32, max: u32 },
    #[error("a compound rule needs at least one leg")]
    EmptyCompound,
    #[error("compound rules nest {0} deep, at most {MAX_RULE_DEPTH} allowed")]
    TooDeep(usize),
}

/// Inclusive step range; a `max` of zero means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steps {
    min: u32,
    max: u32,
}

impl Steps {
    pub fn new(min: u32, max: u32) -> Result<Self, RuleError> {
        if min == 0 || (max != UNBOUNDED && max < min) {
            return Err(RuleError::Steps { min, max });
        }

        Ok(Steps { min, max })
    }

    pub fn exactly(steps: u32) -> Result<Self, RuleError> {
        Steps::new(steps, steps)
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    #[inline(always)]
    pub fn contains(&self, steps: u32) -> bool {
        steps >= self.min && (self.max == UNBOUNDED || steps <= self.max)
    }
}

impl Default for Steps {
    fn default() -> Self {
        Steps {
            min: 1,
            max: UNBOUNDED,
        }
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, UNBOUNDED) => write!(f, "[{min}..]"),
            (min, max) if min == max => write!(f, "[{min}]"),
            (min, max) => write!(f, "[{min}..{max}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub direction: Direction,
    pub steps: Steps,
    pub collision: Collision,
    pub schedule: Schedule,
}

impl Primitive {
    pub fn new(
        direction: Direction,
        steps: Steps,
        collision: Collision,
        schedule: Schedule,
    ) -> Self {
        Primitive {
            direction,
            steps,
            collision,
            schedule,
        }
    }

    /// Probability reported for a destination `steps` tiles out.
    fn tag(&self, steps: u32) -> f64 {
        match self.collision {
            Collision::All => self.schedule.at(steps as usize - 1),
            _ => self.schedule.at(0),
        }
    }

    /// Walks from `from` to `to` and judges every traversed tile. Pieces in
    /// `spent` were contested earlier in the move and count as gone.
    ///
    /// Returns `None` if `to` is off the board, off this rule's ray, outside
    /// the step range, or if the collision policy rejects a tile.
    fn walk(
        &self,
        board: &Board,
        from: Position,
        to: Position,
        mover: &Piece,
        spent: &[PieceId],
        settle: bool,
    ) -> Option<Walk> {
        if !board.on_board(from) || !board.on_board(to) {
            return None;
        }

        let n = self.direction.steps_between(from, to, mover.orientation)?;

        if !self.steps.contains(n) {
            return None;
        }

        let mut walk = Walk::new(self.tag(n));
        let mut position = from;

        for k in 0..n {
            position = self.direction.step(position, mover.orientation);

            let last = k + 1 == n;
            let occupant = board
                .id_at(position)
                .filter(|&id| id != mover.id && !spent.contains(&id));
            let hostile = occupant.is_some()
                && board
                    .side_at(position)
                    .is_some_and(|side| side != mover.orientation);

            let contest = match (self.collision, occupant.is_some()) {
                (_, false) => None,
                (Collision::Disabled, true) => None,
                (Collision::Peaceful, true) => return None,
                (Collision::All, true) if hostile => {
                    Some(self.schedule.at(k as usize))
                }
                (Collision::Jumping, true) if k + 2 < n => None,                /* Jumped over                        */
                (Collision::Blocking | Collision::Jumping, true)
                    if last && hostile =>
                {
                    Some(self.schedule.at(0))
                }
                _ => return None,
            };

            walk.push(WalkTile {
                position,
                occupant,
                contest,
            });
        }

        if settle && !walk.settles() {
            return None;
        }

        Some(walk)
    }

    /// Leg-level reachable tiles in walking order, each with the occupants
    /// contested so far.
    fn reach(
        &self,
        board: &Board,
        from: Position,
        mover: &Piece,
        spent: &[PieceId],
    ) -> Vec<Stop> {
        let mut reached = Vec::new();
        let mut position = from;
        let mut steps = 0;

        loop {
            position = self.direction.step(position, mover.orientation);
            steps += 1;

            if !board.on_board(position)
                || (self.steps.max != UNBOUNDED && steps > self.steps.max)
            {
                break;
            }

            if steps < self.steps.min {
                continue;
            }

            match self.walk(board, from, position, mover, spent, false) {
                Some(walk) => reached.push(Stop::after(position, spent, &walk)),
                None if self.collision.passes_invalid() => continue,
                None => break,
            }
        }

        reached
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.direction)?;

        if self.steps != Steps::default() {
            write!(f, "{}", self.steps)?;
        }

        if self.collision != Collision::Blocking {
            write!(f, ":{}", self.collision)?;
        }

        write!(f, "={}", self.schedule)
    }
}

/// A leg-level stop: where a partial move stands and whom it has fought.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stop {
    position: Position,
    spent: Vec<PieceId>,
}

impl Stop {
    fn after(position: Position, spent: &[PieceId], walk: &Walk) -> Self {
        let mut spent = spent.to_vec();
        spent.extend(walk.contests().map(|(id, _)| id));
        Stop { position, spent }
    }
}

/// Ordered legs of a multi-leg move. Built through `Rule::compound`.
#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    legs: Vec<Rule>,
}

impl Compound {
    pub fn legs(&self) -> &[Rule] {
        &self.legs
    }

    /// Depth-first search for the first chain of leg destinations that ends
    /// on `to`.
    fn walk(
        legs: &[Rule],
        board: &Board,
        from: Position,
        to: Position,
        mover: &Piece,
        spent: &[PieceId],
        settle: bool,
    ) -> Option<Walk> {
        let (leg, rest) = legs.split_first()?;

        if rest.is_empty() {
            return leg.walk(board, from, to, mover, spent, settle);
        }

        for stop in leg.reach(board, from, mover, spent) {
            let Some(head) =
                leg.walk(board, from, stop.position, mover, spent, false)
            else {
                continue;
            };

            if let Some(tail) = Compound::walk(
                rest,
                board,
                stop.position,
                to,
                mover,
                &stop.spent,
                settle,
            ) {
                return Some(head.then(tail));
            }
        }

        None
    }

    /// Stops after the last leg in walking order. A stop reached twice with
    /// the same fights behind it is kept once.
    fn reach(
        &self,
        board: &Board,
        from: Position,
        mover: &Piece,
        spent: &[PieceId],
    ) -> Vec<Stop> {
        let mut frontier = vec![Stop {
            position: from,
            spent: spent.to_vec(),
        }];

        for leg in &self.legs {
            let mut next: Vec<Stop> = Vec::new();

            for origin in &frontier {
                for stop in
                    leg.reach(board, origin.position, mover, &origin.spent)
                {
                    if !next.contains(&stop) {
                        next.push(stop);
                    }
                }
            }

            frontier = next;
        }

        frontier
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Primitive(Primitive),
    Compound(Compound),
}

impl Rule {
    /// Chains legs into a compound rule.
    pub fn compound(legs: Vec<Rule>) -> Result<Rule, RuleError> {
        if legs.is_empty() {
            return Err(RuleError::EmptyCompound);
        }

        let rule = Rule::Compound(Compound { legs });
        let depth = rule.depth();

        if depth > MAX_RULE_DEPTH {
            return Err(RuleError::TooDeep(depth));
        }

        Ok(rule)
    }

    /// Nesting depth: zero for a primitive, one more than the deepest leg
    /// for a compound.
    pub fn depth(&self) -> usize {
        match self {
            Rule::Primitive(_) => 0,
            Rule::Compound(compound) => {
                1 + compound.legs.iter().map(Rule::depth).max().unwrap_or(0)
            }
        }
    }

    fn walk(
        &self,
        board: &Board,
        from: Position,
        to: Position,
        mover: &Piece,
        spent: &[PieceId],
        settle: bool,
    ) -> Option<Walk> {
        match self {
            Rule::Primitive(rule) => {
                rule.walk(board, from, to, mover, spent, settle)
            }
            Rule::Compound(rule) => Compound::walk(
                &rule.legs, board, from, to, mover, spent, settle,
            ),
        }
    }

    fn reach(
        &self,
        board: &Board,
        from: Position,
        mover: &Piece,
        spent: &[PieceId],
    ) -> Vec<Stop> {
        match self {
            Rule::Primitive(rule) => rule.reach(board, from, mover, spent),
            Rule::Compound(rule) => rule.reach(board, from, mover, spent),
        }
    }

    /// Collision walk of a move by `mover` to `to`, or `None` if this rule
    /// does not allow it.
    pub fn trace(
        &self,
        board: &Board,
        mover: &Piece,
        to: Position,
    ) -> Option<Walk> {
        let from = mover.position()?;

        if from == to {
            return None;
        }

        self.walk(board, from, to, mover, &[], true)
    }

    pub fn validate(&self, board: &Board, mover: &Piece, to: Position) -> bool {
        self.trace(board, mover, to).is_some()
    }

    /// Every destination this rule allows, tagged with the attacker's chance
    /// on the walk `trace` picks for it. Agrees with `validate` tile for tile.
    pub fn enumerate(
        &self,
        board: &Board,
        mover: &Piece,
    ) -> BTreeMap<Position, f64> {
        let mut destinations = BTreeMap::new();

        let Some(from) = mover.position() else {
            return destinations;
        };

        for stop in self.reach(board, from, mover, &[]) {
            if stop.position == from
                || destinations.contains_key(&stop.position)
            {
                continue;
            }

            if let Some(walk) = self.trace(board, mover, stop.position) {
                destinations.insert(stop.position, walk.chance());
            }
        }

        destinations
    }
}

impl From<Primitive> for Rule {
    fn from(rule: Primitive) -> Self {
        Rule::Primitive(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Primitive(rule) => write!(f, "{rule}"),
            Rule::Compound(compound) => {
                let legs = compound
                    .legs
                    .iter()
                    .map(|leg| match leg {
                        Rule::Compound(_) => format!("({leg})"),
                        Rule::Primitive(_) => leg.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(">");
                write!(f, "{legs}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pos, representations::position::Orientation};
    use ntest::timeout;

    fn leg(
        direction: Direction,
        min: u32,
        max: u32,
        collision: Collision,
        p: f64,
    ) -> Rule {
        Rule::Primitive(Primitive::new(
            direction,
            Steps::new(min, max).unwrap(),
            collision,
            Schedule::single(p).unwrap(),
        ))
    }

    fn setup(pieces: &[(i32, i32, Orientation)]) -> Board {
        let mut board = Board::new(Default::default());
        for &(x, y, side) in pieces {
            board.add_piece("pawn", pos!(x, y), side);
        }
        board
    }

    #[test]
    fn blocking_captures_only_the_first_occupant() {
        let board = setup(&[
            (3, 0, Orientation::Up),
            (3, 3, Orientation::Down),
            (3, 5, Orientation::Down),
        ]);
        let rook = board.piece_by_id(0);
        let rule = leg(Direction::Forward, 1, 0, Collision::Blocking, 0.9);

        assert!(rule.validate(&board, rook, pos!(3, 2)));
        assert!(rule.validate(&board, rook, pos!(3, 3)));
        assert!(!rule.validate(&board, rook, pos!(3, 4)));
        assert!(!rule.validate(&board, rook, pos!(3, 5)));

        let walk = rule.trace(&board, rook, pos!(3, 3)).unwrap();
        assert_eq!(walk.contests().collect::<Vec<_>>(), vec![(1, 0.9)]);
    }

    #[test]
    fn blocking_never_captures_its_own_side() {
        let board = setup(&[(3, 0, Orientation::Up), (3, 1, Orientation::Up)]);
        let rule = leg(Direction::Forward, 1, 0, Collision::Blocking, 0.9);
        assert!(rule.enumerate(&board, board.piece_by_id(0)).is_empty());
    }

    #[test]
    fn peaceful_needs_an_empty_destination() {
        let board =
            setup(&[(3, 3, Orientation::Up), (3, 4, Orientation::Down)]);
        let rule = leg(Direction::Forward, 1, 1, Collision::Peaceful, 0.2);
        assert!(!rule.validate(&board, board.piece_by_id(0), pos!(3, 4)));
    }

    #[test]
    fn jumping_ignores_all_but_the_last_tile_before() {
        let board = setup(&[
            (0, 0, Orientation::Up),
            (0, 1, Orientation::Down),
            (0, 2, Orientation::Up),
            (0, 4, Orientation::Down),
        ]);
        let piece = board.piece_by_id(0);
        let rule = leg(Direction::Forward, 1, 0, Collision::Jumping, 0.5);

        assert!(!rule.validate(&board, piece, pos!(0, 2)));
        assert!(!rule.validate(&board, piece, pos!(0, 3)), "(0,2) precedes");
        assert!(rule.validate(&board, piece, pos!(0, 4)));
        assert!(rule.validate(&board, piece, pos!(0, 1)), "a one-step capture");
        assert!(!rule.validate(&board, piece, pos!(0, 5)), "(0,4) precedes");
        assert!(rule.validate(&board, piece, pos!(0, 6)));

        let reached: Vec<_> =
            rule.enumerate(&board, piece).into_keys().collect();
        assert_eq!(reached, vec![
            pos!(0, 1),
            pos!(0, 4),
            pos!(0, 6),
            pos!(0, 7)
        ]);
    }

    #[test]
    fn all_fights_every_opponent_in_order() {
        let board = setup(&[
            (3, 0, Orientation::Up),
            (3, 1, Orientation::Down),
            (3, 3, Orientation::Down),
        ]);
        let rule = Rule::Primitive(Primitive::new(
            Direction::Forward,
            Steps::default(),
            Collision::All,
            Schedule::new(vec![0.75, 0.5, 0.25]).unwrap(),
        ));
        let walk =
            rule.trace(&board, board.piece_by_id(0), pos!(3, 4)).unwrap();

        assert_eq!(walk.tiles().len(), 4);
        assert_eq!(walk.contests().collect::<Vec<_>>(), vec![
            (1, 0.75),
            (2, 0.25)
        ]);
    }

    #[test]
    fn all_refuses_to_cross_its_own_side() {
        let board = setup(&[
            (3, 0, Orientation::Up),
            (3, 1, Orientation::Down),
            (3, 2, Orientation::Up),
        ]);
        let rule = leg(Direction::Forward, 1, 0, Collision::All, 1.0);
        let reached = rule.enumerate(&board, board.piece_by_id(0));
        assert_eq!(reached.into_keys().collect::<Vec<_>>(), vec![pos!(3, 1)]);
    }

    #[test]
    fn steps_bound_the_walk() {
        let board = setup(&[(2, 2, Orientation::Down)]);
        let piece = board.piece_by_id(0);
        let rule = leg(Direction::ForwardLeft, 2, 3, Collision::Blocking, 0.9);

        assert!(!rule.validate(&board, piece, pos!(3, 1)));
        assert!(rule.validate(&board, piece, pos!(4, 0)));
        assert!(!rule.validate(&board, piece, pos!(2, 0)));
        assert_eq!(
            rule.enumerate(&board, piece).into_keys().collect::<Vec<_>>(),
            vec![pos!(4, 0)]
        );
    }

    #[test]
    #[timeout(1000)]
    fn compound_legs_chain_through_occupied_tiles() {
        let board = setup(&[
            (3, 0, Orientation::Up),
            (3, 1, Orientation::Down),
            (3, 2, Orientation::Down),
        ]);
        let knight = Rule::compound(vec![
            leg(Direction::Forward, 2, 2, Collision::Disabled, 0.75),
            leg(Direction::Right, 1, 1, Collision::Blocking, 0.75),
        ])
        .unwrap();
        let piece = board.piece_by_id(0);

        assert!(knight.validate(&board, piece, pos!(4, 2)));
        assert!(!knight.validate(&board, piece, pos!(2, 2)));

        let walk = knight.trace(&board, piece, pos!(4, 2)).unwrap();
        let path: Vec<_> = walk.tiles().iter().map(|t| t.position).collect();
        assert_eq!(path, vec![pos!(3, 1), pos!(3, 2), pos!(4, 2)]);
        assert_eq!(walk.contests().count(), 0);
    }

    #[test]
    #[timeout(1000)]
    fn compound_legality_is_existential() {
        let board = setup(&[(0, 0, Orientation::Up), (1, 0, Orientation::Up)]);
        let rule = Rule::compound(vec![
            leg(Direction::Forward, 1, 2, Collision::Blocking, 0.75),
            leg(Direction::Right, 1, 1, Collision::Blocking, 0.75),
            leg(Direction::Forward, 1, 2, Collision::Blocking, 0.75),
        ])
        .unwrap();
        let piece = board.piece_by_id(0);

        assert!(rule.validate(&board, piece, pos!(1, 3)));
        assert!(rule.validate(&board, piece, pos!(1, 4)));
        assert!(!rule.validate(&board, piece, pos!(1, 1)));

        let reached = rule.enumerate(&board, piece);
        for position in reached.keys() {
            assert!(rule.validate(&board, piece, *position));
        }
        assert!(reached.contains_key(&pos!(1, 2)));
    }

    #[test]
    fn peaceful_stops_at_an_occupied_middle_tile() {
        let board =
            setup(&[(0, 0, Orientation::Up), (0, 1, Orientation::Down)]);
        let rule = leg(Direction::Forward, 1, 3, Collision::Peaceful, 0.2);
        let piece = board.piece_by_id(0);

        assert!(!rule.validate(&board, piece, pos!(0, 2)));
        assert!(!rule.validate(&board, piece, pos!(0, 1)));
        assert!(rule.enumerate(&board, piece).is_empty());
    }

    #[test]
    #[timeout(1000)]
    fn an_opponent_is_fought_once_per_move() {
        let board =
            setup(&[(0, 0, Orientation::Up), (0, 1, Orientation::Down)]);
        let rule = Rule::compound(vec![
            leg(Direction::Forward, 2, 2, Collision::All, 1.0),
            leg(Direction::Backward, 1, 1, Collision::All, 1.0),
        ])
        .unwrap();
        let piece = board.piece_by_id(0);

        let walk = rule.trace(&board, piece, pos!(0, 1)).unwrap();
        assert_eq!(walk.contests().collect::<Vec<_>>(), vec![(1, 1.0)]);
        assert_eq!(walk.destination().and_then(|t| t.occupant), None);
        assert_eq!(
            rule.enumerate(&board, piece).into_iter().collect::<Vec<_>>(),
            vec![(pos!(0, 1), 1.0)]
        );
    }

    #[test]
    #[timeout(1000)]
    fn listed_chance_matches_the_traced_walk() {
        let board =
            setup(&[(0, 7, Orientation::Down), (0, 4, Orientation::Up)]);
        let rule = Rule::compound(vec![
            leg(Direction::Forward, 1, 2, Collision::Disabled, 0.75),
            Rule::Primitive(Primitive::new(
                Direction::Forward,
                Steps::new(1, 2).unwrap(),
                Collision::All,
                Schedule::new(vec![0.9, 0.1]).unwrap(),
            )),
        ])
        .unwrap();
        let piece = board.piece_by_id(0);

        let walk = rule.trace(&board, piece, pos!(0, 4)).unwrap();
        assert_eq!(walk.contests().collect::<Vec<_>>(), vec![(1, 0.1)]);

        let reached = rule.enumerate(&board, piece);
        assert_eq!(reached.get(&pos!(0, 4)), Some(&0.1));
        for (position, chance) in &reached {
            let walk = rule.trace(&board, piece, *position).unwrap();
            assert_eq!(walk.chance(), *chance);
        }
    }

    #[test]
    fn disabled_leg_cannot_end_a_move_on_a_piece() {
        let board =
            setup(&[(0, 0, Orientation::Up), (0, 2, Orientation::Down)]);
        let rule = leg(Direction::Forward, 2, 2, Collision::Disabled, 0.75);
        assert!(!rule.validate(&board, board.piece_by_id(0), pos!(0, 2)));
    }

    #[test]
    fn a_move_may_not_return_to_its_origin() {
        let board = setup(&[(4, 4, Orientation::Up)]);
        let rule = Rule::compound(vec![
            leg(Direction::Forward, 1, 1, Collision::Blocking, 0.75),
            leg(Direction::Backward, 1, 1, Collision::Blocking, 0.75),
        ])
        .unwrap();
        let piece = board.piece_by_id(0);
        assert!(!rule.validate(&board, piece, pos!(4, 4)));
        assert!(rule.enumerate(&board, piece).is_empty());
    }

    #[test]
    fn nesting_is_capped() {
        let mut rule = leg(Direction::Forward, 1, 1, Collision::Blocking, 0.5);
        for _ in 0..MAX_RULE_DEPTH {
            rule = Rule::compound(vec![rule]).unwrap();
        }
        assert_eq!(rule.depth(), MAX_RULE_DEPTH);
        assert_eq!(
            Rule::compound(vec![rule]),
            Err(RuleError::TooDeep(MAX_RULE_DEPTH + 1))
        );
        assert_eq!(Rule::compound(vec![]), Err(RuleError::EmptyCompound));
    }

    #[test]
    fn invalid_step_ranges() {
        assert!(Steps::new(0, 3).is_err());
        assert!(Steps::new(3, 2).is_err());
        assert!(Steps::new(3, UNBOUNDED).is_ok());
        assert_eq!(Steps::exactly(2).unwrap().to_string(), "[2]");
        assert_eq!(Steps::new(1, 3).unwrap().to_string(), "[1..3]");
    }
}
