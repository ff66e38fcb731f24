//! # direction.rs
//!
//! Defines the eight movement directions and the collision policies.
//!
//! Every direction is a unit vector given from the point of view of the `Up`
//! side. The vector is multiplied by the mover's orientation sign, so the
//! same rule moves a `Down` piece toward lower ranks and mirrors left and
//! right as well.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use std::{fmt, str::FromStr};

use crate::representations::position::{Orientation, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    ForwardLeft,
    ForwardRight,
    BackwardLeft,
    BackwardRight,
}

const VECTORS: [(i32, i32); 8] = [
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

const NAMES: [&str; 8] = [
    "forward",
    "backward",
    "left",
    "right",
    "diagonal_forward_left",
    "diagonal_forward_right",
    "diagonal_backward_left",
    "diagonal_backward_right",
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::ForwardLeft,
        Direction::ForwardRight,
        Direction::BackwardLeft,
        Direction::BackwardRight,
    ];

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        NAMES[self.index()]
    }

    /// Unit step of this direction for a side.
    #[inline(always)]
    pub fn vector(self, orientation: Orientation) -> (i32, i32) {
        let (dx, dy) = VECTORS[self.index()];
        let sign = orientation.sign();
        (dx * sign, dy * sign)
    }

    #[inline(always)]
    pub fn step(self, from: Position, orientation: Orientation) -> Position {
        let (dx, dy) = self.vector(orientation);
        from.offset(dx, dy)
    }

    /// Number of unit steps from `from` to `to`, or `None` if `to` does not
    /// lie on this direction's ray.
    pub fn steps_between(
        self,
        from: Position,
        to: Position,
        orientation: Orientation,
    ) -> Option<u32> {
        let (dx, dy) = self.vector(orientation);
        let (vx, vy) = (to.x - from.x, to.y - from.y);

        let along = |v: i32, d: i32| match d {
            0 => (v == 0).then_some(None),
            _ => (v % d == 0 && v / d > 0).then_some(Some(v / d)),
        };

        let sx = along(vx, dx)?;
        let sy = along(vy, dy)?;

        match (sx, sy) {
            (Some(a), Some(b)) if a == b => Some(a as u32),
            (Some(a), None) | (None, Some(a)) => Some(a as u32),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .position(|name| *name == s)
            .map(|index| Direction::ALL[index])
            .ok_or_else(|| s.to_string())
    }
}

/// How occupied tiles along a walk affect a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collision {
    #[default]
    Blocking,                                                                   /* Clear path, capture at the end     */
    Peaceful,                                                                   /* Path and destination must be empty */
    Disabled,                                                                   /* Occupancy is ignored               */
    Jumping,                                                                    /* Only the last tile before matters  */
    All,                                                                        /* Every opponent on the way is fought*/
}

impl Collision {
    pub fn name(self) -> &'static str {
        match self {
            Collision::Blocking => "blocking",
            Collision::Peaceful => "none",
            Collision::Disabled => "disabled",
            Collision::Jumping => "jumping",
            Collision::All => "all",
        }
    }

    /// Whether a walk that fails on some tile can still succeed farther out.
    pub fn passes_invalid(self) -> bool {
        matches!(self, Collision::Jumping | Collision::Disabled)
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Collision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocking" => Ok(Collision::Blocking),
            "none" => Ok(Collision::Peaceful),
            "disabled" => Ok(Collision::Disabled),
            "jumping" => Ok(Collision::Jumping),
            "all" => Ok(Collision::All),
            _ => Err(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos;

    #[test]
    fn vectors_mirror_for_the_down_side() {
        assert_eq!(Direction::Forward.vector(Orientation::Up), (0, 1));
        assert_eq!(Direction::Forward.vector(Orientation::Down), (0, -1));
        assert_eq!(Direction::Left.vector(Orientation::Down), (1, 0));
        assert_eq!(
            Direction::ForwardRight.step(pos!(3, 3), Orientation::Down),
            pos!(2, 2)
        );
    }

    #[test]
    fn steps_between_aligned_tiles() {
        let up = Orientation::Up;
        assert_eq!(
            Direction::Forward.steps_between(pos!(3, 3), pos!(3, 6), up),
            Some(3)
        );
        assert_eq!(
            Direction::ForwardLeft.steps_between(pos!(3, 3), pos!(1, 5), up),
            Some(2)
        );
        assert_eq!(
            Direction::Forward.steps_between(pos!(3, 3), pos!(3, 1), up),
            None
        );
        assert_eq!(
            Direction::Forward.steps_between(pos!(3, 3), pos!(4, 5), up),
            None
        );
        assert_eq!(
            Direction::ForwardLeft.steps_between(pos!(3, 3), pos!(1, 4), up),
            None
        );
        assert_eq!(
            Direction::Right.steps_between(pos!(3, 3), pos!(3, 3), up),
            None
        );
        assert_eq!(
            Direction::Backward.steps_between(
                pos!(3, 3),
                pos!(3, 5),
                Orientation::Down
            ),
            Some(2)
        );
    }

    #[test]
    fn names_round_trip() {
        for direction in Direction::ALL {
            assert_eq!(direction.name().parse::<Direction>(), Ok(direction));
        }
        assert_eq!("none".parse::<Collision>(), Ok(Collision::Peaceful));
        assert!("sideways".parse::<Direction>().is_err());
    }
}
