use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Cost recorded for cells known to be impassable.
pub const BLOCKED_COST: f64 = 100.0;

/// Lower bound on any recorded traversal cost.
pub const MIN_COST: f64 = 1.0;

/// Integer grid coordinate, relative to the exploration origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn euclidean(&self, other: &Coord) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn chebyshev(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add<Move> for Coord {
    type Output = Coord;

    fn add(self, mv: Move) -> Coord {
        Coord::new(self.x + mv.dx, self.y + mv.dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A unit step on the 8-connected grid. Never (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub dx: i32,
    pub dy: i32,
}

impl Move {
    pub const N: Move = Move { dx: 0, dy: -1 };
    pub const NE: Move = Move { dx: 1, dy: -1 };
    pub const E: Move = Move { dx: 1, dy: 0 };
    pub const SE: Move = Move { dx: 1, dy: 1 };
    pub const S: Move = Move { dx: 0, dy: 1 };
    pub const SW: Move = Move { dx: -1, dy: 1 };
    pub const W: Move = Move { dx: -1, dy: 0 };
    pub const NW: Move = Move { dx: -1, dy: -1 };

    /// Order in which the environment reports neighbor classifications (clockwise from north).
    pub const SENSOR_ORDER: [Move; 8] = [
        Move::N,
        Move::NE,
        Move::E,
        Move::SE,
        Move::S,
        Move::SW,
        Move::W,
        Move::NW,
    ];

    /// Order used when substituting a move during route repair and random walks.
    pub const REPAIR_ORDER: [Move; 8] = [
        Move::NW,
        Move::W,
        Move::SW,
        Move::N,
        Move::S,
        Move::NE,
        Move::E,
        Move::SE,
    ];

    /// Returns the move for a unit delta, or `None` for (0, 0) and non-adjacent deltas.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Move> {
        if (dx, dy) == (0, 0) || dx.abs() > 1 || dy.abs() > 1 {
            return None;
        }
        Some(Move { dx, dy })
    }

    pub fn between(from: Coord, to: Coord) -> Option<Move> {
        Move::from_delta(to.x - from.x, to.y - from.y)
    }

    pub fn reversed(self) -> Move {
        Move {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Unknown,
    Free,
    Start,
    Goal,
    Blocked,
}

impl CellKind {
    pub fn is_traversable(&self) -> bool {
        matches!(self, CellKind::Free | CellKind::Start | CellKind::Goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cost: f64,
    pub kind: CellKind,
}

impl Cell {
    pub fn new(cost: f64, kind: CellKind) -> Self {
        Self { cost, kind }
    }

    /// The synthetic cell returned for anything the grid has not observed.
    pub fn blocked() -> Self {
        Self {
            cost: BLOCKED_COST,
            kind: CellKind::Blocked,
        }
    }

    pub fn is_traversable(&self) -> bool {
        self.kind.is_traversable()
    }
}
