use crate::domains::world::{Coord, GridBounds, Move, PartialGrid};
use serde::{Deserialize, Serialize};

/// A candidate rescue route: moves from the rescuer's start cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    pub moves: Vec<Move>,
}

impl Chromosome {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// The grid a route lives on, with the bounding box and start cell fixed for one optimization.
#[derive(Debug, Clone)]
pub struct RouteSpace {
    grid: PartialGrid,
    bounds: GridBounds,
    start: Coord,
}

impl RouteSpace {
    /// `None` when the grid is empty or `start` lies outside it.
    pub fn new(grid: PartialGrid, start: Coord) -> Option<Self> {
        let bounds = grid.bounds()?;
        if !bounds.contains(start) {
            return None;
        }
        Some(Self {
            grid,
            bounds,
            start,
        })
    }

    pub fn grid(&self) -> &PartialGrid {
        &self.grid
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn cost(&self, pos: Coord) -> f64 {
        self.grid.get(pos).cost
    }

    /// In-bounds traversable neighbors of `pos`, in `Move::REPAIR_ORDER`.
    pub fn valid_moves(&self, pos: Coord) -> Vec<Move> {
        Move::REPAIR_ORDER
            .iter()
            .copied()
            .filter(|mv| {
                let target = pos + *mv;
                self.bounds.contains(target) && self.grid.is_traversable(target)
            })
            .collect()
    }

    /// Applies the repair rule to one move taken from `from`.
    ///
    /// The target is clamped into the bounding box. If the clamped step is empty or lands on a
    /// blocked cell, the first traversable neighbor of `from` in `Move::REPAIR_ORDER` replaces
    /// it. A cell with no traversable neighbor keeps the agent in place.
    pub fn repair_step(&self, from: Coord, mv: Move) -> (Coord, Move) {
        let clamped = self.bounds.clamp(from + mv);
        if let Some(adjusted) = Move::between(from, clamped) {
            if self.grid.is_traversable(clamped) {
                return (clamped, adjusted);
            }
        }
        match self.valid_moves(from).first() {
            Some(&substitute) => (from + substitute, substitute),
            None => (from, mv),
        }
    }

    /// Repairs every move from `index` on, replaying from `position`, and returns the cells
    /// visited by the repaired suffix.
    pub fn repair_from(
        &self,
        chromosome: &mut Chromosome,
        index: usize,
        position: Coord,
    ) -> Vec<Coord> {
        let mut pos = position;
        let mut visited = Vec::with_capacity(chromosome.len().saturating_sub(index));
        for mv in chromosome.moves.iter_mut().skip(index) {
            let (next, repaired) = self.repair_step(pos, *mv);
            *mv = repaired;
            pos = next;
            visited.push(pos);
        }
        visited
    }

    /// Repairs the whole chromosome in place. Returns the visited cells, start excluded.
    pub fn repair(&self, chromosome: &mut Chromosome) -> Vec<Coord> {
        self.repair_from(chromosome, 0, self.start)
    }

    /// Visited cells of the chromosome as the repair rule would replay it, start excluded.
    pub fn replay(&self, chromosome: &Chromosome) -> Vec<Coord> {
        let mut pos = self.start;
        chromosome
            .moves
            .iter()
            .map(|mv| {
                pos = self.repair_step(pos, *mv).0;
                pos
            })
            .collect()
    }

    /// Position reached after the first `index` moves.
    pub fn position_after(&self, chromosome: &Chromosome, index: usize) -> Coord {
        let mut pos = self.start;
        for mv in chromosome.moves.iter().take(index) {
            pos = self.repair_step(pos, *mv).0;
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::world::CellKind;

    fn open_space(size: i32) -> RouteSpace {
        let mut grid = PartialGrid::new();
        for y in 0..size {
            for x in 0..size {
                grid.observe(Coord::new(x, y), 1.0, CellKind::Free);
            }
        }
        RouteSpace::new(grid, Coord::ORIGIN).unwrap()
    }

    #[test]
    fn clamps_moves_that_leave_the_box() {
        let space = open_space(3);
        // north from (1, 0) clamps to a zero step, so the first open neighbor is used
        let (pos, mv) = space.repair_step(Coord::new(1, 0), Move::N);
        assert_eq!((pos, mv), (Coord::ORIGIN, Move::W));

        // north-east from (1, 0) clamps to east
        let (pos, mv) = space.repair_step(Coord::new(1, 0), Move::NE);
        assert_eq!((pos, mv), (Coord::new(2, 0), Move::E));
    }

    #[test]
    fn substitutes_first_open_neighbor_for_blocked_target() {
        let mut grid = PartialGrid::new();
        for y in 0..3 {
            for x in 0..3 {
                grid.observe(Coord::new(x, y), 1.0, CellKind::Free);
            }
        }
        grid.observe(Coord::new(1, 1), 100.0, CellKind::Blocked);
        let space = RouteSpace::new(grid, Coord::ORIGIN).unwrap();

        let (pos, mv) = space.repair_step(Coord::ORIGIN, Move::SE);
        assert_eq!(mv, Move::S);
        assert_eq!(pos, Coord::new(0, 1));
    }

    #[test]
    fn repair_is_idempotent() {
        let space = open_space(4);
        let mut chromosome = Chromosome::new(vec![
            Move::N,
            Move::W,
            Move::SE,
            Move::SE,
            Move::SE,
            Move::SE,
            Move::E,
        ]);
        let first = space.repair(&mut chromosome);
        let repaired = chromosome.clone();
        let second = space.repair(&mut chromosome);
        assert_eq!(chromosome, repaired);
        assert_eq!(first, second);
        assert_eq!(space.replay(&chromosome), first);
        assert!(first.iter().all(|pos| space.bounds().contains(*pos)));
    }

    #[test]
    fn empty_grid_has_no_route_space() {
        assert!(RouteSpace::new(PartialGrid::new(), Coord::ORIGIN).is_none());
    }
}
