use super::types::{Cell, CellKind, Coord, BLOCKED_COST, MIN_COST};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl GridBounds {
    fn around(pos: Coord) -> Self {
        Self {
            min_x: pos.x,
            max_x: pos.x,
            min_y: pos.y,
            max_y: pos.y,
        }
    }

    fn include(&mut self, pos: Coord) {
        self.min_x = self.min_x.min(pos.x);
        self.max_x = self.max_x.max(pos.x);
        self.min_y = self.min_y.min(pos.y);
        self.max_y = self.max_y.max(pos.y);
    }

    pub fn contains(&self, pos: Coord) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x) && (self.min_y..=self.max_y).contains(&pos.y)
    }

    pub fn clamp(&self, pos: Coord) -> Coord {
        Coord::new(
            pos.x.clamp(self.min_x, self.max_x),
            pos.y.clamp(self.min_y, self.max_y),
        )
    }
}

/// Sparse record of everything observed about the world.
///
/// Queries are total: a coordinate outside the bounding box, or inside it but never observed,
/// reads as a blocked cell. Unseen space is never assumed to be open.
#[derive(Debug, Clone, Default)]
pub struct PartialGrid {
    cells: HashMap<Coord, Cell>,
    bounds: Option<GridBounds>,
}

impl PartialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a cell. Blocked cells always carry `BLOCKED_COST`; other costs are
    /// clamped to at least `MIN_COST`.
    pub fn observe(&mut self, pos: Coord, cost: f64, kind: CellKind) {
        let cost = match kind {
            CellKind::Blocked => BLOCKED_COST,
            _ => cost.max(MIN_COST),
        };
        self.cells.insert(pos, Cell::new(cost, kind));
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(pos),
            None => self.bounds = Some(GridBounds::around(pos)),
        }
    }

    pub fn get(&self, pos: Coord) -> Cell {
        self.cells.get(&pos).copied().unwrap_or_else(Cell::blocked)
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn is_traversable(&self, pos: Coord) -> bool {
        self.get(pos).is_traversable()
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        self.bounds.map(|b| b.contains(pos)).unwrap_or(false)
    }

    /// Clamps `pos` component-wise into the bounding box. An empty grid returns `pos` unchanged.
    pub fn clamp(&self, pos: Coord) -> Coord {
        match self.bounds {
            Some(bounds) => bounds.clamp(pos),
            None => pos,
        }
    }

    /// Last-writer-wins merge: every cell of `other` overwrites the matching coordinate here.
    pub fn merge(&mut self, other: &PartialGrid) {
        for (pos, cell) in other.iter() {
            self.cells.insert(pos, cell);
            match self.bounds.as_mut() {
                Some(bounds) => bounds.include(pos),
                None => self.bounds = Some(GridBounds::around(pos)),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells.iter().map(|(pos, cell)| (*pos, *cell))
    }
}
