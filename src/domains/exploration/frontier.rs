//! Depth-first frontier exploration driven only by locally sensed neighbors.

use crate::domains::world::{CellKind, Coord, Move};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontierMode {
    Exploring,
    Backtracking,
}

#[derive(Debug, Clone)]
pub struct FrontierExplorer {
    order: [Move; 8],
    rotation: usize,
    visited: HashSet<Coord>,
    history: Vec<Move>,
    backtrack: Vec<Move>,
    mode: FrontierMode,
}

impl FrontierExplorer {
    /// The canonical order is rotated right by `agent_index * 2` so agents leaving the same
    /// origin take different first directions.
    pub fn new(agent_index: usize, origin: Coord) -> Self {
        let rotation = (agent_index * 2) % Move::SENSOR_ORDER.len();
        let mut order = Move::SENSOR_ORDER;
        order.rotate_right(rotation);
        let mut visited = HashSet::new();
        visited.insert(origin);
        Self {
            order,
            rotation,
            visited,
            history: Vec::new(),
            backtrack: Vec::new(),
            mode: FrontierMode::Exploring,
        }
    }

    pub fn move_order(&self) -> &[Move; 8] {
        &self.order
    }

    pub fn mode(&self) -> FrontierMode {
        self.mode
    }

    pub fn has_visited(&self, pos: Coord) -> bool {
        self.visited.contains(&pos)
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Next move from `position`, given neighbor classifications in `Move::SENSOR_ORDER`.
    ///
    /// Returns `None` once there is neither an unvisited traversable neighbor nor any history
    /// left to unwind.
    pub fn next_move(&mut self, position: Coord, sensed: &[CellKind; 8]) -> Option<Move> {
        let mut rotated = *sensed;
        rotated.rotate_right(self.rotation);

        for (mv, kind) in self.order.iter().zip(rotated.iter()) {
            let target = position + *mv;
            if kind.is_traversable() && !self.visited.contains(&target) {
                self.visited.insert(target);
                self.backtrack.clear();
                self.mode = FrontierMode::Exploring;
                return Some(*mv);
            }
        }

        if self.backtrack.is_empty() {
            // owned snapshot; later pushes to history must not leak into it
            self.backtrack = self.history.clone();
        }
        let last = self.backtrack.pop()?;
        self.mode = FrontierMode::Backtracking;
        Some(last.reversed())
    }

    /// Records a move the environment actually executed.
    pub fn record_executed(&mut self, mv: Move) {
        self.history.push(mv);
    }

    /// Reverses the most recent executed move, dropping it from the history.
    pub fn retreat(&mut self) -> Option<Move> {
        self.history.pop().map(Move::reversed)
    }
}
