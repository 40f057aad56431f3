//! A* search over a [`PartialGrid`].
//!
//! Search bookkeeping (g, parent links, closed set) lives in maps owned by one invocation; the
//! grid itself is never mutated. Heap ordering is an explicit comparator on [`SearchNode`], while
//! visited-set identity is the plain [`Coord`] key.

use crate::domains::world::{Coord, Move, PartialGrid};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Heuristic {
    /// Straight-line distance. Not admissible here: a diagonal step costs the destination cell's
    /// cost (1 on open ground) while this estimates it at sqrt(2), so returned paths can be
    /// longer than optimal. Use [`Heuristic::Chebyshev`] when optimality matters.
    #[default]
    Euclidean,
    /// Max of the axis distances. Admissible and consistent whenever every cost is >= 1.
    Chebyshev,
}

impl Heuristic {
    fn estimate(&self, from: Coord, to: Coord) -> f64 {
        match self {
            Heuristic::Euclidean => from.euclidean(&to),
            Heuristic::Chebyshev => from.chebyshev(&to) as f64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchNode {
    f: OrderedFloat<f64>,
    g: OrderedFloat<f64>,
    coord: Coord,
}

impl Ord for SearchNode {
    // BinaryHeap is a max-heap: the "greatest" node is the lowest f, then the highest g,
    // then the lowest coordinate.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of one search. `found == false` is an ordinary answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Start to goal inclusive; empty when no path exists.
    pub path: Vec<Coord>,
    pub cost: f64,
    pub found: bool,
    pub nodes_expanded: usize,
}

impl PathResult {
    fn not_found(nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
            found: false,
            nodes_expanded,
        }
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

pub struct ReturnPathPlanner<'a> {
    grid: &'a PartialGrid,
    heuristic: Heuristic,
}

impl<'a> ReturnPathPlanner<'a> {
    pub fn new(grid: &'a PartialGrid) -> Self {
        Self {
            grid,
            heuristic: Heuristic::default(),
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn find_path(&self, start: Coord, goal: Coord) -> PathResult {
        trace!("[AStar] find_path: start={} goal={}", start, goal);

        if start == goal {
            return PathResult {
                path: vec![start],
                cost: 0.0,
                found: true,
                nodes_expanded: 0,
            };
        }

        let mut open_set = BinaryHeap::new();
        let mut closed_set: HashSet<Coord> = HashSet::new();
        let mut came_from: HashMap<Coord, Coord> = HashMap::new();
        let mut g_scores: HashMap<Coord, f64> = HashMap::new();

        g_scores.insert(start, 0.0);
        open_set.push(SearchNode {
            f: OrderedFloat(self.heuristic.estimate(start, goal)),
            g: OrderedFloat(0.0),
            coord: start,
        });

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            if current.coord == goal {
                let path = reconstruct(&came_from, goal);
                debug!(
                    "[AStar] path found: {} steps, cost {:.2}, {} nodes expanded",
                    path.len() - 1,
                    current.g.0,
                    nodes_expanded
                );
                return PathResult {
                    path,
                    cost: current.g.0,
                    found: true,
                    nodes_expanded,
                };
            }

            if !closed_set.insert(current.coord) {
                continue;
            }
            nodes_expanded += 1;

            for mv in Move::SENSOR_ORDER {
                let neighbor = current.coord + mv;
                if closed_set.contains(&neighbor) {
                    continue;
                }
                let cell = self.grid.get(neighbor);
                if !cell.is_traversable() {
                    continue;
                }

                let tentative_g = current.g.0 + cell.cost;
                let known_g = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(SearchNode {
                        f: OrderedFloat(tentative_g + self.heuristic.estimate(neighbor, goal)),
                        g: OrderedFloat(tentative_g),
                        coord: neighbor,
                    });
                }
            }
        }

        debug!(
            "[AStar] no path from {} to {} after expanding {} nodes",
            start, goal, nodes_expanded
        );
        PathResult::not_found(nodes_expanded)
    }
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Quick search with the default heuristic.
pub fn find_path(grid: &PartialGrid, start: Coord, goal: Coord) -> PathResult {
    ReturnPathPlanner::new(grid).find_path(start, goal)
}
