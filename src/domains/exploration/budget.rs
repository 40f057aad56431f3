//! Decides each cycle whether an explorer keeps exploring or heads home.

use crate::domains::path_planning::{Heuristic, ReturnPathPlanner};
use crate::domains::world::{Coord, PartialGrid};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BudgetDecision {
    /// Budget is comfortable; keep exploring.
    Explore,
    /// A return path was planned but the margin is still wide. The threshold was raised.
    Defer { path_cost: f64, new_threshold: f64 },
    /// Follow these waypoints home (current cell excluded).
    Commit { path: Vec<Coord>, path_cost: f64 },
    /// No known path home: reverse the last move and never resume exploring.
    BackStep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetController {
    threshold: f64,
    safety_factor: f64,
    heuristic: Heuristic,
    forced_return: bool,
}

impl BudgetController {
    /// `initial_threshold` is usually `ceil(time_limit * comeback_fraction)`.
    pub fn new(initial_threshold: f64, safety_factor: f64) -> Self {
        Self {
            threshold: initial_threshold,
            safety_factor,
            heuristic: Heuristic::default(),
            forced_return: false,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_forced_return(&self) -> bool {
        self.forced_return
    }

    /// Makes the next `evaluate` plan regardless of the remaining budget.
    pub fn request_return(&mut self) {
        self.threshold = f64::INFINITY;
    }

    /// One decision cycle. Callers stop invoking this once a path is committed.
    pub fn evaluate(
        &mut self,
        remaining: f64,
        grid: &PartialGrid,
        position: Coord,
        origin: Coord,
    ) -> BudgetDecision {
        if self.forced_return {
            return BudgetDecision::BackStep;
        }
        if remaining > self.threshold {
            return BudgetDecision::Explore;
        }

        let result = ReturnPathPlanner::new(grid)
            .with_heuristic(self.heuristic)
            .find_path(position, origin);

        if !result.found {
            debug!("[Budget] no path home from {}, forcing return", position);
            self.forced_return = true;
            return BudgetDecision::BackStep;
        }

        if remaining <= result.cost * self.safety_factor {
            let path = result.path.into_iter().skip(1).collect();
            BudgetDecision::Commit {
                path,
                path_cost: result.cost,
            }
        } else {
            self.threshold = result.cost + remaining / 2.0;
            debug!(
                "[Budget] path cost {:.2} with {:.2} remaining, threshold now {:.2}",
                result.cost, remaining, self.threshold
            );
            BudgetDecision::Defer {
                path_cost: result.cost,
                new_threshold: self.threshold,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::world::CellKind;

    fn corridor(len: i32) -> PartialGrid {
        let mut grid = PartialGrid::new();
        grid.observe(Coord::ORIGIN, 1.0, CellKind::Start);
        for x in 1..len {
            grid.observe(Coord::new(x, 0), 1.0, CellKind::Free);
        }
        grid
    }

    #[test]
    fn explores_above_threshold() {
        let mut controller = BudgetController::new(60.0, 1.6);
        let grid = corridor(5);
        let decision = controller.evaluate(80.0, &grid, Coord::new(4, 0), Coord::ORIGIN);
        assert_eq!(decision, BudgetDecision::Explore);
    }

    #[test]
    fn defers_and_raises_threshold_when_margin_is_wide() {
        let mut controller = BudgetController::new(60.0, 1.6);
        let grid = corridor(5);
        // cost home is 4, 50 remaining > 6.4
        let decision = controller.evaluate(50.0, &grid, Coord::new(4, 0), Coord::ORIGIN);
        assert_eq!(
            decision,
            BudgetDecision::Defer {
                path_cost: 4.0,
                new_threshold: 29.0
            }
        );
        assert_eq!(controller.threshold(), 29.0);
        assert_eq!(
            controller.evaluate(40.0, &grid, Coord::new(4, 0), Coord::ORIGIN),
            BudgetDecision::Explore
        );
    }

    #[test]
    fn commits_when_budget_is_tight() {
        let mut controller = BudgetController::new(60.0, 1.6);
        let grid = corridor(5);
        match controller.evaluate(6.0, &grid, Coord::new(4, 0), Coord::ORIGIN) {
            BudgetDecision::Commit { path, path_cost } => {
                assert_eq!(path_cost, 4.0);
                assert_eq!(path.first(), Some(&Coord::new(3, 0)));
                assert_eq!(path.last(), Some(&Coord::ORIGIN));
                assert_eq!(path.len(), 4);
            }
            other => panic!("expected Commit, got {:?}", other),
        }
    }

    #[test]
    fn missing_path_forces_return_for_good() {
        let mut controller = BudgetController::new(60.0, 1.6);
        let mut grid = corridor(5);
        grid.observe(Coord::new(2, 0), 1.0, CellKind::Blocked);
        assert_eq!(
            controller.evaluate(10.0, &grid, Coord::new(4, 0), Coord::ORIGIN),
            BudgetDecision::BackStep
        );
        assert!(controller.is_forced_return());
        // even a comfortable budget does not bring exploration back
        assert_eq!(
            controller.evaluate(1000.0, &corridor(5), Coord::new(4, 0), Coord::ORIGIN),
            BudgetDecision::BackStep
        );
    }
}
