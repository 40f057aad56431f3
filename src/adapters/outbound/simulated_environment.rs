use crate::adapters::inbound::Scenario;
use crate::domains::world::{CellKind, Coord, Environment, Move, MoveOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the simulated body charges against its budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentCosts {
    pub cost_line: f64,
    pub cost_diag: f64,
    pub cost_read: f64,
}

impl Default for EnvironmentCosts {
    fn default() -> Self {
        Self {
            cost_line: 1.0,
            cost_diag: 1.5,
            cost_read: 2.0,
        }
    }
}

/// One agent body moving over a shared ground-truth scenario.
#[derive(Debug, Clone)]
pub struct SimulatedEnvironment {
    scenario: Arc<Scenario>,
    costs: EnvironmentCosts,
    position: Coord,
    budget: f64,
}

impl SimulatedEnvironment {
    pub fn new(scenario: Arc<Scenario>, time_limit: f64, costs: EnvironmentCosts) -> Self {
        let position = scenario.base();
        Self {
            scenario,
            costs,
            position,
            budget: time_limit,
        }
    }

    /// Position relative to the base.
    pub fn position(&self) -> Coord {
        self.scenario.to_relative(self.position)
    }
}

impl Environment for SimulatedEnvironment {
    fn attempt_move(&mut self, mv: Move) -> MoveOutcome {
        let target = self.position + mv;
        match self.scenario.cost(target) {
            Some(cost) => {
                let base = if mv.is_diagonal() {
                    self.costs.cost_diag
                } else {
                    self.costs.cost_line
                };
                self.budget -= base * cost;
                self.position = target;
                MoveOutcome::Executed
            }
            None => {
                self.budget -= self.costs.cost_line;
                MoveOutcome::Bumped
            }
        }
    }

    fn sense_neighbors(&self) -> [CellKind; 8] {
        Move::SENSOR_ORDER.map(|mv| {
            let pos = self.position + mv;
            if pos == self.scenario.base() {
                CellKind::Start
            } else if self.scenario.is_open(pos) {
                CellKind::Free
            } else {
                CellKind::Blocked
            }
        })
    }

    fn sense_victim_here(&self) -> Option<u32> {
        self.scenario.victim_at(self.position).map(|v| v.seq)
    }

    fn read_vital_signs(&mut self) -> Vec<f64> {
        self.budget -= self.costs.cost_read;
        self.scenario
            .victim_at(self.position)
            .map(|v| v.vital_signs.clone())
            .unwrap_or_default()
    }

    fn remaining_budget(&self) -> f64 {
        self.budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(map: &str) -> SimulatedEnvironment {
        let scenario = Arc::new(Scenario::parse_map(map).unwrap());
        SimulatedEnvironment::new(scenario, 100.0, EnvironmentCosts::default())
    }

    #[test]
    fn charges_cell_cost_times_move_base() {
        let mut env = env("B3\n.2");
        assert_eq!(env.attempt_move(Move::E), MoveOutcome::Executed);
        assert_eq!(env.remaining_budget(), 97.0);
        assert_eq!(env.attempt_move(Move::SW), MoveOutcome::Executed);
        assert_eq!(env.remaining_budget(), 95.5);
        assert_eq!(env.position(), Coord::new(0, 1));
    }

    #[test]
    fn bump_costs_a_line_move_and_keeps_position() {
        let mut env = env("B#");
        assert_eq!(env.attempt_move(Move::E), MoveOutcome::Bumped);
        assert_eq!(env.attempt_move(Move::N), MoveOutcome::Bumped);
        assert_eq!(env.remaining_budget(), 98.0);
        assert_eq!(env.position(), Coord::ORIGIN);
    }

    #[test]
    fn senses_in_sensor_order() {
        let env = env("...\n.B#\n...");
        let sensed = env.sense_neighbors();
        assert_eq!(sensed[0], CellKind::Free);
        assert_eq!(sensed[2], CellKind::Blocked);
    }
}
