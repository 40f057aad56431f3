use super::budget::{BudgetController, BudgetDecision};
use super::events::ExplorerEvent;
use super::frontier::{FrontierExplorer, FrontierMode};
use crate::domains::logger::{AgentLogger, DynLogger};
use crate::domains::path_planning::Heuristic;
use crate::domains::world::{
    CellKind, Coord, Environment, Move, MoveOutcome, PartialGrid, Victim, BLOCKED_COST,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorerStatus {
    Exploring,
    Returning,
    ForcedReturn,
    Finished,
    TimedOut,
}

impl ExplorerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExplorerStatus::Finished | ExplorerStatus::TimedOut)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSettings {
    pub time_limit: f64,
    /// Budget charged per unit of cell cost for an orthogonal move.
    pub cost_line: f64,
    /// Budget charged per unit of cell cost for a diagonal move.
    pub cost_diag: f64,
    pub comeback_fraction: f64,
    pub safety_factor: f64,
    pub heuristic: Heuristic,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            time_limit: 1000.0,
            cost_line: 1.0,
            cost_diag: 1.5,
            comeback_fraction: 0.6,
            safety_factor: 1.6,
            heuristic: Heuristic::Euclidean,
        }
    }
}

/// One exploring agent. Owns its grid and victim set exclusively until the mission merges them.
#[derive(Debug)]
pub struct ExplorerAgent {
    id: String,
    index: usize,
    origin: Coord,
    position: Coord,
    status: ExplorerStatus,
    settings: ExplorerSettings,
    grid: PartialGrid,
    victims: BTreeMap<u32, Victim>,
    frontier: FrontierExplorer,
    budget: BudgetController,
    return_path: VecDeque<Coord>,
    ticks: u64,
    logger: AgentLogger,
    uncommitted_events: Vec<ExplorerEvent>,
}

impl ExplorerAgent {
    pub fn new(index: usize, settings: ExplorerSettings, logger: DynLogger) -> Self {
        let id = format!("Explorer_{}", index);
        let origin = Coord::ORIGIN;
        let threshold = (settings.time_limit * settings.comeback_fraction).ceil();
        let budget = BudgetController::new(threshold, settings.safety_factor)
            .with_heuristic(settings.heuristic);

        let mut grid = PartialGrid::new();
        grid.observe(origin, 1.0, CellKind::Start);

        Self {
            logger: AgentLogger::new(id.clone(), logger),
            id,
            index,
            origin,
            position: origin,
            status: ExplorerStatus::Exploring,
            settings,
            grid,
            victims: BTreeMap::new(),
            frontier: FrontierExplorer::new(index, origin),
            budget,
            return_path: VecDeque::new(),
            ticks: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn status(&self) -> ExplorerStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn grid(&self) -> &PartialGrid {
        &self.grid
    }

    pub fn victims(&self) -> &BTreeMap<u32, Victim> {
        &self.victims
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn comeback_threshold(&self) -> f64 {
        self.budget.threshold()
    }

    pub fn uncommitted_events(&self) -> &[ExplorerEvent] {
        &self.uncommitted_events
    }

    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: ExplorerEvent) {
        self.uncommitted_events.push(event);
    }

    fn set_status(&mut self, new_status: ExplorerStatus) {
        if self.status == new_status {
            return;
        }
        self.status = new_status;
        self.logger.info(&format!(
            "status {:?} at {} after {} ticks",
            new_status, self.position, self.ticks
        ));
        self.add_event(ExplorerEvent::StatusChanged {
            agent_id: self.id.clone(),
            new_status,
            timestamp: Utc::now(),
        });
    }

    /// One decision cycle. Returns `false` once the agent has reached a terminal state.
    pub fn deliberate(&mut self, env: &mut dyn Environment) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        let remaining = env.remaining_budget();
        if remaining <= 0.0 {
            self.logger
                .warn(&format!("budget exhausted at {}", self.position));
            self.set_status(ExplorerStatus::TimedOut);
            return false;
        }
        self.ticks += 1;

        match self.status {
            ExplorerStatus::Exploring => {
                match self
                    .budget
                    .evaluate(remaining, &self.grid, self.position, self.origin)
                {
                    BudgetDecision::Explore => self.explore(env),
                    BudgetDecision::Defer {
                        path_cost,
                        new_threshold,
                    } => {
                        self.add_event(ExplorerEvent::ReturnDeferred {
                            agent_id: self.id.clone(),
                            path_cost,
                            new_threshold,
                            timestamp: Utc::now(),
                        });
                        self.explore(env);
                    }
                    BudgetDecision::Commit { path, path_cost } => {
                        self.logger.info(&format!(
                            "returning home: {} waypoints, cost {:.2}, budget {:.2}",
                            path.len(),
                            path_cost,
                            remaining
                        ));
                        self.add_event(ExplorerEvent::ReturnCommitted {
                            agent_id: self.id.clone(),
                            path_cost,
                            waypoints: path.len(),
                            timestamp: Utc::now(),
                        });
                        self.return_path = path.into();
                        self.set_status(ExplorerStatus::Returning);
                        self.come_back(env);
                    }
                    BudgetDecision::BackStep => {
                        self.logger.warn(&format!(
                            "no known path home from {}, backing out step by step",
                            self.position
                        ));
                        self.add_event(ExplorerEvent::ForcedReturn {
                            agent_id: self.id.clone(),
                            position: self.position,
                            timestamp: Utc::now(),
                        });
                        self.set_status(ExplorerStatus::ForcedReturn);
                        self.back_step(env);
                    }
                }
            }
            ExplorerStatus::Returning => self.come_back(env),
            ExplorerStatus::ForcedReturn => self.back_step(env),
            ExplorerStatus::Finished | ExplorerStatus::TimedOut => {}
        }

        if self.position == self.origin
            && matches!(
                self.status,
                ExplorerStatus::Returning | ExplorerStatus::ForcedReturn
            )
        {
            self.set_status(ExplorerStatus::Finished);
        }

        !self.status.is_terminal()
    }

    fn explore(&mut self, env: &mut dyn Environment) {
        let sensed = env.sense_neighbors();
        let next = self.frontier.next_move(self.position, &sensed);

        let at_origin = self.position == self.origin;
        let mv = match next {
            // back at the base with nothing new around it: the reachable area is covered
            Some(_) if at_origin && self.frontier.mode() == FrontierMode::Backtracking => {
                self.set_status(ExplorerStatus::Finished);
                return;
            }
            Some(mv) => mv,
            None if at_origin => {
                self.set_status(ExplorerStatus::Finished);
                return;
            }
            None => {
                self.logger.warn(&format!(
                    "nothing left to unwind at {}, planning the way home",
                    self.position
                ));
                self.budget.request_return();
                return;
            }
        };

        let before = env.remaining_budget();
        match env.attempt_move(mv) {
            MoveOutcome::Bumped => {
                let target = self.position + mv;
                self.grid.observe(target, BLOCKED_COST, CellKind::Blocked);
                self.logger.warn(&format!("wall or grid limit reached at {}", target));
                self.add_event(ExplorerEvent::Bumped {
                    agent_id: self.id.clone(),
                    position: target,
                    returning: false,
                    timestamp: Utc::now(),
                });
            }
            MoveOutcome::Executed => {
                let cost = self.measure_cost(mv, before, env.remaining_budget());
                self.frontier.record_executed(mv);
                self.position = self.position + mv;
                self.record_cell(cost);
                self.check_for_victim(env);
            }
        }
    }

    fn come_back(&mut self, env: &mut dyn Environment) {
        let Some(&waypoint) = self.return_path.front() else {
            return;
        };
        let Some(mv) = Move::between(self.position, waypoint) else {
            self.logger.error(&format!(
                "waypoint {} is not adjacent to {}, skipping it",
                waypoint, self.position
            ));
            self.return_path.pop_front();
            return;
        };

        let before = env.remaining_budget();
        match env.attempt_move(mv) {
            MoveOutcome::Executed => {
                let cost = self.measure_cost(mv, before, env.remaining_budget());
                self.return_path.pop_front();
                self.frontier.record_executed(mv);
                self.position = waypoint;
                self.record_cell(cost);
            }
            MoveOutcome::Bumped => {
                // committed paths are trusted: report, keep the waypoint, no replanning
                self.logger.warn(&format!(
                    "bumped at {} while coming back",
                    waypoint
                ));
                self.add_event(ExplorerEvent::Bumped {
                    agent_id: self.id.clone(),
                    position: waypoint,
                    returning: true,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    fn back_step(&mut self, env: &mut dyn Environment) {
        let Some(mv) = self.frontier.retreat() else {
            return;
        };
        match env.attempt_move(mv) {
            MoveOutcome::Executed => {
                self.position = self.position + mv;
            }
            MoveOutcome::Bumped => {
                self.logger.warn(&format!(
                    "bumped at {} while backing out",
                    self.position + mv
                ));
                self.add_event(ExplorerEvent::Bumped {
                    agent_id: self.id.clone(),
                    position: self.position + mv,
                    returning: true,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Cell cost derived from the budget the move consumed, normalized by the move's base cost.
    fn measure_cost(&self, mv: Move, before: f64, after: f64) -> f64 {
        let base = if mv.is_diagonal() {
            self.settings.cost_diag
        } else {
            self.settings.cost_line
        };
        if base > 0.0 {
            (before - after) / base
        } else {
            before - after
        }
    }

    fn record_cell(&mut self, cost: f64) {
        let kind = if self.position == self.origin {
            CellKind::Start
        } else {
            CellKind::Free
        };
        self.grid.observe(self.position, cost, kind);
        self.add_event(ExplorerEvent::Moved {
            agent_id: self.id.clone(),
            position: self.position,
            cost,
            timestamp: Utc::now(),
        });
    }

    fn check_for_victim(&mut self, env: &mut dyn Environment) {
        let Some(seq) = env.sense_victim_here() else {
            return;
        };
        if self.victims.contains_key(&seq) {
            return;
        }
        let vital_signs = env.read_vital_signs();
        self.logger.info(&format!(
            "victim {} found at {}, vital signs {:?}",
            seq, self.position, vital_signs
        ));
        self.victims
            .insert(seq, Victim::new(seq, self.position, vital_signs));
        self.add_event(ExplorerEvent::VictimFound {
            agent_id: self.id.clone(),
            seq,
            position: self.position,
            timestamp: Utc::now(),
        });
    }
}
