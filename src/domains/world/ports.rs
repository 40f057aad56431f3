use super::types::{CellKind, Move};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Executed,
    Bumped,
}

/// Port to the physical simulation, one instance per agent body.
/// The core only consumes this contract; movement itself happens elsewhere.
pub trait Environment: Send {
    fn attempt_move(&mut self, mv: Move) -> MoveOutcome;

    /// Classifications of the 8 neighbors in `Move::SENSOR_ORDER`.
    fn sense_neighbors(&self) -> [CellKind; 8];

    /// Sequence number of the victim at the current cell, if any.
    fn sense_victim_here(&self) -> Option<u32>;

    fn read_vital_signs(&mut self) -> Vec<f64>;

    fn remaining_budget(&self) -> f64;
}

/// Opaque victim severity score. Larger means more urgent.
pub trait SeverityEstimator: Send + Sync {
    fn severity(&self, q_pa: f64, pulse: f64, resp_rate: f64) -> f64;
}

/// Opaque rescue priority score. Larger is never worse.
pub trait PriorityEstimator: Send + Sync {
    fn priority(&self, difficulty: f64, severity: f64, distance: f64, rescued_so_far: usize) -> f64;
}

impl<F> SeverityEstimator for F
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn severity(&self, q_pa: f64, pulse: f64, resp_rate: f64) -> f64 {
        self(q_pa, pulse, resp_rate)
    }
}

impl<F> PriorityEstimator for F
where
    F: Fn(f64, f64, f64, usize) -> f64 + Send + Sync,
{
    fn priority(&self, difficulty: f64, severity: f64, distance: f64, rescued_so_far: usize) -> f64 {
        self(difficulty, severity, distance, rescued_so_far)
    }
}

pub type DynSeverity = Arc<dyn SeverityEstimator>;
pub type DynPriority = Arc<dyn PriorityEstimator>;
