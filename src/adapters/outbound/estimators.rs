//! Built-in severity and priority scorers plugged into the rescue optimizer.

use crate::domains::world::{PriorityEstimator, SeverityEstimator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Normal,
    High,
}

/// Triage class of a victim, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriageClass {
    Critical,
    Unstable,
    PotentiallyStable,
    Stable,
}

impl TriageClass {
    /// Urgency score; larger is more urgent.
    pub fn urgency(&self) -> f64 {
        match self {
            TriageClass::Critical => 4.0,
            TriageClass::Unstable => 3.0,
            TriageClass::PotentiallyStable => 2.0,
            TriageClass::Stable => 1.0,
        }
    }
}

use TriageClass::{Critical as C, PotentiallyStable as P, Stable as S, Unstable as U};

/// Indexed by qPA band, then pulse band, then respiration band (low, normal, high).
const RULES: [[[TriageClass; 3]; 3]; 3] = [
    // qPA low
    [[C, U, C], [U, P, P], [C, P, C]],
    // qPA normal
    [[U, P, U], [P, S, P], [U, U, U]],
    // qPA high
    [[C, U, C], [U, P, U], [C, U, C]],
];

/// Crisp vital-sign rule table. Band limits sit where the neighbouring membership functions
/// of the rule base cross.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalRuleSeverity {
    pub q_pa_low: f64,
    pub q_pa_high: f64,
    pub pulse_low: f64,
    pub pulse_high: f64,
    pub resp_low: f64,
    pub resp_high: f64,
}

impl Default for VitalRuleSeverity {
    fn default() -> Self {
        Self {
            q_pa_low: -6.15,
            q_pa_high: 6.15,
            pulse_low: 48.0,
            pulse_high: 128.0,
            resp_low: 11.0,
            resp_high: 18.3,
        }
    }
}

fn band(value: f64, low: f64, high: f64) -> Band {
    if value <= low {
        Band::Low
    } else if value >= high {
        Band::High
    } else {
        Band::Normal
    }
}

impl VitalRuleSeverity {
    pub fn classify(&self, q_pa: f64, pulse: f64, resp_rate: f64) -> TriageClass {
        let idx = |b: Band| match b {
            Band::Low => 0,
            Band::Normal => 1,
            Band::High => 2,
        };
        RULES[idx(band(q_pa, self.q_pa_low, self.q_pa_high))]
            [idx(band(pulse, self.pulse_low, self.pulse_high))]
            [idx(band(resp_rate, self.resp_low, self.resp_high))]
    }
}

impl SeverityEstimator for VitalRuleSeverity {
    fn severity(&self, q_pa: f64, pulse: f64, resp_rate: f64) -> f64 {
        self.classify(q_pa, pulse, resp_rate).urgency()
    }
}

/// Weighted sum favouring severe victims that are cheap and close to reach, and early rescues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPriorityModel {
    pub severity_weight: f64,
    pub difficulty_weight: f64,
    pub distance_weight: f64,
    pub order_weight: f64,
}

impl Default for LinearPriorityModel {
    fn default() -> Self {
        Self {
            severity_weight: 0.5,
            difficulty_weight: 1.0,
            distance_weight: 1.0,
            order_weight: 0.5,
        }
    }
}

impl PriorityEstimator for LinearPriorityModel {
    fn priority(&self, difficulty: f64, severity: f64, distance: f64, rescued_so_far: usize) -> f64 {
        self.severity_weight * severity
            + self.difficulty_weight / (1.0 + difficulty.max(0.0))
            + self.distance_weight / (1.0 + distance.max(0.0))
            + self.order_weight / rescued_so_far.max(1) as f64
    }
}
