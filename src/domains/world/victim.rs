use super::types::Coord;
use serde::{Deserialize, Serialize};

/// Positions of the severity inputs inside a vital-sign record
/// `[seq, systolic, diastolic, qPA, pulse, resp_rate, ...]`.
pub const QPA_INDEX: usize = 3;
pub const PULSE_INDEX: usize = 4;
pub const RESP_RATE_INDEX: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Victim {
    pub seq: u32,
    pub position: Coord,
    pub vital_signs: Vec<f64>,
}

impl Victim {
    pub fn new(seq: u32, position: Coord, vital_signs: Vec<f64>) -> Self {
        Self {
            seq,
            position,
            vital_signs,
        }
    }

    /// `(qPA, pulse, resp_rate)` when the record is long enough.
    pub fn severity_inputs(&self) -> Option<(f64, f64, f64)> {
        Some((
            *self.vital_signs.get(QPA_INDEX)?,
            *self.vital_signs.get(PULSE_INDEX)?,
            *self.vital_signs.get(RESP_RATE_INDEX)?,
        ))
    }
}
