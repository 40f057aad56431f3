use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RescuerEvent {
    VictimsAssigned {
        agent_id: String,
        victims: Vec<u32>,
        timestamp: DateTime<Utc>,
    },
    PlanComputed {
        agent_id: String,
        fitness: f64,
        rescued: Vec<u32>,
        route_length: usize,
        timestamp: DateTime<Utc>,
    },
    NothingToRescue {
        agent_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for RescuerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RescuerEvent::VictimsAssigned { .. } => "VictimsAssigned",
            RescuerEvent::PlanComputed { .. } => "RescuePlanComputed",
            RescuerEvent::NothingToRescue { .. } => "NothingToRescue",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            RescuerEvent::VictimsAssigned { agent_id, .. }
            | RescuerEvent::PlanComputed { agent_id, .. }
            | RescuerEvent::NothingToRescue { agent_id, .. } => agent_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RescuerEvent::VictimsAssigned { timestamp, .. }
            | RescuerEvent::PlanComputed { timestamp, .. }
            | RescuerEvent::NothingToRescue { timestamp, .. } => *timestamp,
        }
    }
}
