use super::agent::ExplorerStatus;
use crate::common::DomainEvent;
use crate::domains::world::Coord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExplorerEvent {
    Moved {
        agent_id: String,
        position: Coord,
        cost: f64,
        timestamp: DateTime<Utc>,
    },
    Bumped {
        agent_id: String,
        position: Coord,
        returning: bool,
        timestamp: DateTime<Utc>,
    },
    VictimFound {
        agent_id: String,
        seq: u32,
        position: Coord,
        timestamp: DateTime<Utc>,
    },
    ReturnDeferred {
        agent_id: String,
        path_cost: f64,
        new_threshold: f64,
        timestamp: DateTime<Utc>,
    },
    ReturnCommitted {
        agent_id: String,
        path_cost: f64,
        waypoints: usize,
        timestamp: DateTime<Utc>,
    },
    ForcedReturn {
        agent_id: String,
        position: Coord,
        timestamp: DateTime<Utc>,
    },
    StatusChanged {
        agent_id: String,
        new_status: ExplorerStatus,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for ExplorerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ExplorerEvent::Moved { .. } => "ExplorerMoved",
            ExplorerEvent::Bumped { .. } => "ExplorerBumped",
            ExplorerEvent::VictimFound { .. } => "VictimFound",
            ExplorerEvent::ReturnDeferred { .. } => "ReturnDeferred",
            ExplorerEvent::ReturnCommitted { .. } => "ReturnCommitted",
            ExplorerEvent::ForcedReturn { .. } => "ForcedReturn",
            ExplorerEvent::StatusChanged { .. } => "ExplorerStatusChanged",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            ExplorerEvent::Moved { agent_id, .. } => agent_id,
            ExplorerEvent::Bumped { agent_id, .. } => agent_id,
            ExplorerEvent::VictimFound { agent_id, .. } => agent_id,
            ExplorerEvent::ReturnDeferred { agent_id, .. } => agent_id,
            ExplorerEvent::ReturnCommitted { agent_id, .. } => agent_id,
            ExplorerEvent::ForcedReturn { agent_id, .. } => agent_id,
            ExplorerEvent::StatusChanged { agent_id, .. } => agent_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ExplorerEvent::Moved { timestamp, .. } => *timestamp,
            ExplorerEvent::Bumped { timestamp, .. } => *timestamp,
            ExplorerEvent::VictimFound { timestamp, .. } => *timestamp,
            ExplorerEvent::ReturnDeferred { timestamp, .. } => *timestamp,
            ExplorerEvent::ReturnCommitted { timestamp, .. } => *timestamp,
            ExplorerEvent::ForcedReturn { timestamp, .. } => *timestamp,
            ExplorerEvent::StatusChanged { timestamp, .. } => *timestamp,
        }
    }
}
