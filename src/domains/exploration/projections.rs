use super::agent::ExplorerStatus;
use super::events::ExplorerEvent;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read model of one explorer, rebuilt from its events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSummary {
    pub agent_id: String,
    pub moves: usize,
    pub bumps: usize,
    pub victims_found: usize,
    pub deferred_returns: usize,
    pub status: ExplorerStatus,
    pub last_activity: Option<DateTime<Utc>>,
}

impl ExplorerSummary {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            moves: 0,
            bumps: 0,
            victims_found: 0,
            deferred_returns: 0,
            status: ExplorerStatus::Exploring,
            last_activity: None,
        }
    }

    pub fn apply_event(&mut self, event: &ExplorerEvent) {
        if event.aggregate_id() != self.agent_id {
            return;
        }
        match event {
            ExplorerEvent::Moved { .. } => self.moves += 1,
            ExplorerEvent::Bumped { .. } => self.bumps += 1,
            ExplorerEvent::VictimFound { .. } => self.victims_found += 1,
            ExplorerEvent::ReturnDeferred { .. } => self.deferred_returns += 1,
            ExplorerEvent::StatusChanged { new_status, .. } => self.status = *new_status,
            ExplorerEvent::ReturnCommitted { .. } | ExplorerEvent::ForcedReturn { .. } => {}
        }
        self.last_activity = Some(event.occurred_at());
    }
}
