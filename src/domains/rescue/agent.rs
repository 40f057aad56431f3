use super::events::RescuerEvent;
use super::genetic::{GeneticConfig, RescueRouteOptimizer, RouteOptimization};
use crate::common::{DomainError, DomainResult};
use crate::domains::logger::{AgentLogger, DynLogger};
use crate::domains::world::{Coord, DynPriority, DynSeverity, PartialGrid, Victim};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RescuerStatus {
    Waiting,
    Assigned,
    Planned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescuePlan {
    pub rescuer_id: String,
    pub assigned: Vec<u32>,
    /// `None` when the rescuer had no victims to plan for.
    pub optimization: Option<RouteOptimization>,
}

/// Waits for the exploration phase, then plans a route over the victims of its cluster.
#[derive(Debug)]
pub struct RescuerAgent {
    id: String,
    index: usize,
    start: Coord,
    initial_energy: f64,
    genetic: GeneticConfig,
    status: RescuerStatus,
    victims: Vec<Victim>,
    plan: Option<RescuePlan>,
    logger: AgentLogger,
    uncommitted_events: Vec<RescuerEvent>,
}

impl RescuerAgent {
    pub fn new(
        index: usize,
        start: Coord,
        initial_energy: f64,
        genetic: GeneticConfig,
        logger: DynLogger,
    ) -> Self {
        let id = format!("Rescuer_{}", index);
        Self {
            logger: AgentLogger::new(id.clone(), logger),
            id,
            index,
            start,
            initial_energy,
            genetic,
            status: RescuerStatus::Waiting,
            victims: Vec::new(),
            plan: None,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn status(&self) -> RescuerStatus {
        self.status
    }

    pub fn victims(&self) -> &[Victim] {
        &self.victims
    }

    pub fn plan(&self) -> Option<&RescuePlan> {
        self.plan.as_ref()
    }

    pub fn uncommitted_events(&self) -> &[RescuerEvent] {
        &self.uncommitted_events
    }

    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    pub fn assign(&mut self, victims: Vec<Victim>) -> DomainResult<()> {
        if self.status == RescuerStatus::Planned {
            return Err(DomainError::InvalidCommand {
                reason: format!("{} already planned its route", self.id),
            });
        }
        let seqs: Vec<u32> = victims.iter().map(|v| v.seq).collect();
        self.logger
            .info(&format!("assigned {} victims: {:?}", seqs.len(), seqs));
        self.uncommitted_events.push(RescuerEvent::VictimsAssigned {
            agent_id: self.id.clone(),
            victims: seqs,
            timestamp: Utc::now(),
        });
        self.victims = victims;
        self.status = RescuerStatus::Assigned;
        Ok(())
    }

    /// Runs the route optimizer over the merged grid. Only valid once victims were assigned.
    pub fn start_work(
        &mut self,
        grid: &PartialGrid,
        severity: DynSeverity,
        priority: DynPriority,
    ) -> DomainResult<&RescuePlan> {
        if self.status != RescuerStatus::Assigned {
            return Err(DomainError::InvalidCommand {
                reason: format!("{} cannot start work while {:?}", self.id, self.status),
            });
        }
        let assigned: Vec<u32> = self.victims.iter().map(|v| v.seq).collect();

        let optimization = if self.victims.is_empty() {
            self.logger.info("no victims in my cluster, staying at base");
            self.uncommitted_events.push(RescuerEvent::NothingToRescue {
                agent_id: self.id.clone(),
                timestamp: Utc::now(),
            });
            None
        } else {
            let mut config = self.genetic.clone();
            // distinct but reproducible streams per rescuer
            config.seed = config.seed.map(|seed| seed.wrapping_add(self.index as u64));
            let mut optimizer = RescueRouteOptimizer::new(
                config,
                grid.clone(),
                self.start,
                &self.victims,
                self.initial_energy,
                severity,
                priority,
            )?;
            let result = optimizer.run()?;
            self.logger.info(&format!(
                "best route fitness {:.2} (generation {}), rescues {:?}, leftover energy {:.2}",
                result.fitness, result.generation, result.rescued, result.leftover_energy
            ));
            self.uncommitted_events.push(RescuerEvent::PlanComputed {
                agent_id: self.id.clone(),
                fitness: result.fitness,
                rescued: result.rescued.clone(),
                route_length: result.route.len(),
                timestamp: Utc::now(),
            });
            Some(result)
        };

        self.status = RescuerStatus::Planned;
        let plan = self.plan.insert(RescuePlan {
            rescuer_id: self.id.clone(),
            assigned,
            optimization,
        });
        Ok(&*plan)
    }
}
