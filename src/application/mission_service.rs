use crate::adapters::inbound::Scenario;
use crate::adapters::outbound::{
    EnvironmentCosts, LinearPriorityModel, SimulatedEnvironment, VitalRuleSeverity,
};
use crate::common::{ApplicationResult, DomainEvent, DomainResult};
use crate::config::Config;
use crate::domains::allocation::VictimAllocator;
use crate::domains::exploration::{ExplorerAgent, ExplorerSummary};
use crate::domains::logger::{AgentLogger, DynLogger};
use crate::domains::rescue::{RescuePlan, RescuerAgent};
use crate::domains::world::{Coord, DynPriority, DynSeverity, Environment, PartialGrid, Victim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// An explorer together with the body it drives.
pub struct ExplorerSlot {
    pub agent: ExplorerAgent,
    pub environment: Box<dyn Environment>,
    summary: ExplorerSummary,
}

impl ExplorerSlot {
    pub fn new(agent: ExplorerAgent, environment: Box<dyn Environment>) -> Self {
        let summary = ExplorerSummary::new(agent.id());
        Self {
            agent,
            environment,
            summary,
        }
    }

    pub fn summary(&self) -> &ExplorerSummary {
        &self.summary
    }

    fn tick(&mut self) -> bool {
        let active = self.agent.deliberate(self.environment.as_mut());
        for event in self.agent.uncommitted_events() {
            debug!("{} {}", event.aggregate_id(), event.event_type());
            self.summary.apply_event(event);
        }
        self.agent.mark_events_as_committed();
        active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterReport {
    pub rescuer_id: String,
    pub centroid: Option<[f64; 2]>,
    pub victims: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReport {
    pub cycles: u64,
    /// False when the cycle limit was hit before every explorer finished; rescuers then never
    /// start.
    pub exploration_complete: bool,
    pub explorers: Vec<ExplorerSummary>,
    pub merged_cells: usize,
    pub victims_found: Vec<Victim>,
    pub clusters: Vec<ClusterReport>,
    pub plans: Vec<RescuePlan>,
}

impl MissionReport {
    pub fn to_json_pretty(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives explorer ticks, then performs merge, allocation and dispatch exactly once.
pub struct MissionCoordinator {
    explorers: Vec<ExplorerSlot>,
    rescuers: Vec<RescuerAgent>,
    allocator: VictimAllocator,
    severity: DynSeverity,
    priority: DynPriority,
    logger: AgentLogger,
    cycles: u64,
    merged_grid: PartialGrid,
    merged_victims: Vec<Victim>,
    clusters: Vec<ClusterReport>,
    dispatched: bool,
}

impl MissionCoordinator {
    pub fn new(
        explorers: Vec<ExplorerSlot>,
        rescuers: Vec<RescuerAgent>,
        allocator: VictimAllocator,
        severity: DynSeverity,
        priority: DynPriority,
        logger: DynLogger,
    ) -> Self {
        Self {
            explorers,
            rescuers,
            allocator,
            severity,
            priority,
            logger: AgentLogger::new("Mission", logger),
            cycles: 0,
            merged_grid: PartialGrid::new(),
            merged_victims: Vec::new(),
            clusters: Vec::new(),
            dispatched: false,
        }
    }

    /// Wires a mission over the configured scenario with simulated bodies and the built-in
    /// estimators.
    pub fn from_config(config: &Config, logger: DynLogger) -> ApplicationResult<Self> {
        config.validate()?;
        let scenario = Arc::new(Scenario::from_config(&config.scenario)?);
        let mission = &config.mission;
        let costs = EnvironmentCosts {
            cost_line: mission.cost_line,
            cost_diag: mission.cost_diag,
            cost_read: mission.cost_read,
        };

        let explorers = (0..mission.explorers)
            .map(|i| {
                let agent = ExplorerAgent::new(i, mission.explorer_settings(), logger.clone());
                let body =
                    SimulatedEnvironment::new(scenario.clone(), mission.explorer_time_limit, costs);
                ExplorerSlot::new(agent, Box::new(body))
            })
            .collect();

        let rescuers = (0..mission.rescuers)
            .map(|i| {
                RescuerAgent::new(
                    i,
                    Coord::ORIGIN,
                    mission.rescuer_time_limit,
                    config.genetic.clone(),
                    logger.clone(),
                )
            })
            .collect();

        let allocator = VictimAllocator::new(config.allocation.clone())?;
        Ok(Self::new(
            explorers,
            rescuers,
            allocator,
            Arc::new(VitalRuleSeverity::default()),
            Arc::new(LinearPriorityModel::default()),
            logger,
        ))
    }

    pub fn explorers(&self) -> &[ExplorerSlot] {
        &self.explorers
    }

    pub fn rescuers(&self) -> &[RescuerAgent] {
        &self.rescuers
    }

    pub fn merged_grid(&self) -> &PartialGrid {
        &self.merged_grid
    }

    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    pub fn all_explorers_finished(&self) -> bool {
        self.explorers.iter().all(|slot| slot.agent.is_finished())
    }

    /// One cycle: every active explorer deliberates once. The barrier is re-checked whenever an
    /// explorer turns terminal.
    pub fn tick(&mut self) -> ApplicationResult<()> {
        self.cycles += 1;
        let mut someone_finished = false;
        for slot in self.explorers.iter_mut() {
            if slot.agent.is_finished() {
                continue;
            }
            if !slot.tick() {
                someone_finished = true;
            }
        }
        if someone_finished && !self.dispatched && self.all_explorers_finished() {
            self.dispatch()?;
        }
        Ok(())
    }

    fn merge(&mut self) {
        let mut grid = PartialGrid::new();
        let mut victims = BTreeMap::new();
        for slot in &self.explorers {
            grid.merge(slot.agent.grid());
            for (seq, victim) in slot.agent.victims() {
                victims.entry(*seq).or_insert_with(|| victim.clone());
            }
        }
        self.merged_grid = grid;
        self.merged_victims = victims.into_values().collect();
        self.logger.info(&format!(
            "merged {} known cells and {} victims from {} explorers",
            self.merged_grid.len(),
            self.merged_victims.len(),
            self.explorers.len()
        ));
    }

    fn dispatch(&mut self) -> ApplicationResult<()> {
        if self.dispatched {
            return Ok(());
        }
        self.dispatched = true;
        self.merge();

        let allocation = self
            .allocator
            .allocate(&self.merged_victims, self.rescuers.len())?;
        info!(
            "allocated {} victims into {} clusters after {} iterations",
            allocation.victims.len(),
            allocation.cluster_count(),
            allocation.iterations
        );

        for (cluster, rescuer) in self.rescuers.iter_mut().enumerate() {
            let members: Vec<Victim> = allocation.members(cluster).into_iter().cloned().collect();
            self.clusters.push(ClusterReport {
                rescuer_id: rescuer.id().to_string(),
                centroid: allocation.centroids.get(cluster).copied().flatten(),
                victims: members.iter().map(|v| v.seq).collect(),
            });
            rescuer.assign(members)?;
        }

        for rescuer in self.rescuers.iter_mut() {
            self.logger.info(&format!("{} is now active", rescuer.id()));
            rescuer.start_work(
                &self.merged_grid,
                self.severity.clone(),
                self.priority.clone(),
            )?;
            rescuer.mark_events_as_committed();
        }
        Ok(())
    }

    /// Ticks until every explorer is terminal or `max_cycles` is reached, then reports.
    pub fn run(&mut self, max_cycles: u64) -> ApplicationResult<MissionReport> {
        while !self.all_explorers_finished() && self.cycles < max_cycles {
            self.tick()?;
        }
        if self.all_explorers_finished() {
            // covers missions whose explorers were terminal before the first tick
            self.dispatch()?;
        } else {
            self.logger.warn(&format!(
                "cycle limit {} reached with explorers still active, rescuers stay idle",
                max_cycles
            ));
        }
        Ok(self.report())
    }

    pub fn report(&self) -> MissionReport {
        MissionReport {
            cycles: self.cycles,
            exploration_complete: self.dispatched,
            explorers: self
                .explorers
                .iter()
                .map(|slot| slot.summary().clone())
                .collect(),
            merged_cells: self.merged_grid.len(),
            victims_found: self.merged_victims.clone(),
            clusters: self.clusters.clone(),
            plans: self
                .rescuers
                .iter()
                .filter_map(|r| r.plan().cloned())
                .collect(),
        }
    }
}
