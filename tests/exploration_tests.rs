use rescue_app::adapters::inbound::Scenario;
use rescue_app::adapters::outbound::{init_noop_logger, EnvironmentCosts, SimulatedEnvironment};
use rescue_app::domains::exploration::*;
use rescue_app::domains::world::*;
use std::sync::Arc;

fn body(map: &str, victims: Vec<(i32, i32, Vec<f64>)>, time_limit: f64) -> SimulatedEnvironment {
    let config = rescue_app::config::ScenarioConfig {
        map: map.to_string(),
        victims: victims
            .into_iter()
            .map(|(x, y, vital_signs)| rescue_app::config::VictimRecord { x, y, vital_signs })
            .collect(),
    };
    let scenario = Arc::new(Scenario::from_config(&config).unwrap());
    SimulatedEnvironment::new(scenario, time_limit, EnvironmentCosts::default())
}

fn settings(time_limit: f64) -> ExplorerSettings {
    ExplorerSettings {
        time_limit,
        ..ExplorerSettings::default()
    }
}

fn run_to_end(agent: &mut ExplorerAgent, env: &mut SimulatedEnvironment, max_ticks: usize) {
    for _ in 0..max_ticks {
        if !agent.deliberate(env) {
            return;
        }
    }
    panic!("{} still {:?} after {} ticks", agent.id(), agent.status(), max_ticks);
}

#[test]
fn explores_a_small_room_completely_and_comes_home() {
    let vitals = vec![1.0, 120.0, 80.0, 0.0, 80.0, 15.0];
    let mut env = body("B..\n...\n...", vec![(2, 2, vitals.clone())], 1000.0);
    let mut agent = ExplorerAgent::new(0, settings(1000.0), init_noop_logger());

    run_to_end(&mut agent, &mut env, 200);

    assert_eq!(agent.status(), ExplorerStatus::Finished);
    assert_eq!(agent.position(), Coord::ORIGIN);
    assert_eq!(env.position(), Coord::ORIGIN);
    let known_open = agent.grid().iter().filter(|(_, c)| c.is_traversable()).count();
    assert_eq!(known_open, 9);

    let victim = agent.victims().get(&1).expect("victim 1 found");
    assert_eq!(victim.position, Coord::new(2, 2));
    assert_eq!(victim.vital_signs, vitals);
}

#[test]
fn commits_to_the_way_home_before_the_budget_runs_out() {
    let corridor = format!("B{}", ".".repeat(29));
    let mut env = body(&corridor, vec![], 20.0);
    let mut agent = ExplorerAgent::new(0, settings(20.0), init_noop_logger());
    assert_eq!(agent.comeback_threshold(), 12.0);

    let mut committed = None;
    for _ in 0..100 {
        let active = agent.deliberate(&mut env);
        for event in agent.uncommitted_events() {
            if let ExplorerEvent::ReturnCommitted {
                path_cost, waypoints, ..
            } = event
            {
                committed = Some((*path_cost, *waypoints));
            }
        }
        agent.mark_events_as_committed();
        if !active {
            break;
        }
    }

    assert_eq!(committed, Some((8.0, 8)));
    assert_eq!(agent.status(), ExplorerStatus::Finished);
    assert_eq!(agent.position(), Coord::ORIGIN);
    assert_eq!(env.remaining_budget(), 4.0);
}

#[test]
fn running_dry_times_the_explorer_out() {
    let corridor = format!("B{}", ".".repeat(29));
    let mut env = body(&corridor, vec![], 3.0);
    // a comeback fraction this low never triggers before the budget is gone
    let settings = ExplorerSettings {
        comeback_fraction: 0.01,
        ..settings(3.0)
    };
    let mut agent = ExplorerAgent::new(0, settings, init_noop_logger());
    run_to_end(&mut agent, &mut env, 50);
    assert_eq!(agent.status(), ExplorerStatus::TimedOut);
    assert!(agent.is_finished());
}

#[test]
fn agents_from_the_same_base_take_different_first_steps() {
    let map = "...\n.B.\n...";
    let mut first_steps = Vec::new();
    for index in 0..2 {
        let mut env = body(map, vec![], 100.0);
        let mut agent = ExplorerAgent::new(index, settings(100.0), init_noop_logger());
        agent.deliberate(&mut env);
        first_steps.push(agent.position());
    }
    assert_eq!(first_steps, vec![Coord::new(0, -1), Coord::new(-1, 0)]);
}

#[test]
fn bumps_mark_the_cell_blocked() {
    struct Wall {
        budget: f64,
    }
    impl Environment for Wall {
        fn attempt_move(&mut self, _mv: Move) -> MoveOutcome {
            self.budget -= 1.0;
            MoveOutcome::Bumped
        }
        fn sense_neighbors(&self) -> [CellKind; 8] {
            // claims the east cell is open although it is not
            let mut sensed = [CellKind::Blocked; 8];
            sensed[2] = CellKind::Free;
            sensed
        }
        fn sense_victim_here(&self) -> Option<u32> {
            None
        }
        fn read_vital_signs(&mut self) -> Vec<f64> {
            Vec::new()
        }
        fn remaining_budget(&self) -> f64 {
            self.budget
        }
    }

    let mut env = Wall { budget: 100.0 };
    let mut agent = ExplorerAgent::new(0, settings(100.0), init_noop_logger());
    assert!(agent.deliberate(&mut env));
    assert_eq!(agent.position(), Coord::ORIGIN);
    assert_eq!(agent.grid().get(Coord::new(1, 0)).kind, CellKind::Blocked);
    assert!(matches!(
        agent.uncommitted_events(),
        [ExplorerEvent::Bumped { returning: false, .. }]
    ));

    // nothing else to try from the base: exploration is over
    assert!(!agent.deliberate(&mut env));
    assert_eq!(agent.status(), ExplorerStatus::Finished);
}

#[test]
fn summary_projects_the_event_stream() {
    let mut env = body("B..\n...", vec![(2, 1, vec![1.0, 0.0, 0.0, 0.0, 80.0, 15.0])], 500.0);
    let mut agent = ExplorerAgent::new(0, settings(500.0), init_noop_logger());
    let mut summary = ExplorerSummary::new(agent.id());
    while agent.deliberate(&mut env) {
        for event in agent.uncommitted_events() {
            summary.apply_event(event);
        }
        agent.mark_events_as_committed();
    }
    for event in agent.uncommitted_events() {
        summary.apply_event(event);
    }

    assert_eq!(summary.status, ExplorerStatus::Finished);
    assert_eq!(summary.victims_found, 1);
    assert!(summary.moves >= 5);
    assert!(summary.last_activity.is_some());
}
