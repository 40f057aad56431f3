use rescue_app::adapters::outbound::init_noop_logger;
use rescue_app::application::MissionCoordinator;
use rescue_app::domains::exploration::ExplorerStatus;
use rescue_app::domains::rescue::RescuerStatus;
use rescue_app::Config;
use std::collections::BTreeSet;

fn seeded_config() -> Config {
    let mut config = Config::default();
    config.genetic.seed = Some(42);
    config.genetic.population_size = 12;
    config.genetic.generations = 6;
    config
}

#[test]
fn default_mission_explores_everything_then_dispatches_rescuers() {
    let config = seeded_config();
    let mut mission = MissionCoordinator::from_config(&config, init_noop_logger()).unwrap();
    let report = mission.run(config.mission.max_cycles).unwrap();

    assert!(report.exploration_complete);
    assert!(report
        .explorers
        .iter()
        .all(|e| e.status == ExplorerStatus::Finished));
    assert_eq!(report.victims_found.len(), 4);
    assert!(report.merged_cells > 0);

    // every found victim is assigned to exactly one rescuer
    assert_eq!(report.plans.len(), 2);
    let mut assigned = BTreeSet::new();
    for plan in &report.plans {
        for seq in &plan.assigned {
            assert!(assigned.insert(*seq), "victim {} assigned twice", seq);
        }
    }
    assert_eq!(assigned, (1..=4).collect::<BTreeSet<u32>>());
    assert!(mission
        .rescuers()
        .iter()
        .all(|r| r.status() == RescuerStatus::Planned));
}

#[test]
fn rescuers_wait_while_any_explorer_is_active() {
    let config = seeded_config();
    let mut mission = MissionCoordinator::from_config(&config, init_noop_logger()).unwrap();

    mission.tick().unwrap();
    assert!(!mission.all_explorers_finished());
    assert!(!mission.is_dispatched());
    assert!(mission
        .rescuers()
        .iter()
        .all(|r| r.status() == RescuerStatus::Waiting));

    let report = mission.run(3).unwrap();
    assert!(!report.exploration_complete);
    assert!(report.plans.is_empty());
    assert_eq!(report.cycles, 3);
}

#[test]
fn merged_grid_covers_what_every_explorer_saw() {
    let config = seeded_config();
    let mut mission = MissionCoordinator::from_config(&config, init_noop_logger()).unwrap();
    mission.run(config.mission.max_cycles).unwrap();

    for slot in mission.explorers() {
        for (pos, _) in slot.agent.grid().iter() {
            assert!(mission.merged_grid().contains(pos));
        }
    }
}

#[test]
fn report_serializes_to_json() {
    let config = seeded_config();
    let mut mission = MissionCoordinator::from_config(&config, init_noop_logger()).unwrap();
    let report = mission.run(config.mission.max_cycles).unwrap();
    let text = report.to_json_pretty().unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["exploration_complete"], serde_json::Value::Bool(true));
    assert_eq!(json["plans"].as_array().map(Vec::len), Some(2));
}
