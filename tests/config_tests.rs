use rescue_app::domains::path_planning::Heuristic;
use rescue_app::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn loads_a_full_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[mission]
explorers = 3
rescuers = 1
explorer_time_limit = 250.0
heuristic = "Chebyshev"
max_cycles = 500

[genetic]
population_size = 12
generations = 8
seed = 4

[allocation]
seed = 17

[logging]
file = "mission.log"

[scenario]
map = """
B..
.#.
..."""

[[scenario.victims]]
x = 2
y = 2
vital_signs = [1.0, 120.0, 80.0, 0.0, 80.0, 15.0]
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.mission.explorers, 3);
    assert_eq!(config.mission.rescuers, 1);
    assert_eq!(config.mission.heuristic, Heuristic::Chebyshev);
    assert_eq!(config.mission.explorer_settings().time_limit, 250.0);
    assert_eq!(config.genetic.population_size, 12);
    assert_eq!(config.genetic.seed, Some(4));
    assert_eq!(config.allocation.seed, 17);
    assert_eq!(config.logging.file.as_deref(), Some("mission.log"));
    assert_eq!(config.scenario.map, "B..\n.#.\n...");
    assert_eq!(config.scenario.victims.len(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let result = tokio_test::block_on(Config::from_file("/definitely/not/here.toml"));
    assert!(result.is_err());
}

#[test]
fn invalid_values_are_rejected_on_load() {
    let result = Config::from_toml_str(
        r#"
[genetic]
crossover_probability = 2.0
"#,
    );
    assert!(result.is_err());

    let result = Config::from_toml_str(
        r#"
[mission]
explorers = 0
"#,
    );
    assert!(result.is_err());
}

#[test]
fn empty_file_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config.mission.explorers, 2);
    assert_eq!(config.genetic.generations, 30);
    assert_eq!(config.allocation.max_iterations, 100);
    assert!(config.logging.file.is_none());
    assert!(!config.scenario.map.is_empty());
}
