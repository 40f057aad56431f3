use crate::common::{DomainError, DomainResult};
use crate::domains::allocation::AllocationConfig;
use crate::domains::exploration::ExplorerSettings;
use crate::domains::path_planning::Heuristic;
use crate::domains::rescue::GeneticConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mission: MissionConfig,
    pub genetic: GeneticConfig,
    pub allocation: AllocationConfig,
    pub logging: LoggingConfig,
    pub scenario: ScenarioConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub explorers: usize,
    pub rescuers: usize,
    pub explorer_time_limit: f64,
    pub rescuer_time_limit: f64,
    pub cost_line: f64,
    pub cost_diag: f64,
    pub cost_read: f64,
    pub comeback_fraction: f64,
    pub safety_factor: f64,
    pub heuristic: Heuristic,
    /// Upper bound on exploration ticks before the mission gives up waiting.
    pub max_cycles: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            explorers: 2,
            rescuers: 2,
            explorer_time_limit: 400.0,
            rescuer_time_limit: 200.0,
            cost_line: 1.0,
            cost_diag: 1.5,
            cost_read: 2.0,
            comeback_fraction: 0.6,
            safety_factor: 1.6,
            heuristic: Heuristic::Euclidean,
            max_cycles: 10_000,
        }
    }
}

impl MissionConfig {
    pub fn explorer_settings(&self) -> ExplorerSettings {
        ExplorerSettings {
            time_limit: self.explorer_time_limit,
            cost_line: self.cost_line,
            cost_diag: self.cost_diag,
            comeback_fraction: self.comeback_fraction,
            safety_factor: self.safety_factor,
            heuristic: self.heuristic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Domain log file. Console only when absent.
    pub file: Option<String>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimRecord {
    pub x: i32,
    pub y: i32,
    /// `[seq, systolic, diastolic, qPA, pulse, resp_rate, ...]`
    pub vital_signs: Vec<f64>,
}

/// Ground truth for the simulated environment: a text map and the victims placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub map: String,
    pub victims: Vec<VictimRecord>,
}

const DEFAULT_MAP: &str = "\
############
#B...#.....#
#..2.#..3..#
#..2...#...#
#....###...#
#.9.....2..#
#...#......#
############";

impl Default for ScenarioConfig {
    fn default() -> Self {
        let victim = |seq: f64, x: i32, y: i32, q_pa: f64, pulse: f64, resp: f64| VictimRecord {
            x,
            y,
            vital_signs: vec![seq, 120.0, 80.0, q_pa, pulse, resp],
        };
        Self {
            map: DEFAULT_MAP.to_string(),
            victims: vec![
                victim(1.0, 3, 3, -6.5, 135.0, 24.0),
                victim(2.0, 9, 2, 0.5, 80.0, 16.0),
                victim(3.0, 2, 6, 4.0, 45.0, 10.0),
                victim(4.0, 9, 6, 7.5, 110.0, 18.0),
            ],
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        let m = &self.mission;
        if m.explorers == 0 || m.rescuers == 0 {
            return Err(DomainError::invalid_config(
                "a mission needs at least one explorer and one rescuer",
            ));
        }
        for (name, value) in [
            ("explorer_time_limit", m.explorer_time_limit),
            ("rescuer_time_limit", m.rescuer_time_limit),
            ("cost_line", m.cost_line),
            ("cost_diag", m.cost_diag),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DomainError::invalid_config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !m.cost_read.is_finite() || m.cost_read < 0.0 {
            return Err(DomainError::invalid_config(format!(
                "cost_read must not be negative, got {}",
                m.cost_read
            )));
        }
        if !(m.comeback_fraction > 0.0 && m.comeback_fraction <= 1.0) {
            return Err(DomainError::invalid_config(format!(
                "comeback_fraction must lie in (0, 1], got {}",
                m.comeback_fraction
            )));
        }
        if !m.safety_factor.is_finite() || m.safety_factor < 1.0 {
            return Err(DomainError::invalid_config(format!(
                "safety_factor must be at least 1, got {}",
                m.safety_factor
            )));
        }
        if m.max_cycles == 0 {
            return Err(DomainError::invalid_config("max_cycles must be at least 1"));
        }
        self.genetic.validate()?;
        self.allocation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [mission]
            explorers = 3

            [genetic]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.mission.explorers, 3);
        assert_eq!(config.mission.rescuers, 2);
        assert_eq!(config.genetic.seed, Some(42));
        assert_eq!(config.genetic.population_size, 32);
        assert_eq!(config.scenario, ScenarioConfig::default());
    }

    #[test]
    fn rejects_out_of_range_comeback_fraction() {
        let mut config = Config::default();
        config.mission.comeback_fraction = 1.5;
        assert!(config.validate().is_err());
    }
}
