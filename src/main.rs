use anyhow::Context;
use rescue_app::adapters::outbound::init_mission_logger;
use rescue_app::application::MissionCoordinator;
use rescue_app::Config;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config.toml";

async fn load_config() -> anyhow::Result<Config> {
    match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .await
            .with_context(|| format!("loading {}", path)),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::from_file(DEFAULT_CONFIG)
            .await
            .with_context(|| format!("loading {}", DEFAULT_CONFIG)),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().await?;

    // fast_log claims the `log` facade first; tracing then keeps its own dispatcher
    let logger = init_mission_logger(config.logging.file.as_deref());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let tracing_ready = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = tracing_ready {
        warn!("tracing bridge to `log` not installed: {}", e);
    }

    info!(
        "Starting mission: {} explorers, {} rescuers",
        config.mission.explorers, config.mission.rescuers
    );

    let mut mission = MissionCoordinator::from_config(&config, logger)?;
    let report = mission.run(config.mission.max_cycles)?;

    info!(
        "Mission finished after {} cycles, {} victims found",
        report.cycles,
        report.victims_found.len()
    );
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
