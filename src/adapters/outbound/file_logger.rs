use crate::common::{DomainError, DomainResult};
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::Arc;

/// Forwards domain messages to the `log` facade, where `fast_log` picks them up.
struct FastLogBridge;

impl DomainLogger for FastLogBridge {
    fn info(&self, msg: &str) {
        log::info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install `fast_log` writing to `path` and return a domain logger the application can inject.
/// Fails if another `log` backend is already installed.
pub fn init_file_logger(path: &str) -> DomainResult<DynLogger> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| {
        DomainError::InfrastructureError(format!("failed to initialize fast_log: {}", e))
    })?;
    Ok(Arc::new(FastLogBridge {}))
}
