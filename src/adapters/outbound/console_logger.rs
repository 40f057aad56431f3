use crate::domains::logger::DomainLogger;
use chrono::Utc;
use std::sync::Arc;

/// Writes to stderr so stdout stays free for the mission report.
struct StderrConsole;

impl StderrConsole {
    fn emit(&self, level: &str, msg: &str) {
        eprintln!("{} {:<5} {}", Utc::now().format("%H:%M:%S%.3f"), level, msg);
    }
}

impl DomainLogger for StderrConsole {
    fn info(&self, msg: &str) {
        self.emit("INFO", msg);
    }

    fn warn(&self, msg: &str) {
        self.emit("WARN", msg);
    }

    fn error(&self, msg: &str) {
        self.emit("ERROR", msg);
    }
}

pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(StderrConsole)
}
