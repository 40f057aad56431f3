use std::sync::Arc;

/// Narration port for agents and the mission coordinator. Logging never fails from the
/// caller's side.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Prefixes every message with the owning agent's name, e.g. `Explorer_2: bumped at (3, 1)`.
#[derive(Clone)]
pub struct AgentLogger {
    name: String,
    inner: DynLogger,
}

impl AgentLogger {
    pub fn new(name: impl Into<String>, inner: DynLogger) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn info(&self, msg: &str) {
        self.inner.info(&format!("{}: {}", self.name, msg));
    }

    pub fn warn(&self, msg: &str) {
        self.inner.warn(&format!("{}: {}", self.name, msg));
    }

    pub fn error(&self, msg: &str) {
        self.inner.error(&format!("{}: {}", self.name, msg));
    }
}

impl std::fmt::Debug for AgentLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLogger").field("name", &self.name).finish()
    }
}
