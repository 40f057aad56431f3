pub mod agent;
pub mod chromosome;
pub mod events;
pub mod genetic;

pub use agent::*;
pub use chromosome::*;
pub use events::*;
pub use genetic::*;
