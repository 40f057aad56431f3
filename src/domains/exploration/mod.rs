pub mod agent;
pub mod budget;
pub mod events;
pub mod frontier;
pub mod projections;

pub use agent::*;
pub use budget::*;
pub use events::*;
pub use frontier::*;
pub use projections::*;
