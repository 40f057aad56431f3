pub mod allocation;
pub mod exploration;
pub mod logger;
pub mod path_planning;
pub mod rescue;
pub mod world;

pub use allocation::*;
pub use exploration::*;
pub use logger::*;
pub use path_planning::*;
pub use rescue::*;
pub use world::*;
