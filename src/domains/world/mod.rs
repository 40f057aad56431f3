pub mod grid;
pub mod ports;
pub mod types;
pub mod victim;

pub use grid::*;
pub use ports::*;
pub use types::*;
pub use victim::*;
