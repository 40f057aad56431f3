pub mod astar;

pub use astar::*;
