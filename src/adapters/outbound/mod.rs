pub mod console_logger;
pub mod estimators;
pub mod file_logger;
pub mod multi_logger;
pub mod noop_logger;
pub mod simulated_environment;

pub use console_logger::*;
pub use estimators::*;
pub use file_logger::*;
pub use multi_logger::*;
pub use noop_logger::*;
pub use simulated_environment::*;
