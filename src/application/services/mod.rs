//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod dispatch;
mod runner;

pub use dispatch::{Dispatch, DispatchService};
pub use runner::RunnerService;
