//! Domain layer: command records, argument vectors, document registry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod command_line;
pub mod entities;
pub mod error;
pub mod registry;

pub use command_line::{shell_quote, CommandLine};
pub use entities::*;
pub use error::DomainError;
pub use registry::{normalize_name, DocumentEntry, DocumentRegistry};
