//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookup and validation failures.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown document: {name} (known: {})", .known.join(", "))]
    UnknownDocument { name: String, known: Vec<String> },
}
