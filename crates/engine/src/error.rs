//! The module contains the errors the engine can return.
//!
//! Calculations never fail: degenerate numbers are normalized to zero at the
//! point of use. Errors only surface at the boundary, when parsing filter
//! values, editing an operation's status or talking to a collaborator:
//!
//! - [`InvalidFilter`] thrown when a filter/sort value cannot be parsed.
//! - [`InvalidTransition`] thrown when a status change is not allowed.
//! - [`KeyNotFound`] thrown when a participant or owner is unknown.
//!
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
}
