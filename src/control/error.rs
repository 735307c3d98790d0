//! Error taxonomy for controller construction and stepping.

use thiserror::Error;

/// Errors surfaced by the intersection controller.
///
/// Configuration problems are rejected at startup, before any stepping.
/// Invariant violations mean controller state can no longer be trusted and
/// the run must stop.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("invariant violation: {reason}")]
    Invariant { reason: String },
}
