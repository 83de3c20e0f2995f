//! Error types for dock-flow

use crate::state::FlowPhase;
use thiserror::Error;

/// Flow orchestration errors
#[derive(Error, Debug)]
pub enum FlowError {
    /// F001: Event not valid in the current phase
    #[error("[F001] Event '{event}' is not valid in phase {phase:?}")]
    InvalidTransition {
        phase: FlowPhase,
        event: &'static str,
    },

    /// F002: Flow has no connection to work against
    #[error("[F002] No connection has been created for this flow")]
    NoConnection,
}

/// Result type alias for FlowError
pub type FlowResult<T> = Result<T, FlowError>;
