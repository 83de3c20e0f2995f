//! Setup-flow orchestration
//!
//! Sequences the warehouse setup flow: connection, dataset discovery,
//! selection (or manual entry after a failed discovery), access validation,
//! and multi-dataset table aggregation. The orchestrator is an event-driven
//! state machine that owns its state; backends plug in through the
//! `SetupBackend` trait.

pub mod backend;
pub mod error;
pub mod orchestrator;
pub mod state;

pub use backend::{BigQueryBackend, ConnectionParams, ProviderBackend, SetupBackend};
pub use error::{FlowError, FlowResult};
pub use orchestrator::{FlowEvent, SetupFlow};
pub use state::{FlowPhase, FlowState};
