//! Flow state owned by the orchestrator
//!
//! State is a plain value owned by the orchestrator and mutated only inside
//! its event handler; there is no shared or module-scoped mutation.

use dock_core::{AccessPartition, CompactTable, DatasetId, DatasetInfo, DiscoveryError};
use serde::Serialize;

/// Phase of the setup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    /// Nothing has happened yet (also the post-reset phase)
    #[default]
    Idle,
    /// Dataset discovery in flight
    Discovering,
    /// Discovery succeeded; datasets are available for selection
    Discovered,
    /// Discovery failed; manual dataset entry may be offered
    DiscoveryFailed,
    /// Dataset ids chosen, validation about to start
    Selecting,
    /// Access validation in flight
    Validating,
    /// Table aggregation in flight
    Aggregating,
    /// Tables available for selection and submission
    Ready,
}

impl FlowPhase {
    /// Whether forward navigation must be disabled.
    ///
    /// True exactly while a warehouse round-trip is in flight.
    pub fn loading(&self) -> bool {
        matches!(
            self,
            FlowPhase::Discovering | FlowPhase::Validating | FlowPhase::Aggregating
        )
    }
}

/// Snapshot of everything the setup flow has produced so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowState {
    /// Current phase
    pub phase: FlowPhase,

    /// Discovered datasets, in warehouse listing order
    pub datasets: Vec<DatasetInfo>,

    /// Discovery failure, if the last discovery attempt failed
    pub dataset_error: Option<DiscoveryError>,

    /// Dataset ids the user selected (discovered or manually entered)
    pub selected_datasets: Vec<DatasetId>,

    /// Access partition from the last validation
    pub partition: Option<AccessPartition>,

    /// Aggregated tables with provenance tags
    pub tables: Vec<CompactTable>,
}

impl FlowState {
    /// Whether a warehouse round-trip is in flight.
    pub fn loading(&self) -> bool {
        self.phase.loading()
    }
}
