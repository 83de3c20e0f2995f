//! Setup-flow orchestrator
//!
//! An event-driven state machine: callers feed discrete events and read the
//! resulting state snapshot. Flow state is owned by the orchestrator value
//! and mutated only inside `handle`, so there are no concurrent writers by
//! construction. Retry is an explicit event that re-enters discovery
//! without discarding the rest of the flow.

use crate::backend::{ConnectionParams, SetupBackend};
use crate::error::{FlowError, FlowResult};
use crate::state::{FlowPhase, FlowState};
use dock_core::{DatasetId, DiscoveryResult, TableSelection};
use std::sync::Arc;

/// Fallback provenance for ungrouped (non-BigQuery) listings.
const UNGROUPED_DATASET: &str = "main";

/// Events driving the setup flow.
#[derive(Clone)]
pub enum FlowEvent {
    /// A connection was created; start discovery (or skip it for
    /// warehouses without datasets)
    ConnectionCreated(ConnectionParams),

    /// The user picked dataset ids from the discovered list
    DatasetsSelected(Vec<DatasetId>),

    /// The user typed dataset ids after a failed discovery
    ManualDatasetsEntered(Vec<DatasetId>),

    /// Re-run discovery with the existing connection
    Retry,

    /// Drop everything and return to idle
    Reset,
}

impl FlowEvent {
    /// Stable event name, used in transition errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::ConnectionCreated(_) => "connection_created",
            FlowEvent::DatasetsSelected(_) => "datasets_selected",
            FlowEvent::ManualDatasetsEntered(_) => "manual_datasets_entered",
            FlowEvent::Retry => "retry",
            FlowEvent::Reset => "reset",
        }
    }
}

/// The setup-flow state machine.
pub struct SetupFlow {
    backend: Arc<dyn SetupBackend>,
    state: FlowState,
    connection: Option<ConnectionParams>,
}

impl SetupFlow {
    pub fn new(backend: Arc<dyn SetupBackend>) -> Self {
        Self {
            backend,
            state: FlowState::default(),
            connection: None,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Apply one event and return the resulting state.
    pub async fn handle(&mut self, event: FlowEvent) -> FlowResult<&FlowState> {
        let event_name = event.name();
        log::debug!("flow event: {}", event_name);
        match event {
            FlowEvent::ConnectionCreated(params) => self.on_connection_created(params).await,
            FlowEvent::DatasetsSelected(ids) => {
                self.expect_phase(FlowPhase::Discovered, event_name)?;
                self.run_selection(ids).await
            }
            FlowEvent::ManualDatasetsEntered(ids) => {
                self.expect_phase(FlowPhase::DiscoveryFailed, event_name)?;
                self.run_selection(ids).await
            }
            FlowEvent::Retry => self.on_retry().await,
            FlowEvent::Reset => {
                self.state = FlowState::default();
                self.connection = None;
                Ok(&self.state)
            }
        }
    }

    /// Terminal submission shape: one provenance-tagged entry per
    /// aggregated table.
    pub fn submission(&self) -> Vec<TableSelection> {
        self.state
            .tables
            .iter()
            .map(|t| TableSelection {
                dataset_id: t
                    .properties
                    .dataset
                    .clone()
                    .unwrap_or_else(|| DatasetId::new(UNGROUPED_DATASET)),
                table_name: t.name.clone(),
            })
            .collect()
    }

    fn expect_phase(&self, expected: FlowPhase, event: &'static str) -> FlowResult<()> {
        if self.state.phase != expected {
            return Err(FlowError::InvalidTransition {
                phase: self.state.phase,
                event,
            });
        }
        Ok(())
    }

    async fn on_connection_created(&mut self, params: ConnectionParams) -> FlowResult<&FlowState> {
        self.expect_phase(FlowPhase::Idle, "connection_created")?;
        self.connection = Some(params.clone());

        if !self.backend.kind().supports_dataset_discovery() {
            // No dataset model: straight to an ungrouped listing, with
            // every (nonexistent) dataset deemed accessible.
            self.state.phase = FlowPhase::Aggregating;
            self.state.tables = self.backend.list_tables(&params, &[]).await;
            self.state.partition = Some(dock_core::AccessPartition::identity(&[]));
            self.state.phase = FlowPhase::Ready;
            return Ok(&self.state);
        }

        self.run_discovery(params).await
    }

    async fn on_retry(&mut self) -> FlowResult<&FlowState> {
        if !matches!(
            self.state.phase,
            FlowPhase::DiscoveryFailed | FlowPhase::Discovered
        ) {
            return Err(FlowError::InvalidTransition {
                phase: self.state.phase,
                event: "retry",
            });
        }
        let params = self.connection.clone().ok_or(FlowError::NoConnection)?;

        // Discovery output is rebuilt from scratch; selections and the
        // connection survive the retry.
        self.state.datasets.clear();
        self.state.dataset_error = None;
        self.state.partition = None;
        self.state.tables.clear();

        self.run_discovery(params).await
    }

    async fn run_discovery(&mut self, params: ConnectionParams) -> FlowResult<&FlowState> {
        self.state.phase = FlowPhase::Discovering;
        match self.backend.discover(&params).await {
            DiscoveryResult::Success(datasets) => {
                self.state.datasets = datasets;
                self.state.dataset_error = None;
                self.state.phase = FlowPhase::Discovered;
            }
            DiscoveryResult::Failure(error) => {
                log::warn!("discovery failed: {}", error);
                self.state.dataset_error = Some(error);
                self.state.phase = FlowPhase::DiscoveryFailed;
            }
        }
        Ok(&self.state)
    }

    async fn run_selection(&mut self, ids: Vec<DatasetId>) -> FlowResult<&FlowState> {
        let params = self.connection.clone().ok_or(FlowError::NoConnection)?;

        self.state.phase = FlowPhase::Selecting;
        self.state.selected_datasets = ids.clone();

        self.state.phase = FlowPhase::Validating;
        let partition = self.backend.validate(&params, &ids).await;
        if !partition.inaccessible.is_empty() {
            log::warn!(
                "{} of {} selected datasets are not accessible",
                partition.inaccessible.len(),
                ids.len()
            );
        }

        let accessible = partition.accessible.clone();
        self.state.partition = Some(partition);

        if accessible.is_empty() {
            // Degraded terminal: zero accessible datasets yields zero
            // tables, which the caller must surface.
            self.state.tables.clear();
            self.state.phase = FlowPhase::Ready;
            return Ok(&self.state);
        }

        self.state.phase = FlowPhase::Aggregating;
        self.state.tables = self.backend.list_tables(&params, &accessible).await;
        self.state.phase = FlowPhase::Ready;
        Ok(&self.state)
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
