use super::*;
use crate::backend::SetupBackend;
use async_trait::async_trait;
use dock_core::{
    AccessPartition, CompactTable, DataSourceKind, DatasetId, DatasetInfo, DiscoveryError,
    DiscoveryErrorCode, DiscoveryResult,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Scripted backend: discovery outcomes are consumed in order, access is a
/// fixed allowlist, and tables come from a per-dataset map.
struct MockBackend {
    kind: DataSourceKind,
    discoveries: Mutex<VecDeque<DiscoveryResult>>,
    accessible: Vec<DatasetId>,
    tables: HashMap<DatasetId, Vec<CompactTable>>,
    ungrouped_tables: Vec<CompactTable>,
}

impl MockBackend {
    fn bigquery() -> Self {
        Self {
            kind: DataSourceKind::BigQuery,
            discoveries: Mutex::new(VecDeque::new()),
            accessible: Vec::new(),
            tables: HashMap::new(),
            ungrouped_tables: Vec::new(),
        }
    }

    fn duckdb(tables: Vec<CompactTable>) -> Self {
        Self {
            kind: DataSourceKind::DuckDb,
            discoveries: Mutex::new(VecDeque::new()),
            accessible: Vec::new(),
            tables: HashMap::new(),
            ungrouped_tables: tables,
        }
    }

    fn with_discovery(self, result: DiscoveryResult) -> Self {
        self.discoveries.lock().unwrap().push_back(result);
        self
    }

    fn with_access(mut self, id: &str) -> Self {
        self.accessible.push(DatasetId::new(id));
        self
    }

    fn with_tables(mut self, dataset: &str, names: &[&str]) -> Self {
        let tables = names
            .iter()
            .map(|n| CompactTable::new(*n, Vec::new()))
            .collect();
        self.tables.insert(DatasetId::new(dataset), tables);
        self
    }
}

#[async_trait]
impl SetupBackend for MockBackend {
    fn kind(&self) -> DataSourceKind {
        self.kind
    }

    async fn discover(&self, _conn: &ConnectionParams) -> DiscoveryResult {
        self.discoveries
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted discovery call")
    }

    async fn validate(&self, _conn: &ConnectionParams, ids: &[DatasetId]) -> AccessPartition {
        AccessPartition::from_results(
            ids.iter()
                .map(|id| (id.clone(), self.accessible.contains(id))),
        )
    }

    async fn list_tables(&self, _conn: &ConnectionParams, ids: &[DatasetId]) -> Vec<CompactTable> {
        if ids.is_empty() {
            return self.ungrouped_tables.clone();
        }
        ids.iter()
            .flat_map(|id| {
                self.tables
                    .get(id)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|t| t.tagged(id.clone()))
            })
            .collect()
    }
}

fn datasets(ids: &[&str]) -> Vec<DatasetInfo> {
    ids.iter()
        .map(|id| DatasetInfo::id_only(DatasetId::new(*id)))
        .collect()
}

fn bq_params() -> ConnectionParams {
    ConnectionParams::new("acme-analytics", "{\"type\":\"service_account\"}")
}

fn flow(backend: MockBackend) -> SetupFlow {
    SetupFlow::new(Arc::new(backend))
}

#[tokio::test]
async fn test_happy_path_reaches_ready() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales", "ops"])))
        .with_access("sales")
        .with_access("ops")
        .with_tables("sales", &["orders", "refunds"])
        .with_tables("ops", &["tickets"]);
    let mut flow = flow(backend);

    let state = flow
        .handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    assert_eq!(state.phase, FlowPhase::Discovered);
    assert_eq!(state.datasets.len(), 2);

    let ids = vec![DatasetId::new("sales"), DatasetId::new("ops")];
    let state = flow
        .handle(FlowEvent::DatasetsSelected(ids))
        .await
        .unwrap();
    assert_eq!(state.phase, FlowPhase::Ready);
    assert_eq!(state.tables.len(), 3);

    let partition = state.partition.as_ref().unwrap();
    assert_eq!(partition.accessible.len(), 2);
    assert!(partition.inaccessible.is_empty());
}

#[tokio::test]
async fn test_submission_carries_provenance() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales", "ops"])))
        .with_access("sales")
        .with_access("ops")
        .with_tables("sales", &["orders"])
        .with_tables("ops", &["orders"]);
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    flow.handle(FlowEvent::DatasetsSelected(vec![
        DatasetId::new("sales"),
        DatasetId::new("ops"),
    ]))
    .await
    .unwrap();

    // Same table name in two datasets stays distinguishable.
    let submission = flow.submission();
    assert_eq!(submission.len(), 2);
    assert_eq!(submission[0].dataset_id, DatasetId::new("sales"));
    assert_eq!(submission[0].table_name, "orders");
    assert_eq!(submission[1].dataset_id, DatasetId::new("ops"));
    assert_eq!(submission[1].table_name, "orders");
}

#[tokio::test]
async fn test_inaccessible_datasets_are_excluded_from_aggregation() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales", "secret"])))
        .with_access("sales")
        .with_tables("sales", &["orders"])
        .with_tables("secret", &["salaries"]);
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    let state = flow
        .handle(FlowEvent::DatasetsSelected(vec![
            DatasetId::new("sales"),
            DatasetId::new("secret"),
        ]))
        .await
        .unwrap();

    assert_eq!(state.phase, FlowPhase::Ready);
    assert_eq!(state.tables.len(), 1);
    assert_eq!(state.tables[0].name, "orders");

    let partition = state.partition.as_ref().unwrap();
    assert_eq!(partition.accessible, vec![DatasetId::new("sales")]);
    assert_eq!(partition.inaccessible, vec![DatasetId::new("secret")]);
}

#[tokio::test]
async fn test_zero_accessible_reaches_ready_with_no_tables() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["secret"])));
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    let state = flow
        .handle(FlowEvent::DatasetsSelected(vec![DatasetId::new("secret")]))
        .await
        .unwrap();

    assert_eq!(state.phase, FlowPhase::Ready);
    assert!(state.tables.is_empty());
    assert!(flow.submission().is_empty());
}

#[tokio::test]
async fn test_discovery_failure_then_manual_entry() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::failure(DiscoveryError::new(
            DiscoveryErrorCode::InsufficientPermissions,
            "missing bigquery.datasets.list",
        )))
        .with_access("sales")
        .with_tables("sales", &["orders"]);
    let mut flow = flow(backend);

    let state = flow
        .handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    assert_eq!(state.phase, FlowPhase::DiscoveryFailed);
    let error = state.dataset_error.as_ref().unwrap();
    assert!(error.requires_manual_input);

    let state = flow
        .handle(FlowEvent::ManualDatasetsEntered(vec![DatasetId::new(
            "sales",
        )]))
        .await
        .unwrap();
    assert_eq!(state.phase, FlowPhase::Ready);
    assert_eq!(state.tables.len(), 1);
}

#[tokio::test]
async fn test_retry_after_failure_rebuilds_discovery() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::failure(DiscoveryError::new(
            DiscoveryErrorCode::DiscoveryFailed,
            "transient",
        )))
        .with_discovery(DiscoveryResult::success(datasets(&["sales"])));
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    assert_eq!(flow.state().phase, FlowPhase::DiscoveryFailed);

    let state = flow.handle(FlowEvent::Retry).await.unwrap();
    assert_eq!(state.phase, FlowPhase::Discovered);
    assert!(state.dataset_error.is_none());
    assert_eq!(state.datasets.len(), 1);
}

#[tokio::test]
async fn test_retry_keeps_selection_but_clears_results() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales"])))
        .with_discovery(DiscoveryResult::success(datasets(&["sales", "ops"])))
        .with_access("sales")
        .with_tables("sales", &["orders"]);
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    flow.handle(FlowEvent::DatasetsSelected(vec![DatasetId::new("sales")]))
        .await
        .unwrap();
    // Ready is past the retryable window.
    let err = flow.handle(FlowEvent::Retry).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition { .. }));

    // Retry from Discovered re-runs discovery and drops stale results.
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales"])))
        .with_discovery(DiscoveryResult::success(datasets(&["sales", "ops"])));
    let mut flow = SetupFlow::new(Arc::new(backend));
    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    let state = flow.handle(FlowEvent::Retry).await.unwrap();
    assert_eq!(state.phase, FlowPhase::Discovered);
    assert_eq!(state.datasets.len(), 2);
    assert!(state.partition.is_none());
    assert!(state.tables.is_empty());
}

#[tokio::test]
async fn test_reset_returns_to_idle_from_any_phase() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales"])))
        .with_access("sales")
        .with_tables("sales", &["orders"]);
    let mut flow = flow(backend);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();
    flow.handle(FlowEvent::DatasetsSelected(vec![DatasetId::new("sales")]))
        .await
        .unwrap();
    assert_eq!(flow.state().phase, FlowPhase::Ready);

    let state = flow.handle(FlowEvent::Reset).await.unwrap();
    assert_eq!(state.phase, FlowPhase::Idle);
    assert!(state.datasets.is_empty());
    assert!(state.tables.is_empty());

    // The connection is gone too: retry has nothing to work with.
    let err = flow.handle(FlowEvent::Retry).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_invalid_transitions_are_rejected_without_state_change() {
    let backend = MockBackend::bigquery()
        .with_discovery(DiscoveryResult::success(datasets(&["sales"])));
    let mut flow = flow(backend);

    // Selection before any connection exists.
    let err = flow
        .handle(FlowEvent::DatasetsSelected(vec![DatasetId::new("sales")]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FlowError::InvalidTransition {
            phase: FlowPhase::Idle,
            event: "datasets_selected"
        }
    ));
    assert_eq!(flow.state().phase, FlowPhase::Idle);

    flow.handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap();

    // Manual entry is only offered after a failed discovery.
    let err = flow
        .handle(FlowEvent::ManualDatasetsEntered(vec![DatasetId::new(
            "sales",
        )]))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition { .. }));
    assert_eq!(flow.state().phase, FlowPhase::Discovered);

    // A second connection requires an explicit reset first.
    let err = flow
        .handle(FlowEvent::ConnectionCreated(bq_params()))
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_local_warehouse_skips_discovery_and_validation() {
    let tables = vec![
        CompactTable::new("customers", Vec::new()),
        CompactTable::new("orders", Vec::new()),
    ];
    let mut flow = flow(MockBackend::duckdb(tables));

    let state = flow
        .handle(FlowEvent::ConnectionCreated(ConnectionParams::local()))
        .await
        .unwrap();
    assert_eq!(state.phase, FlowPhase::Ready);
    assert_eq!(state.tables.len(), 2);
    assert!(state.datasets.is_empty());
    assert!(state.dataset_error.is_none());

    // Untagged tables fall back to the default dataset in the submission.
    let submission = flow.submission();
    assert_eq!(submission[0].dataset_id, DatasetId::new("main"));
    assert_eq!(submission[1].table_name, "orders");
}

#[tokio::test]
async fn test_event_names_are_stable() {
    assert_eq!(FlowEvent::Retry.name(), "retry");
    assert_eq!(FlowEvent::Reset.name(), "reset");
    assert_eq!(
        FlowEvent::DatasetsSelected(Vec::new()).name(),
        "datasets_selected"
    );
}
