//! Runtime context for CLI commands

use anyhow::{bail, Context, Result};
use dock_bigquery::{ClientOptions, StaticTokenProvider, TokenProvider};
use dock_core::{DataSourceKind, DatasetId, SetupConfig, WarehouseTarget};
use dock_flow::{BigQueryBackend, ConnectionParams, ProviderBackend, SetupBackend};
use dock_warehouse::{AggregateOptions, DuckDbProvider, MetadataProvider, PostgresProvider};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Environment variable holding raw credentials (service-account JSON,
/// possibly base64-encoded).
pub const CREDENTIALS_ENV: &str = "DATADOCK_CREDENTIALS";

/// Environment variable holding a pre-issued OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "DATADOCK_ACCESS_TOKEN";

/// Runtime context containing loaded configuration and the resolved target
pub struct RuntimeContext {
    /// The loaded project configuration
    pub config: SetupConfig,

    /// Name of the resolved target
    pub target_name: String,

    /// The resolved warehouse target
    pub target: WarehouseTarget,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let project_path = Path::new(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            SetupConfig::load(Path::new(config_path))
                .context("Failed to load configuration file")?
        } else {
            SetupConfig::load_from_dir(project_path)
                .context("Failed to load project configuration")?
        };

        let (target_name, target) = config
            .resolve_target(args.target.as_deref())
            .context("Failed to resolve target")?;
        let target_name = target_name.to_string();
        let target = target.clone();

        Ok(Self {
            config,
            target_name,
            target,
            verbose: args.verbose,
        })
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    /// Get dataset ids from a comma-separated string, falling back to the
    /// target's configured datasets
    pub fn filter_datasets(&self, datasets_arg: &Option<String>) -> Vec<DatasetId> {
        match datasets_arg {
            Some(datasets) => datasets
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(DatasetId::new)
                .collect(),
            None => self.target.datasets.clone(),
        }
    }

    /// Read raw credentials for the resolved target.
    ///
    /// Precedence: `--credentials-file`, then the target's
    /// `credentials_file`, then the `DATADOCK_CREDENTIALS` environment
    /// variable. The blob is held only for the duration of the command.
    pub fn credentials(&self, file_arg: &Option<String>) -> Result<String> {
        let file = file_arg.as_deref().or(self.target.credentials_file.as_deref());
        if let Some(path) = file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read credentials file: {}", path));
        }
        match std::env::var(CREDENTIALS_ENV) {
            Ok(raw) if !raw.is_empty() => Ok(raw),
            _ => bail!(
                "no credentials for target '{}': set credentials_file in datadock.yml, \
                 pass --credentials-file, or set {}",
                self.target_name,
                CREDENTIALS_ENV
            ),
        }
    }

    /// Connection parameters for the setup flow
    pub fn connection_params(&self, file_arg: &Option<String>) -> Result<ConnectionParams> {
        if !self.target.kind.supports_dataset_discovery() {
            return Ok(ConnectionParams::local());
        }
        let project_id = self
            .target
            .project_id
            .as_deref()
            .context("bigquery target is missing project_id")?;
        let credentials = self.credentials(file_arg)?;
        Ok(ConnectionParams::new(project_id, credentials))
    }

    /// Token provider for BigQuery API calls
    pub fn token_provider(&self) -> Result<Arc<dyn TokenProvider>> {
        let provider = StaticTokenProvider::from_env(ACCESS_TOKEN_ENV)
            .context("Failed to acquire access token")?;
        Ok(Arc::new(provider))
    }

    /// Client options derived from configuration
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::from_config(&self.config)
    }

    /// Aggregation options derived from configuration
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            request_timeout: self.config.request_timeout(),
            max_concurrent_requests: self.config.max_concurrent_requests,
        }
    }

    /// Build the setup-flow backend for the resolved target
    pub fn backend(&self) -> Result<Arc<dyn SetupBackend>> {
        match self.target.kind {
            DataSourceKind::BigQuery => Ok(Arc::new(BigQueryBackend::new(
                self.token_provider()?,
                self.client_options(),
                self.aggregate_options(),
            ))),
            DataSourceKind::DuckDb => {
                let provider = DuckDbProvider::new(&self.target.database)
                    .context("Failed to open DuckDB database")?;
                Ok(Arc::new(ProviderBackend::new(
                    Arc::new(provider) as Arc<dyn MetadataProvider>,
                    self.target.connection_info(),
                    self.aggregate_options(),
                )))
            }
            DataSourceKind::Postgres => {
                let provider = PostgresProvider::new(&self.target.database)
                    .context("Failed to connect to Postgres")?;
                Ok(Arc::new(ProviderBackend::new(
                    Arc::new(provider) as Arc<dyn MetadataProvider>,
                    self.target.connection_info(),
                    self.aggregate_options(),
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
