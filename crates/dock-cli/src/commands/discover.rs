//! Discover command implementation

use anyhow::{bail, Context, Result};
use dock_bigquery::discovery;
use dock_core::{DatasetInfo, DiscoveryResult};

use crate::cli::{DiscoverArgs, GlobalArgs, OutputFormat};
use crate::context::RuntimeContext;

/// Execute the discover command
pub async fn execute(args: &DiscoverArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    if !ctx.target.kind.supports_dataset_discovery() {
        bail!(
            "target '{}' is a {} source and has no datasets to discover",
            ctx.target_name,
            ctx.target.kind.as_str()
        );
    }

    let project_id = ctx
        .target
        .project_id
        .clone()
        .context("bigquery target is missing project_id")?;
    let credentials = ctx.credentials(&args.credentials_file)?;
    let token_provider = ctx.token_provider()?;

    ctx.verbose(&format!("discovering datasets in project {}", project_id));

    let result = discovery::discover(
        &project_id,
        &credentials,
        token_provider,
        &ctx.client_options(),
    )
    .await;

    match args.output {
        OutputFormat::Json => {
            // The wire shape carries the success flag; failures are data,
            // not a broken invocation.
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        OutputFormat::Table => match result {
            DiscoveryResult::Success(datasets) => {
                print_table(&project_id, &datasets);
                Ok(())
            }
            DiscoveryResult::Failure(error) => {
                eprintln!("Discovery failed: {}", error);
                if error.requires_manual_input {
                    eprintln!(
                        "Datasets can still be entered manually, e.g. \
                         `dock tables --datasets <id,...>`"
                    );
                }
                bail!("dataset discovery failed ({})", error.code)
            }
        },
    }
}

/// Print datasets in table format
fn print_table(project_id: &str, datasets: &[DatasetInfo]) {
    if datasets.is_empty() {
        println!("No datasets found in project {}", project_id);
        return;
    }

    let id_width = datasets
        .iter()
        .map(|d| d.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let loc_width = datasets
        .iter()
        .map(|d| d.location.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(8)
        .max(8);

    println!(
        "{:<id_width$}  {:<loc_width$}  DESCRIPTION",
        "ID",
        "LOCATION",
        id_width = id_width,
        loc_width = loc_width
    );
    println!(
        "{:-<id_width$}  {:-<loc_width$}  {}",
        "",
        "",
        "-".repeat(30),
        id_width = id_width,
        loc_width = loc_width
    );

    for dataset in datasets {
        println!(
            "{:<id_width$}  {:<loc_width$}  {}",
            dataset.id.as_str(),
            dataset.location.as_deref().unwrap_or("-"),
            dataset
                .friendly_name
                .as_deref()
                .or(dataset.description.as_deref())
                .unwrap_or("-"),
            id_width = id_width,
            loc_width = loc_width
        );
    }

    println!();
    println!("{} datasets found", datasets.len());
}
