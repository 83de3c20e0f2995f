//! Tables command implementation
//!
//! Drives the full setup flow: connection, discovery (when the target
//! supports it), dataset selection or manual entry, access validation, and
//! table aggregation.

use anyhow::{bail, Result};
use dock_core::{CompactTable, DatasetId};
use dock_flow::{FlowEvent, FlowPhase, SetupFlow};

use crate::cli::{GlobalArgs, OutputFormat, TablesArgs};
use crate::context::RuntimeContext;

/// Execute the tables command
pub async fn execute(args: &TablesArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let backend = ctx.backend()?;
    let conn = ctx.connection_params(&args.credentials_file)?;

    let mut flow = SetupFlow::new(backend);
    flow.handle(FlowEvent::ConnectionCreated(conn)).await?;

    match flow.state().phase {
        // Local targets land here directly.
        FlowPhase::Ready => {}
        FlowPhase::Discovered => {
            let requested = ctx.filter_datasets(&args.datasets);
            let selection: Vec<DatasetId> = if requested.is_empty() {
                flow.state().datasets.iter().map(|d| d.id.clone()).collect()
            } else {
                requested
            };
            ctx.verbose(&format!("selected {} datasets", selection.len()));
            flow.handle(FlowEvent::DatasetsSelected(selection)).await?;
        }
        FlowPhase::DiscoveryFailed => {
            let error = flow
                .state()
                .dataset_error
                .clone()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            let manual = ctx.filter_datasets(&args.datasets);
            if manual.is_empty() {
                bail!(
                    "dataset discovery failed ({}); pass --datasets to enter \
                     dataset ids manually",
                    error
                );
            }
            ctx.verbose(&format!(
                "discovery failed ({}); continuing with {} manually entered datasets",
                error,
                manual.len()
            ));
            flow.handle(FlowEvent::ManualDatasetsEntered(manual)).await?;
        }
        phase => bail!("setup flow stopped in unexpected phase {:?}", phase),
    }

    let state = flow.state();
    if let Some(partition) = &state.partition {
        for id in &partition.inaccessible {
            eprintln!("warning: dataset '{}' is not accessible, skipped", id);
        }
    }

    if args.selection {
        let submission = flow.submission();
        match args.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&submission)?),
            OutputFormat::Table => {
                for entry in &submission {
                    println!("{}.{}", entry.dataset_id, entry.table_name);
                }
            }
        }
        return Ok(());
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state.tables)?),
        OutputFormat::Table => print_table(&state.tables),
    }

    Ok(())
}

/// Print tables in table format
fn print_table(tables: &[CompactTable]) {
    if tables.is_empty() {
        println!("No tables found");
        return;
    }

    let name_width = tables.iter().map(|t| t.name.len()).max().unwrap_or(4).max(4);
    let ds_width = tables
        .iter()
        .map(|t| {
            t.properties
                .dataset
                .as_ref()
                .map(|d| d.as_str().len())
                .unwrap_or(1)
        })
        .max()
        .unwrap_or(7)
        .max(7);

    println!(
        "{:<name_width$}  {:<ds_width$}  {:>7}  PRIMARY_KEY",
        "NAME",
        "DATASET",
        "COLUMNS",
        name_width = name_width,
        ds_width = ds_width
    );
    println!(
        "{:-<name_width$}  {:-<ds_width$}  {:-<7}  {}",
        "",
        "",
        "",
        "-".repeat(20),
        name_width = name_width,
        ds_width = ds_width
    );

    for table in tables {
        let dataset = table
            .properties
            .dataset
            .as_ref()
            .map(DatasetId::as_str)
            .unwrap_or("-");
        let pk = table
            .primary_key
            .as_ref()
            .map(|cols| cols.join(", "))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<name_width$}  {:<ds_width$}  {:>7}  {}",
            table.name,
            dataset,
            table.columns.len(),
            pk,
            name_width = name_width,
            ds_width = ds_width
        );
    }

    println!();
    println!("{} tables found", tables.len());
}
