//! Validate command implementation

use anyhow::{bail, Result};
use dock_core::AccessPartition;

use crate::cli::{GlobalArgs, OutputFormat, ValidateArgs};
use crate::context::RuntimeContext;

/// Execute the validate command
pub async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let datasets = ctx.filter_datasets(&args.datasets);
    if datasets.is_empty() {
        bail!(
            "no datasets to validate: pass --datasets or configure datasets \
             for target '{}'",
            ctx.target_name
        );
    }

    let backend = ctx.backend()?;
    let conn = ctx.connection_params(&args.credentials_file)?;

    ctx.verbose(&format!(
        "validating access to {} datasets on target '{}'",
        datasets.len(),
        ctx.target_name
    ));

    let partition = backend.validate(&conn, &datasets).await;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&partition)?);
        }
        OutputFormat::Table => print_table(&partition),
    }

    // A run that validated everything exits cleanly; partial access is an
    // actionable failure for scripts.
    if !partition.inaccessible.is_empty() {
        bail!(
            "{} of {} datasets are not accessible",
            partition.inaccessible.len(),
            partition.len()
        );
    }

    Ok(())
}

/// Print the partition in table format
fn print_table(partition: &AccessPartition) {
    println!(
        "{:<12}  DATASET",
        "ACCESS",
    );
    println!("{:-<12}  {}", "", "-".repeat(30));

    for id in &partition.accessible {
        println!("{:<12}  {}", "ok", id);
    }
    for id in &partition.inaccessible {
        println!("{:<12}  {}", "denied", id);
    }

    println!();
    println!(
        "{} accessible, {} inaccessible",
        partition.accessible.len(),
        partition.inaccessible.len()
    );
}
