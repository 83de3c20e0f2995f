//! Datadock CLI - warehouse onboarding: dataset discovery, access
//! validation, and table aggregation

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{discover, tables, validate};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Discover(args) => discover::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
        cli::Commands::Tables(args) => tables::execute(args, &cli.global).await,
        #[cfg(feature = "serve")]
        cli::Commands::Serve(args) => commands::serve::execute(args, &cli.global).await,
    }
}
