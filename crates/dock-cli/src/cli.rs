//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Datadock - warehouse onboarding: discover datasets, validate access,
/// aggregate table metadata
#[derive(Parser, Debug)]
#[command(name = "dock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (warehouse connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover datasets in the configured project
    Discover(DiscoverArgs),

    /// Check which datasets the credentials can access
    Validate(ValidateArgs),

    /// Aggregate table metadata across datasets
    Tables(TablesArgs),

    /// Serve the onboarding API over HTTP
    #[cfg(feature = "serve")]
    Serve(ServeArgs),
}

/// Output formats shared by read commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the discover command
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Override credentials file path
    #[arg(long)]
    pub credentials_file: Option<String>,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dataset ids to check (comma-separated, default: target datasets)
    #[arg(short, long)]
    pub datasets: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Override credentials file path
    #[arg(long)]
    pub credentials_file: Option<String>,
}

/// Arguments for the tables command
#[derive(Args, Debug)]
pub struct TablesArgs {
    /// Dataset ids to include (comma-separated, default: all discovered)
    #[arg(short, long)]
    pub datasets: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Print the submission payload instead of the table listing
    #[arg(long)]
    pub selection: bool,

    /// Override credentials file path
    #[arg(long)]
    pub credentials_file: Option<String>,
}

/// Arguments for the serve command
#[cfg(feature = "serve")]
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, default_value = "8800")]
    pub port: u16,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
