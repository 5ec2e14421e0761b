//! mvvmgen CLI Binary
//!
//! Generates change-notifying properties and command adapters for C# view models from
//! JSON member models.
//!
//! # Usage
//!
//! ```bash
//! # Generate units next to the current directory
//! mvvmgen generate models/person.json -o Generated
//!
//! # Validate without writing anything
//! mvvmgen check models/*.json
//!
//! # Inspect dependency maps
//! mvvmgen graph models/person.json --format json
//! ```

use clap::{Parser, Subcommand};
use mg_cli::{
    cli::CliConfig,
    commands::{self, check::CheckArgs, generate::GenerateArgs, graph::GraphArgs},
    diagnostics::{report_cli_error, setup_error_reporting, setup_logging, LogFormat, LogLevel},
    CliError, Result,
};
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Parser)]
#[command(
    name = "mvvmgen",
    version = env!("CARGO_PKG_VERSION"),
    about = "mvvmgen: reactive member generator for C# view models",
    long_about = r#"
mvvmgen reads member models of declaring types and generates change-notifying
properties and command adapters as partial classes.

EXAMPLES:
    mvvmgen generate person.json -o Generated    # Write Person.ViewModel.cs
    mvvmgen check person.json                    # Report diagnostics only
    mvvmgen graph person.json                    # Print dependency maps
    "#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one C# unit per declaring type
    Generate(GenerateArgs),

    /// Run generation and report diagnostics without writing files
    Check(CheckArgs),

    /// Print dependency maps, missing dependencies and cycle closers
    Graph(GraphArgs),
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            report_cli_error(e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the run passed the configured diagnostic policy.
fn run(cli: Cli) -> Result<bool> {
    setup_error_reporting()?;
    setup_logging(cli.verbose, cli.quiet, cli.log, cli.log_format)?;

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(CliError::Io)?;
    }

    let config = CliConfig::load(cli.config.as_deref())?;
    let deny_warnings = config.diagnostics.deny_warnings;

    let passed = match &cli.command {
        Commands::Generate(args) => {
            !commands::generate_command(args, &config)?.failed(deny_warnings)
        }
        Commands::Check(args) => !commands::check_command(args, &config)?.failed(deny_warnings),
        Commands::Graph(args) => {
            commands::graph_command(args, &config)?;
            true
        }
    };

    if passed {
        debug!("command completed successfully");
    } else {
        error!("generation reported errors");
    }
    Ok(passed)
}
