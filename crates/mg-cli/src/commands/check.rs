//! Check command: run the whole pipeline without writing anything

use crate::cli::CliConfig;
use crate::commands::common::{validate_paths_exist, Pipeline};
use crate::diagnostics::{print_diagnostics, Tally};
use crate::Result;
use clap::Args;
use console::style;
use std::path::PathBuf;

/// Arguments for the check command
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Model files to check
    #[arg(required = true)]
    pub models: Vec<PathBuf>,
}

/// Execute the check command
pub fn check_command(args: &CheckArgs, config: &CliConfig) -> Result<Tally> {
    validate_paths_exist(&args.models)?;

    let pipeline = Pipeline::new();
    let mut tally = Tally::default();
    let mut types = 0;

    for model in &args.models {
        for outcome in pipeline.run_file(model)? {
            types += 1;
            print_diagnostics(&outcome.type_name, &outcome.diagnostics, &config.diagnostics);
            tally.add(&outcome.diagnostics);
        }
    }

    let summary = format!(
        "Checked {} type(s): {} error(s), {} warning(s)",
        types, tally.errors, tally.warnings
    );
    if tally.failed(config.diagnostics.deny_warnings) {
        println!("{} {}", style("✗").red(), summary);
    } else {
        println!("{} {}", style("✓").green(), summary);
    }
    Ok(tally)
}
