//! Generate command: write one C# unit per declaring type

use crate::cli::CliConfig;
use crate::commands::common::{validate_paths_exist, Pipeline};
use crate::diagnostics::{print_diagnostics, Tally};
use crate::{CliError, Result};
use clap::Args;
use console::style;
use mg_core::fragments::GeneratedUnit;
use mg_csharp::render_unit;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Arguments for the generate command
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Model files to generate from
    #[arg(required = true)]
    pub models: Vec<PathBuf>,

    /// Output directory (defaults to the configured directory, then `.`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print generated units to stdout instead of writing files
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the generate command
pub fn generate_command(args: &GenerateArgs, config: &CliConfig) -> Result<Tally> {
    validate_paths_exist(&args.models)?;

    let output_dir = args
        .output
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let pipeline = Pipeline::new();
    let mut tally = Tally::default();

    for model in &args.models {
        for outcome in pipeline.run_file(model)? {
            print_diagnostics(&outcome.type_name, &outcome.diagnostics, &config.diagnostics);
            tally.add(&outcome.diagnostics);

            let Some(unit) = outcome.unit else {
                debug!(ty = %outcome.type_name, "nothing generated");
                continue;
            };
            let text = render_unit(&unit, &config.printer);
            if args.dry_run {
                print!("{}", text);
            } else {
                write_unit(&output_dir, &unit, &text, config)?;
            }
        }
    }

    Ok(tally)
}

fn write_unit(dir: &Path, unit: &GeneratedUnit, text: &str, config: &CliConfig) -> Result<()> {
    let path = dir.join(format!("{}{}", unit.type_name, config.output.file_suffix));
    if path.exists() && !config.output.overwrite {
        warn!(path = %path.display(), "file exists and overwrite is disabled; skipping");
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| {
        CliError::Generation(format!("Failed to create output directory {}: {}", dir.display(), e))
    })?;
    std::fs::write(&path, text).map_err(|e| {
        CliError::Generation(format!("Failed to write {}: {}", path.display(), e))
    })?;
    println!("{} {}", style("Generated").green().bold(), path.display());
    Ok(())
}
