//! Graph command: print dependency maps and the members that close cycles

use crate::cli::CliConfig;
use crate::commands::common::validate_paths_exist;
use crate::model::ModelFile;
use crate::{CliError, Result};
use clap::{Args, ValueEnum};
use mg_analysis::{cycle_closers, DependencyCache};
use mg_core::dependency::{DependencyMap, MissingDependency};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the graph command
#[derive(Debug, Clone, Args)]
pub struct GraphArgs {
    /// Model files to analyse
    #[arg(required = true)]
    pub models: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: GraphFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeList {
    pub producer: String,
    pub consumers: Vec<String>,
}

/// Dependency facts for one declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphReport {
    #[serde(rename = "type")]
    pub type_name: String,
    pub edges: Vec<EdgeList>,
    pub missing: Vec<MissingDependency>,
    pub cycle_closers: Vec<String>,
}

impl GraphReport {
    pub fn new(type_name: &str, map: &DependencyMap) -> Self {
        Self {
            type_name: type_name.to_string(),
            edges: map
                .iter()
                .map(|(producer, consumers)| EdgeList {
                    producer: producer.to_string(),
                    consumers: consumers.iter().cloned().collect(),
                })
                .collect(),
            missing: map.missing().to_vec(),
            cycle_closers: cycle_closers(map),
        }
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![self.type_name.clone()];
        for edge in &self.edges {
            lines.push(format!("  {} -> {}", edge.producer, edge.consumers.join(", ")));
        }
        for missing in &self.missing {
            lines.push(format!("  missing: {} -> {}", missing.member, missing.name));
        }
        if !self.cycle_closers.is_empty() {
            lines.push(format!("  cycle closers: {}", self.cycle_closers.join(", ")));
        }
        lines.join("\n")
    }
}

/// Execute the graph command
pub fn graph_command(args: &GraphArgs, _config: &CliConfig) -> Result<()> {
    validate_paths_exist(&args.models)?;

    let cache = DependencyCache::new();
    let mut reports = Vec::new();
    for path in &args.models {
        let model = ModelFile::load(path)?;
        for ty in &model.types {
            let map = cache
                .get_or_build(ty)
                .map_err(|e| CliError::Generation(format!("{}: {}", ty.name, e)))?;
            reports.push(GraphReport::new(&ty.name, &map));
        }
    }

    match args.format {
        GraphFormat::Text => {
            for report in &reports {
                println!("{}", report.to_text());
            }
        }
        GraphFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| CliError::Generation(format!("Failed to serialize graph: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(())
}
