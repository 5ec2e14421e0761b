//! Model files: the JSON description of declaring types the host's symbol layer hands over.

use std::path::Path;

use miette::{NamedSource, SourceSpan};
use mg_core::model::TypeModel;
use mg_core::oracle::KnownTypes;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CliError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub types: Vec<TypeModel>,
    /// Symbol facts beyond the standard table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<KnownTypes>,
}

impl ModelFile {
    /// The standard table with this file's metadata merged over it.
    pub fn known_types(&self) -> KnownTypes {
        let standard = KnownTypes::standard();
        match &self.metadata {
            Some(metadata) => standard.merge(metadata.clone()),
            None => standard,
        }
    }

    pub fn parse(name: &str, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            let offset = byte_offset(content, e.line(), e.column());
            CliError::ModelSyntax {
                message: e.to_string(),
                src: NamedSource::new(name, content.to_string()),
                span: SourceSpan::from((offset, 1)),
            }
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Model(format!("Failed to read model file {}: {}", path.display(), e))
        })?;
        let model = Self::parse(&path.display().to_string(), &content)?;
        debug!(path = %path.display(), types = model.types.len(), "loaded model file");
        Ok(model)
    }
}

/// Byte offset of a 1-based line / column pair, clamped to the text.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len().saturating_sub(1))
}
