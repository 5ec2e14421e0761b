//! The analysis and generation pipeline shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mg_analysis::DependencyCache;
use mg_core::diagnostics::Diagnostic;
use mg_core::fragments::GeneratedUnit;
use mg_core::model::TypeModel;
use mg_core::Generator;
use tracing::{info, info_span, warn};

use crate::model::ModelFile;
use crate::{CliError, Result};

/// What generation produced for one declaring type.
#[derive(Debug, Clone)]
pub struct TypeOutcome {
    pub type_name: String,
    pub unit: Option<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One run over any number of model files. Dependency maps are memoized for the
/// lifetime of the pipeline.
#[derive(Default)]
pub struct Pipeline {
    cache: DependencyCache,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &DependencyCache {
        &self.cache
    }

    pub fn run_file(&self, path: &Path) -> Result<Vec<TypeOutcome>> {
        let model = ModelFile::load(path)?;
        Ok(self.run_model(&model))
    }

    pub fn run_model(&self, model: &ModelFile) -> Vec<TypeOutcome> {
        let generator = mg_csharp::generator(Arc::new(model.known_types()));
        model
            .types
            .iter()
            .map(|ty| self.run_type(&generator, ty))
            .collect()
    }

    fn run_type(&self, generator: &Generator, ty: &TypeModel) -> TypeOutcome {
        let span = info_span!("type", ty = %ty.name);
        let _enter = span.enter();

        let report = match self.cache.get_or_build(ty) {
            Ok(map) => generator.generate(ty, &map),
            Err(err) => {
                warn!(error = %err, "dependency analysis failed");
                return TypeOutcome {
                    type_name: ty.name.clone(),
                    unit: None,
                    diagnostics: vec![Diagnostic::generator_error(&ty.name, &err)],
                };
            }
        };
        info!(
            generated = report.value.is_some(),
            diagnostics = report.diagnostics.len(),
            "type processed"
        );
        TypeOutcome {
            type_name: ty.name.clone(),
            unit: report.value,
            diagnostics: report.diagnostics,
        }
    }
}

/// Validate that all provided paths exist and are files.
pub fn validate_paths_exist(inputs: &[PathBuf]) -> Result<()> {
    for input in inputs {
        if !input.exists() {
            return Err(CliError::Model(format!(
                "Input path does not exist: {}",
                input.display()
            )));
        }
        if !input.is_file() {
            return Err(CliError::Model(format!(
                "Input path is not a file: {}",
                input.display()
            )));
        }
    }
    Ok(())
}
