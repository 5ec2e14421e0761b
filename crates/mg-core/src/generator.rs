use std::sync::Arc;

use tracing::{debug, info_span, warn};

use crate::dependency::DependencyMap;
use crate::diagnostics::{Diagnostic, DiagnosticReport};
use crate::emitter::{EmitContext, EmitterRegistry};
use crate::fragments::{aggregate, GeneratedUnit};
use crate::model::TypeModel;
use crate::oracle::SymbolOracle;

/// Runs a registry of emitters over one declaring type and aggregates what they produce.
///
/// Holds no per-type state, so one generator can serve any number of types concurrently.
#[derive(Clone)]
pub struct Generator {
    registry: EmitterRegistry,
    oracle: Arc<dyn SymbolOracle>,
}

impl Generator {
    pub fn new(registry: EmitterRegistry, oracle: Arc<dyn SymbolOracle>) -> Self {
        Self { registry, oracle }
    }

    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    pub fn oracle(&self) -> &dyn SymbolOracle {
        self.oracle.as_ref()
    }

    /// Generate the unit for `ty`. The report carries no value when nothing was emitted or
    /// when an emitter failed internally; diagnostics are returned in both cases.
    pub fn generate(
        &self,
        ty: &TypeModel,
        dependencies: &DependencyMap,
    ) -> DiagnosticReport<GeneratedUnit> {
        let span = info_span!("generate", ty = %ty.name);
        let _enter = span.enter();

        let ctx = EmitContext::new(ty, dependencies, self.oracle.as_ref());
        let mut fragments = Vec::new();
        let mut diagnostics = Vec::new();

        for emitter in self.registry.iter() {
            match emitter.process(&ctx) {
                Ok(output) => {
                    debug!(
                        emitter = emitter.name(),
                        fragments = output.fragments.len(),
                        diagnostics = output.diagnostics.len(),
                        "emitter finished"
                    );
                    fragments.extend(output.fragments);
                    diagnostics.extend(output.diagnostics);
                }
                Err(err) => {
                    warn!(emitter = emitter.name(), error = %err, "abandoning type");
                    diagnostics.push(Diagnostic::generator_error(&ty.name, &err));
                    return DiagnosticReport::failure(diagnostics);
                }
            }
        }

        match aggregate(ty, fragments) {
            Some(unit) => DiagnosticReport::success_with_diagnostics(unit, diagnostics),
            None => {
                debug!("nothing to emit");
                DiagnosticReport::failure(diagnostics)
            }
        }
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
