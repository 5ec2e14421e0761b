use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::dependency::DependencyMap;
use crate::diagnostics::Diagnostic;
use crate::fragments::Fragments;
use crate::model::TypeModel;
use crate::oracle::SymbolOracle;
use crate::Result;

/// Read-only inputs shared by every emitter processing one declaring type.
pub struct EmitContext<'a> {
    pub ty: &'a TypeModel,
    pub dependencies: &'a DependencyMap,
    pub oracle: &'a dyn SymbolOracle,
}

impl<'a> EmitContext<'a> {
    pub fn new(
        ty: &'a TypeModel,
        dependencies: &'a DependencyMap,
        oracle: &'a dyn SymbolOracle,
    ) -> Self {
        Self {
            ty,
            dependencies,
            oracle,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmitterOutput {
    pub fragments: Vec<Fragments>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EmitterOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragments: Fragments) {
        if !fragments.is_empty() {
            self.fragments.push(fragments);
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// One independently pluggable generator for a family of annotated members.
///
/// Validation failures are reported through [`EmitterOutput::diagnostics`] and only skip the
/// offending member. An `Err` means the emitter could not process the type at all; the
/// generator turns it into a `GeneratorError` and abandons the type for this pass.
pub trait MemberEmitter: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, ctx: &EmitContext<'_>) -> Result<EmitterOutput>;
}

/// Explicit, ordered list of emitters the generator runs for every type.
#[derive(Clone, Default)]
pub struct EmitterRegistry {
    emitters: Vec<Arc<dyn MemberEmitter>>,
}

impl EmitterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, emitter: Arc<dyn MemberEmitter>) {
        self.emitters.push(emitter);
    }

    pub fn with(mut self, emitter: Arc<dyn MemberEmitter>) -> Self {
        self.register(emitter);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn MemberEmitter>> {
        self.emitters.iter().find(|e| e.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MemberEmitter>> {
        self.emitters.iter()
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}

impl Debug for EmitterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("emitters", &self.names())
            .finish()
    }
}
