#[macro_use]
pub mod macros;

pub mod dependency;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod fragments;
pub mod generator;
pub mod model;
pub mod naming;
pub mod oracle;

// Re-export commonly used items for convenience
pub use tracing;

pub use dependency::{DependencyMap, MissingDependency};
pub use emitter::{EmitContext, EmitterOutput, EmitterRegistry, MemberEmitter};
pub use fragments::{aggregate, Fragments, GeneratedUnit};
pub use generator::Generator;
pub use oracle::{AttributeTargets, KnownTypes, SymbolOracle};

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
