//! Command-line driver for the reactive member generator.
//!
//! Reads JSON member models, runs the dependency analysis and the emitters over every type,
//! and writes one generated C# unit per type.

pub mod cli;
pub mod commands;
pub mod diagnostics;
pub mod model;

pub mod error {
    use miette::{Diagnostic, NamedSource, SourceSpan};
    use thiserror::Error;

    #[derive(Error, Debug, Diagnostic)]
    pub enum CliError {
        #[error("IO error: {0}")]
        #[diagnostic(code(mvvmgen::io))]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        #[diagnostic(
            code(mvvmgen::config),
            help("Check mvvmgen.toml for correct syntax and values")
        )]
        Config(String),

        #[error("Model error: {0}")]
        #[diagnostic(
            code(mvvmgen::model),
            help("A model file is a JSON object with a `types` array and an optional `metadata` table")
        )]
        Model(String),

        #[error("Malformed model file: {message}")]
        #[diagnostic(code(mvvmgen::model_syntax))]
        ModelSyntax {
            message: String,
            #[source_code]
            src: NamedSource<String>,
            #[label("here")]
            span: SourceSpan,
        },

        #[error("Generation error: {0}")]
        #[diagnostic(code(mvvmgen::generation))]
        Generation(String),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
