//! Error reporting, logging setup and diagnostic output

use crate::cli::DiagnosticsConfig;
use crate::{CliError, Result};
use clap::ValueEnum;
use console::style;
use mg_core::diagnostics::{render_diagnostics, Diagnostic, DiagnosticLevel};

/// Set up enhanced error reporting with miette
pub fn setup_error_reporting() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .map_err(|e| CliError::Config(format!("Failed to setup error reporting: {}", e)))?;

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Filter directive for the given flags. `--log` wins over `--quiet`, which wins over
/// `--verbose`.
pub fn log_directive(verbose: u8, quiet: bool, level: Option<LogLevel>) -> &'static str {
    if let Some(level) = level {
        return match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
    }
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so generated code on stdout stays
/// clean.
pub fn setup_logging(
    verbose: u8,
    quiet: bool,
    level: Option<LogLevel>,
    format: LogFormat,
) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::new(log_directive(verbose, quiet, level));

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(formatter)
            .with(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(formatter.json())
            .with(filter)
            .try_init(),
    };
    result.map_err(|e| CliError::Config(format!("Failed to setup logging: {}", e)))
}

/// Print `err` through the miette handler.
pub fn report_cli_error(err: CliError) {
    eprintln!("{:?}", miette::Report::new(err));
}

/// Error and warning counts over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub errors: usize,
    pub warnings: usize,
}

impl Tally {
    pub fn add(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            match diagnostic.level {
                DiagnosticLevel::Error => self.errors += 1,
                DiagnosticLevel::Warning => self.warnings += 1,
                DiagnosticLevel::Info => {}
            }
        }
    }

    pub fn failed(&self, deny_warnings: bool) -> bool {
        self.errors > 0 || (deny_warnings && self.warnings > 0)
    }
}

/// Write one type's diagnostics to stderr.
pub fn print_diagnostics(type_name: &str, diagnostics: &[Diagnostic], config: &DiagnosticsConfig) {
    let options = config.display_options();
    for line in render_diagnostics(diagnostics, type_name, &options) {
        if line.starts_with("error") || line.contains("ERROR") {
            eprintln!("{}", style(line).red());
        } else if line.starts_with("warning") || line.contains("WARNING") {
            eprintln!("{}", style(line).yellow());
        } else {
            eprintln!("{}", line);
        }
    }
}
