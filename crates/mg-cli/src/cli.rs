//! CLI configuration and settings management

use crate::{CliError, Result};
use mg_core::diagnostics::DiagnosticDisplayOptions;
use mg_csharp::PrinterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = "mvvmgen.toml";

/// CLI configuration loaded from config files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where and how generated units are written
    pub output: OutputConfig,

    /// C# formatting
    pub printer: PrinterConfig,

    /// Diagnostic rendering and exit policy
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory; `-o` on the command line takes precedence
    pub dir: Option<PathBuf>,

    /// Appended to the type name to form the file name
    pub file_suffix: String,

    /// Replace files that already exist
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file_suffix: ".ViewModel.cs".to_string(),
            overwrite: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    #[default]
    Pretty,
    Plain,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub template: TemplateKind,

    /// Show info-level diagnostics
    pub verbose_info: bool,

    /// Treat warnings as failures for the exit code
    pub deny_warnings: bool,
}

impl DiagnosticsConfig {
    pub fn display_options(&self) -> DiagnosticDisplayOptions {
        match self.template {
            TemplateKind::Pretty => DiagnosticDisplayOptions::pretty(self.verbose_info),
            TemplateKind::Plain => DiagnosticDisplayOptions::plain(self.verbose_info),
        }
    }
}

impl CliConfig {
    /// Load configuration from an explicit path, else the first file found among
    /// `./mvvmgen.toml` and the user config directory, else defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local = Path::new(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from_file(local);
        }

        if let Some(path) = Self::default_config_path() {
            if path.is_file() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| {
                    CliError::Config(format!("Failed to create config directory: {}", e))
                })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CliError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mvvmgen").join("config.toml"))
    }
}
