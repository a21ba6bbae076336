//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `STENCIL__SECTION__KEY`, e.g.
//!    `STENCIL__DEFAULTS__INCLUDE_SECURITY=false`
//! 3. Config file (`--config`, `.stencil.toml`, then the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::OutputFormat;

/// File name used for project-local configuration.
pub const LOCAL_CONFIG_FILE: &str = ".stencil.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Version control settings.
    pub git: GitConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub include_security: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            include_security: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Executable used for clone and init.
    pub program: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("STENCIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from '{}'", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the configuration file used when `--config` is absent.
    ///
    /// A `.stencil.toml` in the current directory wins over the global file
    /// from `directories::ProjectDirs`.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return local;
        }
        Self::global_config_path()
    }

    /// The per-user configuration file.
    pub fn global_config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "stencil", "stencil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Value of a dotted key, rendered for display.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "defaults.include_security" => self.defaults.include_security.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => serde_json::to_value(self.output.format)
                .ok()?
                .as_str()?
                .to_string(),
            "git.program" => self.git.program.clone(),
            "logging.file" => self
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Every key understood by [`Self::get`].
    pub const KEYS: &'static [&'static str] = &[
        "defaults.include_security",
        "output.no_color",
        "output.format",
        "git.program",
        "logging.file",
    ];
}
