//! Configuration module for Lens.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level configuration for Lens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub workspaces: WorkspacesConfig,
    pub logging: LoggingConfig,
}

/// Lens service endpoints and client identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST API. Resource segments are appended to it.
    pub api_url: String,
    /// URL of the Lens web application, handed out to logged-in users.
    pub lens_url: String,
    /// Value of the `X-Lens-Source` header.
    pub source: String,
    /// Value of the `X-Lens-Version` header.
    pub version: String,
}

/// Local workspace settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspacesConfig {
    /// Directory under which workspace roots are created.
    pub root: PathBuf,
    /// Lowercase extensions (without dot) of files the host can open.
    pub openable_extensions: Vec<String>,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/lens/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("lens")
            .join("config.yaml")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://lens-api.ondsel.com".to_string(),
            lens_url: "https://lens.ondsel.com/".to_string(),
            source: "lens-cli".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for WorkspacesConfig {
    fn default() -> Self {
        Self {
            root: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("lens")
                .join("workspaces"),
            openable_extensions: DEFAULT_OPENABLE_EXTENSIONS
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// File types the CAD host opens out of the box.
const DEFAULT_OPENABLE_EXTENSIONS: &[&str] = &[
    "fcstd", "step", "stp", "iges", "igs", "brep", "brp", "stl", "obj", "dxf", "svg", "ifc",
    "fcmacro", "py",
];

impl WorkspacesConfig {
    /// Whether a file with this name passes the openable allow-list.
    ///
    /// Matching is case-insensitive on the final extension.
    pub fn is_openable(&self, file_name: &str) -> bool {
        let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.openable_extensions.iter().any(|allowed| *allowed == ext)
    }
}

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"api.api_url"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- api ---
        for (field, value) in [
            ("api.api_url", &self.api.api_url),
            ("api.lens_url", &self.api.lens_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(ValidationError {
                    field: field.into(),
                    message: format!("unsupported scheme '{}'", parsed.scheme()),
                }),
                Err(e) => errors.push(ValidationError {
                    field: field.into(),
                    message: format!("invalid URL '{value}': {e}"),
                }),
            }
        }
        if self.api.source.trim().is_empty() {
            errors.push(ValidationError {
                field: "api.source".into(),
                message: "must not be empty".into(),
            });
        }
        if self.api.version.trim().is_empty() {
            errors.push(ValidationError {
                field: "api.version".into(),
                message: "must not be empty".into(),
            });
        }

        // --- workspaces ---
        // The root is created on first use, so only reject an empty path.
        if self.workspaces.root.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "workspaces.root".into(),
                message: "must not be empty".into(),
            });
        }
        if self.workspaces.openable_extensions.is_empty() {
            errors.push(ValidationError {
                field: "workspaces.openable_extensions".into(),
                message: "must list at least one extension".into(),
            });
        }
        for ext in &self.workspaces.openable_extensions {
            if ext.is_empty() || ext.starts_with('.') || *ext != ext.to_lowercase() {
                errors.push(ValidationError {
                    field: "workspaces.openable_extensions".into(),
                    message: format!("'{ext}' must be a lowercase extension without a dot"),
                });
            }
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use lens_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .api_url("http://localhost:3030")
///     .source("my-addon")
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- api ---

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.api_url = url.into();
        self
    }

    pub fn lens_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.lens_url = url.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.config.api.source = source.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.api.version = version.into();
        self
    }

    // --- workspaces ---

    pub fn workspaces_root(mut self, root: PathBuf) -> Self {
        self.config.workspaces.root = root;
        self
    }

    pub fn openable_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.workspaces.openable_extensions =
            extensions.into_iter().map(Into::into).collect();
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the [`Config`] without validation.
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the [`Config`] or all errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
