//! Error types for the command line front end.

use percentgrid_core::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the `percentgrid` binary.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Reading the description failed
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither TOML nor YAML
    #[error("unknown description format: {} (expected .toml, .yaml or .yml)", .0.display())]
    UnknownFormat(PathBuf),

    /// Layout computation failed
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The description is inconsistent
    #[error("invalid description: {0}")]
    Config(String),
}

/// Result type for CLI operations.
pub(crate) type CliResult<T> = std::result::Result<T, CliError>;
