use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("No bundled template for '{file}'")]
    MissingTemplate { file: String },

    #[error("Failed to parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Top level of {path} is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{0}' is not a managed config file")]
    UnknownFile(String),

    #[error("No data directory configured; call .data_dir() on the builder")]
    NoDataDir,

    #[error("App name is required for the platform data directory; call .app_name() on the builder")]
    AppNameRequired,

    #[error("No template source configured; call .templates() on the builder")]
    NoTemplateSource,

    #[error("Failed to load typed configuration: {0}")]
    Load(#[from] confique::Error),
}
