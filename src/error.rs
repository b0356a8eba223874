use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabenvError {
    #[error("No environment record found at: {path}\nHint: run `labenv init` in the project root first.")]
    ConfigNotFound { path: PathBuf },

    #[error("Environment record '{path}' cannot be parsed: {message}\nHint: fix the record by hand or re-create it with `labenv init --force`.")]
    ConfigCorrupt { path: PathBuf, message: String },

    #[error("Environment record already exists at: {path}\nHint: pass --force to overwrite it.")]
    ConfigAlreadyExists { path: PathBuf },

    #[error("No active {tool} environment detected.\nHint: activate the environment before syncing, otherwise the record would be emptied.")]
    EnvironmentInactive { tool: String },

    #[error("Package '{name}' is neither recorded nor currently installed")]
    PackageNotFound { name: String },

    #[error("Cannot fix an environment in state {status}; fix mode only repairs MISSING_DEPENDENCIES")]
    CannotFix { status: String },

    #[error("Backend probe failed: {0}")]
    BackendProbeFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Other(String),
}

impl LabenvError {
    /// Short machine-facing kind, used as the `status` of a failure report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "ConfigNotFound",
            Self::ConfigCorrupt { .. } => "ConfigCorrupt",
            Self::ConfigAlreadyExists { .. } => "ConfigAlreadyExists",
            Self::EnvironmentInactive { .. } => "EnvironmentInactive",
            Self::PackageNotFound { .. } => "PackageNotFound",
            Self::CannotFix { .. } => "CannotFix",
            Self::BackendProbeFailure(_) => "BackendProbeFailure",
            Self::ConfigError(_) => "ConfigError",
            Self::IoError { .. } | Self::StdIoError(_) => "IoError",
            Self::JsonError(_) => "ParseError",
            Self::SystemCommandFailed { .. } => "SystemCommandFailed",
            Self::Interrupted => "Interrupted",
            Self::Usage(_) => "Usage",
            Self::Other(_) => "Error",
        }
    }
}

pub type Result<T> = std::result::Result<T, LabenvError>;
