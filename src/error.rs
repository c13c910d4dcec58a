use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout docr
pub type Result<T> = std::result::Result<T, DocrError>;

#[derive(Debug, Error)]
pub enum DocrError {
    #[error("documentation for {0} is not available")]
    NotFound(String),

    #[error("{name} version {version} is not available")]
    VersionNotFound { name: String, version: String },

    #[error("{name} version {version} is not offered by its source")]
    NotImportable { name: String, version: String },

    #[error("failed to import {name} version {version}: {reason}")]
    ImportFailed {
        name: String,
        version: String,
        reason: String,
    },

    /// Recoverable: callers fall back to the newest importable version.
    #[error("could not detect toolchain version: {0}")]
    ToolchainUndetected(String),

    #[error("no documentation source configured for {0} (see [sources] in docr.toml)")]
    NoSource(String),

    #[error("failed to get available versions of {name}: {reason}")]
    Source { name: String, reason: String },

    #[error("no importable versions found for {0}")]
    NoImportableVersions(String),

    #[error("failed to parse {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocrError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocrError::Io {
            path: path.into(),
            source,
        }
    }

    /// Hint printed by the command layer below the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            DocrError::NotFound(name) => Some(format!("did you mean to run 'docr add {}'?", name)),
            DocrError::VersionNotFound { name, version } => Some(format!(
                "did you mean to run 'docr add {} {}'?",
                name, version
            )),
            DocrError::NotImportable { name, .. } => Some(format!(
                "run 'docr add {}' to import the newest available version",
                name
            )),
            _ => None,
        }
    }
}
