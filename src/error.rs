//! Error types for the shellmenu installer.

use crate::namespace::NamespacePath;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a namespace backend
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("key not found: {0}")]
    NotFound(NamespacePath),

    #[error("key still has subkeys: {0}")]
    NotEmpty(NamespacePath),

    #[error("invalid key name {0:?}")]
    InvalidSegment(String),

    #[error("access denied: {0}")]
    Denied(NamespacePath),

    #[error("registry error at {path}: {source}")]
    Io {
        path: NamespacePath,
        #[source]
        source: std::io::Error,
    },

    #[error("namespace store error at {path}: {message}")]
    Storage { path: NamespacePath, message: String },
}

impl NamespaceError {
    pub fn is_not_found(&self) -> bool {
        match self {
            NamespaceError::NotFound(_) => true,
            NamespaceError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Run-level errors. Each variant embeds its source in the message so the
/// top-level `Display` reads as the whole breadcrumb trail.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("manifest not found (searched: {})", display_paths(.searched))]
    ManifestNotFound { searched: Vec<PathBuf> },

    #[error("failed to read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to {action} {path}: {source}")]
    Namespace {
        action: &'static str,
        path: NamespacePath,
        #[source]
        source: NamespaceError,
    },

    #[error("failed to set {name} on \"{path}\": {source}")]
    SetValue {
        name: String,
        path: NamespacePath,
        #[source]
        source: NamespaceError,
    },

    #[error("failed to delete registry key \"{path}\": {source}")]
    Erase {
        path: NamespacePath,
        #[source]
        source: Box<SyncError>,
    },

    #[error("failed to delete subkey {child:?} of \"{parent}\": {source}")]
    EraseChild {
        child: String,
        parent: NamespacePath,
        #[source]
        source: Box<SyncError>,
    },

    #[error("failed to create context menu ID {id:?}: {source}")]
    Entry {
        id: String,
        #[source]
        source: Box<SyncError>,
    },

    #[error("elevation helper {name} not found")]
    ElevationHelperNotFound { name: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub(crate) fn namespace(
        action: &'static str,
        path: &NamespacePath,
        source: NamespaceError,
    ) -> Self {
        SyncError::Namespace {
            action,
            path: path.clone(),
            source,
        }
    }

    /// Innermost error of a breadcrumb chain.
    pub fn root_cause(&self) -> &SyncError {
        match self {
            SyncError::Erase { source, .. }
            | SyncError::EraseChild { source, .. }
            | SyncError::Entry { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
