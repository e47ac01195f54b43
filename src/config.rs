//! Configuration System
//!
//! Layered configuration: built-in defaults, a global file, a workspace file and
//! environment overrides, merged with the `config` crate and validated before use.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use crate::namespace::NamespacePath;
use crate::projection::{ELEVATE_DIRECTIVE, MANIFEST_FOLDER_PLACEHOLDER};
use crate::sync::DEFAULT_ROOT;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellMenuConfig {
    #[serde(default)]
    pub namespace: NamespaceConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub elevation: ElevationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store the menu tree is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Windows registry
    Registry,
    /// Sled database emulating the registry
    Sled,
}

/// Registry hive the namespace root lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiveName {
    CurrentUser,
    LocalMachine,
}

impl HiveName {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HiveName::CurrentUser => "HKCU",
            HiveName::LocalMachine => "HKLM",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    #[serde(default = "default_hive")]
    pub hive: HiveName,

    /// Key under which menu entries are created, `\`-separated
    #[serde(default = "default_root")]
    pub root: String,

    /// Database directory for the sled backend
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_backend() -> Backend {
    if cfg!(windows) {
        Backend::Registry
    } else {
        Backend::Sled
    }
}

fn default_hive() -> HiveName {
    HiveName::CurrentUser
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            hive: default_hive(),
            root: default_root(),
            store_path: None,
        }
    }
}

impl NamespaceConfig {
    pub fn root_path(&self) -> Result<NamespacePath, SyncError> {
        NamespacePath::parse(&self.root)
            .map_err(|e| SyncError::Config(format!("invalid namespace root {:?}: {}", self.root, e)))
    }

    /// Sled database directory: the configured path, else the platform data dir.
    pub fn resolve_store_path(&self) -> Result<PathBuf, SyncError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        ProjectDirs::from("", "", "shellmenu")
            .map(|dirs| dirs.data_dir().join("namespace"))
            .ok_or_else(|| {
                SyncError::Config("no data directory available; set namespace.store_path".into())
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// File name probed by the manifest locator
    #[serde(default = "default_manifest_file")]
    pub file_name: String,

    /// Token replaced by the manifest's directory
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_manifest_file() -> String {
    "manifest.json".to_string()
}

fn default_placeholder() -> String {
    MANIFEST_FOLDER_PLACEHOLDER.to_string()
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file_name: default_manifest_file(),
            placeholder: default_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Executable name of the elevation helper
    #[serde(default = "default_helper")]
    pub helper: String,

    /// Argument telling the helper to elevate the rest of the command line
    #[serde(default = "default_directive")]
    pub directive: String,
}

fn default_helper() -> String {
    "nircmd.exe".to_string()
}

fn default_directive() -> String {
    ELEVATE_DIRECTIVE.to_string()
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            helper: default_helper(),
            directive: default_directive(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Namespace(String),
    Manifest(String),
    Elevation(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Namespace(msg) => write!(f, "namespace: {}", msg),
            ValidationError::Manifest(msg) => write!(f, "manifest: {}", msg),
            ValidationError::Elevation(msg) => write!(f, "elevation: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ShellMenuConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        match NamespacePath::parse(&self.namespace.root) {
            Ok(root) if root.is_root() => errors.push(ValidationError::Namespace(
                "root cannot be empty".to_string(),
            )),
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::Namespace(format!(
                "invalid root {:?}: {}",
                self.namespace.root, e
            ))),
        }
        if self.manifest.file_name.trim().is_empty() {
            errors.push(ValidationError::Manifest(
                "file_name cannot be empty".to_string(),
            ));
        }
        if self.elevation.helper.trim().is_empty() {
            errors.push(ValidationError::Elevation(
                "helper cannot be empty".to_string(),
            ));
        }
        if self.elevation.directive.trim().is_empty() {
            errors.push(ValidationError::Elevation(
                "directive cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every problem into a single error.
    pub fn validated(self) -> Result<Self, SyncError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SyncError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
