//! Merge rules: defaults, override order, conflict handling.

use crate::projection::{ELEVATE_DIRECTIVE, MANIFEST_FOLDER_PLACEHOLDER};
use crate::sync::DEFAULT_ROOT;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Backend used when none is configured: the registry where one exists.
pub fn default_backend() -> &'static str {
    if cfg!(windows) {
        "registry"
    } else {
        "sled"
    }
}

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("namespace.backend", default_backend())?
        .set_default("namespace.hive", "current_user")?
        .set_default("namespace.root", DEFAULT_ROOT)?
        .set_default("manifest.file_name", "manifest.json")?
        .set_default("manifest.placeholder", MANIFEST_FOLDER_PLACEHOLDER)?
        .set_default("elevation.helper", "nircmd.exe")?
        .set_default("elevation.directive", ELEVATE_DIRECTIVE)
}
