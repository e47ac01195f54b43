//! Config loading facade: one entry point for every caller.

use super::merge::merge_policy;
use super::sources::{self, global_file, workspace_file};
use super::ShellMenuConfig;
use crate::error::SyncError;
use config::File;
use std::path::{Path, PathBuf};

/// Loads layered configuration
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `shellmenu.toml`, `SHELLMENU__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<ShellMenuConfig, SyncError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder);
        let builder = workspace_file::add_to_builder(builder, workspace_root);
        let builder = sources::add_env_to_builder(builder);
        let config: ShellMenuConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Load configuration from an explicit file, replacing the file layers.
    pub fn load_from_file(path: &Path) -> Result<ShellMenuConfig, SyncError> {
        if !path.is_file() {
            return Err(SyncError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = sources::add_env_to_builder(builder);
        let config: ShellMenuConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Path of the global config file, if the platform has a config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
