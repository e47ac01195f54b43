//! Configuration sources, lowest precedence first: global file, workspace
//! file, environment.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Prefix of environment overrides, e.g. `SHELLMENU__NAMESPACE__BACKEND=sled`.
pub const ENV_PREFIX: &str = "SHELLMENU";

/// Add environment variable overrides to builder.
pub fn add_env_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__"),
    )
}
