//! Layered configuration loading

use crate::integration::with_isolated_env;
use shellmenu::config::{Backend, ConfigLoader, HiveName, WORKSPACE_CONFIG_FILE};
use shellmenu::error::SyncError;
use std::fs;
use tempfile::TempDir;

fn write_global(config: &str) {
    let path = ConfigLoader::global_config_path().unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, config).unwrap();
}

#[test]
fn test_defaults_without_any_file() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.namespace.hive, HiveName::CurrentUser);
        assert_eq!(config.manifest.file_name, "manifest.json");
        assert_eq!(config.elevation.helper, "nircmd.exe");
    });
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        write_global(
            r#"
[elevation]
helper = "global-helper.exe"
directive = "runas"

[manifest]
file_name = "global.json"
"#,
        );
        let workspace = TempDir::new().unwrap();
        fs::write(
            workspace.path().join(WORKSPACE_CONFIG_FILE),
            "[elevation]\nhelper = \"workspace-helper.exe\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.elevation.helper, "workspace-helper.exe");
        assert_eq!(config.elevation.directive, "runas");
        assert_eq!(config.manifest.file_name, "global.json");
    });
}

#[test]
fn test_environment_overrides_files() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        fs::write(
            workspace.path().join(WORKSPACE_CONFIG_FILE),
            "[namespace]\nbackend = \"registry\"\n",
        )
        .unwrap();
        std::env::set_var("SHELLMENU__NAMESPACE__BACKEND", "sled");
        std::env::set_var("SHELLMENU__MANIFEST__FILE_NAME", "menu.json");

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.namespace.backend, Backend::Sled);
        assert_eq!(config.manifest.file_name, "menu.json");
    });
}

#[test]
fn test_explicit_file_skips_global_and_workspace_files() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        write_global("[elevation]\nhelper = \"global-helper.exe\"\n");
        let workspace = TempDir::new().unwrap();
        fs::write(
            workspace.path().join(WORKSPACE_CONFIG_FILE),
            "[elevation]\nhelper = \"workspace-helper.exe\"\n",
        )
        .unwrap();
        let explicit = workspace.path().join("explicit.toml");
        fs::write(&explicit, "[manifest]\nplaceholder = \"$(root)\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&explicit).unwrap();
        assert_eq!(config.elevation.helper, "nircmd.exe");
        assert_eq!(config.manifest.placeholder, "$(root)");
    });
}

#[test]
fn test_invalid_workspace_file_fails_validation() {
    let test_dir = TempDir::new().unwrap();
    with_isolated_env(&test_dir, || {
        let workspace = TempDir::new().unwrap();
        fs::write(
            workspace.path().join(WORKSPACE_CONFIG_FILE),
            "[elevation]\nhelper = \"\"\n\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();

        let err = ConfigLoader::load(workspace.path()).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("elevation: helper cannot be empty"));
        assert!(msg.contains("logging: Invalid log format: xml"));
    });
}
