//! Shared test utilities for integration tests
//!
//! Serializes access to process environment variables and builds manifest
//! fixtures.

use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "PATH",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_STATE_HOME",
];

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(String, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        let mut names: Vec<String> = ISOLATED_VARS.iter().map(|s| s.to_string()).collect();
        names.extend(
            std::env::vars()
                .map(|(name, _)| name)
                .filter(|name| name.starts_with("SHELLMENU")),
        );
        Self {
            vars: names
                .into_iter()
                .map(|name| {
                    let value = std::env::var(&name).ok();
                    (name, value)
                })
                .collect(),
        }
    }

    fn restore(self) {
        for (name, _) in std::env::vars().filter(|(name, _)| name.starts_with("SHELLMENU")) {
            std::env::remove_var(name);
        }
        for (name, value) in self.vars {
            match value {
                Some(v) => std::env::set_var(&name, v),
                None => std::env::remove_var(&name),
            }
        }
    }
}

/// Run `f` with HOME and the XDG directories pointed into `test_dir` and every
/// `SHELLMENU*` variable cleared. `f` may also change `PATH`. The original
/// environment is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    for (name, _) in std::env::vars().filter(|(name, _)| name.starts_with("SHELLMENU")) {
        std::env::remove_var(name);
    }
    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("config");
    let data_home = test_dir.path().join("data");
    let state_home = test_dir.path().join("state");
    for dir in [&home, &config_home, &data_home, &state_home] {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::set_var("XDG_DATA_HOME", &data_home);
    std::env::set_var("XDG_STATE_HOME", &state_home);

    let result = f();

    env_state.restore();

    result
}

/// Manifest fixtures
pub mod fixture {
    use shellmenu::manifest::{ManifestNode, ManifestTree};

    pub fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    pub fn item(title: &str, command: &[&str]) -> ManifestNode {
        ManifestNode::item(title, tokens(command))
    }

    pub fn folder(title: &str, children: Vec<(&str, ManifestNode)>) -> ManifestNode {
        ManifestNode::folder(title, tree(children))
    }

    pub fn tree(entries: Vec<(&str, ManifestNode)>) -> ManifestTree {
        entries
            .into_iter()
            .map(|(id, node)| (id.to_string(), node))
            .collect()
    }

    /// A two-level menu with icons, markers and a placeholder command.
    pub fn sample_tree() -> ManifestTree {
        tree(vec![
            (
                "dev",
                folder(
                    "Developer",
                    vec![
                        (
                            "term",
                            item("Terminal here", &["wt.exe", "-d", "%V"])
                                .with_icon("wt.exe", Some(0)),
                        ),
                        (
                            "tools",
                            folder(
                                "Tools",
                                vec![(
                                    "run",
                                    item("Run script", &[r"${manifestFolder}\tools\run.bat"]),
                                )],
                            ),
                        ),
                    ],
                ),
            ),
            (
                "notes",
                item("Notes", &["notepad.exe"])
                    .with_icon(r"${manifestFolder}\icons\app.dll", Some(2))
                    .with_extended(true),
            ),
        ])
    }

    pub const SAMPLE_MANIFEST_JSON: &str = r#"{
    "items": {
        "dev": {
            "type": "folder",
            "title": "Developer",
            "items": {
                "term": {
                    "type": "item",
                    "title": "Terminal here",
                    "iconPath": "wt.exe",
                    "iconIndex": 0,
                    "command": ["wt.exe", "-d", "%V"]
                },
                "tools": {
                    "type": "folder",
                    "title": "Tools",
                    "items": {
                        "run": {
                            "type": "item",
                            "title": "Run script",
                            "command": ["${manifestFolder}\\tools\\run.bat"]
                        }
                    }
                }
            }
        },
        "notes": {
            "type": "item",
            "title": "Notes",
            "iconPath": "${manifestFolder}\\icons\\app.dll",
            "iconIndex": 2,
            "extended": true,
            "command": ["notepad.exe"]
        }
    }
}"#;
}
