//! CLI route: single route table and run context. Dispatches to the installer and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_dry_run, format_install_summary, format_remove_summary};
use crate::config::{Backend, ConfigLoader, ShellMenuConfig};
use crate::error::SyncError;
use crate::locate::{find_manifest, ElevationHelper, SearchRoots};
use crate::manifest::{manifest_dir, Manifest};
use crate::namespace::{MemoryNamespace, Namespace, NamespacePath, SledNamespace};
use crate::projection::Projection;
use crate::sync::{InstallReport, Installer, RemoveReport};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manifest located and decoded for one run
struct LoadedManifest {
    manifest: Manifest,
    base_dir: PathBuf,
}

enum Outcome {
    Installed(InstallReport),
    Removed(RemoveReport),
}

/// Runtime context for CLI execution: configuration, search roots and manifest override.
pub struct RunContext {
    config: ShellMenuConfig,
    roots: SearchRoots,
    manifest_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };

        let mut roots = SearchRoots::from_process();
        roots.cwd = Some(absolute(&workspace_root));
        Ok(Self::from_config(config, roots))
    }

    pub fn from_config(config: ShellMenuConfig, roots: SearchRoots) -> Self {
        Self {
            config,
            roots,
            manifest_path: None,
        }
    }

    /// Use this manifest instead of searching for one.
    pub fn with_manifest(mut self, manifest_path: Option<PathBuf>) -> Self {
        self.manifest_path = manifest_path;
        self
    }

    pub fn config(&self) -> &ShellMenuConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let loaded = self.load_manifest()?;
        let root = self.config.namespace.root_path()?;

        match command {
            Commands::Install { dry_run: true } => {
                let namespace = MemoryNamespace::new();
                let report = self.installer(&namespace, &root, &loaded).install(&loaded.manifest.items)?;
                Ok(format_dry_run(
                    &namespace.snapshot(&root),
                    &root,
                    &report,
                    &self.location(&root),
                ))
            }
            Commands::Install { dry_run: false } | Commands::Remove => {
                let outcome = self.run_on_backend(command, &root, &loaded)?;
                Ok(match outcome {
                    Outcome::Installed(report) => {
                        format_install_summary(&report, &self.location(&root))
                    }
                    Outcome::Removed(report) => format_remove_summary(&report, &self.location(&root)),
                })
            }
        }
    }

    fn load_manifest(&self) -> Result<LoadedManifest, SyncError> {
        let path = match &self.manifest_path {
            Some(path) => path.clone(),
            None => find_manifest(&self.roots, &self.config.manifest.file_name)?,
        };
        let manifest = Manifest::load(&path)?;
        let base_dir = manifest_dir(&path)?;
        info!(
            manifest = %path.display(),
            base_dir = %base_dir.display(),
            nodes = manifest.node_count(),
            "Loaded manifest"
        );
        Ok(LoadedManifest { manifest, base_dir })
    }

    fn installer<'a, N: Namespace>(
        &self,
        namespace: &'a N,
        root: &NamespacePath,
        loaded: &LoadedManifest,
    ) -> Installer<'a, N> {
        let projection = Projection::new(loaded.base_dir.to_string_lossy().into_owned())
            .with_placeholder(self.config.manifest.placeholder.clone())
            .with_elevate_directive(self.config.elevation.directive.clone());
        let helper = ElevationHelper::new(self.config.elevation.helper.clone(), self.roots.clone());
        Installer::new(namespace, root.clone(), projection, helper)
    }

    fn run<N: Namespace>(
        &self,
        namespace: &N,
        command: &Commands,
        root: &NamespacePath,
        loaded: &LoadedManifest,
    ) -> Result<Outcome, SyncError> {
        let installer = self.installer(namespace, root, loaded);
        match command {
            Commands::Remove => installer.remove(&loaded.manifest.items).map(Outcome::Removed),
            Commands::Install { .. } => installer
                .install(&loaded.manifest.items)
                .map(Outcome::Installed),
        }
    }

    fn run_on_backend(
        &self,
        command: &Commands,
        root: &NamespacePath,
        loaded: &LoadedManifest,
    ) -> Result<Outcome, SyncError> {
        match self.config.namespace.backend {
            Backend::Sled => {
                let store_path = self.config.namespace.resolve_store_path()?;
                debug!(store = %store_path.display(), "Opening sled namespace");
                std::fs::create_dir_all(&store_path).map_err(|e| {
                    SyncError::Config(format!(
                        "Failed to create namespace store {}: {}",
                        store_path.display(),
                        e
                    ))
                })?;
                let namespace = SledNamespace::new(&store_path)
                    .map_err(|e| SyncError::namespace("open store at", root, e))?;
                let result = self.run(&namespace, command, root, loaded);
                let flushed = namespace
                    .flush()
                    .map_err(|e| SyncError::namespace("flush store at", root, e));
                finish_run(result, flushed)
            }
            Backend::Registry => self.run_on_registry(command, root, loaded),
        }
    }

    #[cfg(windows)]
    fn run_on_registry(
        &self,
        command: &Commands,
        root: &NamespacePath,
        loaded: &LoadedManifest,
    ) -> Result<Outcome, SyncError> {
        use crate::config::HiveName;
        use crate::namespace::{Hive, RegistryNamespace};

        let hive = match self.config.namespace.hive {
            HiveName::CurrentUser => Hive::CurrentUser,
            HiveName::LocalMachine => Hive::LocalMachine,
        };
        self.run(&RegistryNamespace::new(hive), command, root, loaded)
    }

    #[cfg(not(windows))]
    fn run_on_registry(
        &self,
        _command: &Commands,
        _root: &NamespacePath,
        _loaded: &LoadedManifest,
    ) -> Result<Outcome, SyncError> {
        Err(SyncError::Config(
            "the registry backend is only available on Windows; set namespace.backend = \"sled\""
                .to_string(),
        ))
    }

    /// Human-readable location of the namespace root.
    fn location(&self, root: &NamespacePath) -> String {
        match self.config.namespace.backend {
            Backend::Registry => format!("{}\\{}", self.config.namespace.hive.abbreviation(), root),
            Backend::Sled => match self.config.namespace.resolve_store_path() {
                Ok(store) => format!("{} in {}", root, store.display()),
                Err(_) => root.to_string(),
            },
        }
    }
}

/// A failed run wins over a failed flush, so its breadcrumb chain is reported.
fn finish_run<T>(
    result: Result<T, SyncError>,
    flushed: Result<(), SyncError>,
) -> Result<T, SyncError> {
    let value = result?;
    flushed?;
    Ok(value)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
