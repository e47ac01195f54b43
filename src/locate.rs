//! Locating the manifest and the elevation helper on disk

use crate::error::SyncError;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories probed when looking for companion files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots {
    /// Current working directory
    pub cwd: Option<PathBuf>,
    /// Directory containing the running executable
    pub exe_dir: Option<PathBuf>,
    /// Whether to fall back to a `PATH` lookup for executables
    pub search_path: bool,
}

impl SearchRoots {
    /// Roots of the running process.
    pub fn from_process() -> Self {
        Self {
            cwd: std::env::current_dir().ok(),
            exe_dir: std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf)),
            search_path: true,
        }
    }

    /// Fixed roots without a `PATH` fallback.
    pub fn fixed(cwd: Option<PathBuf>, exe_dir: Option<PathBuf>) -> Self {
        Self {
            cwd,
            exe_dir,
            search_path: false,
        }
    }

    fn manifest_candidates(&self, file_name: &str) -> Vec<PathBuf> {
        [&self.cwd, &self.exe_dir]
            .into_iter()
            .flatten()
            .map(|dir| dir.join(file_name))
            .collect()
    }

    fn helper_candidates(&self, file_name: &str) -> Vec<PathBuf> {
        [&self.cwd, &self.exe_dir]
            .into_iter()
            .flatten()
            .flat_map(|dir| [dir.join(file_name), dir.join("bin").join(file_name)])
            .collect()
    }
}

fn first_file(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

/// Find the manifest in the working directory, then beside the executable.
pub fn find_manifest(roots: &SearchRoots, file_name: &str) -> Result<PathBuf, SyncError> {
    let candidates = roots.manifest_candidates(file_name);
    match first_file(&candidates) {
        Some(found) => {
            debug!(path = %found.display(), "Located manifest");
            Ok(found)
        }
        None => Err(SyncError::ManifestNotFound {
            searched: candidates,
        }),
    }
}

/// Lazily resolved location of the elevation helper executable
///
/// Probes the working directory, its `bin`, the executable's directory, its
/// `bin`, and finally `PATH`. The first successful lookup is remembered for the
/// lifetime of the value.
#[derive(Debug)]
pub struct ElevationHelper {
    file_name: String,
    roots: SearchRoots,
    resolved: OnceCell<PathBuf>,
}

impl ElevationHelper {
    pub fn new(file_name: impl Into<String>, roots: SearchRoots) -> Self {
        Self {
            file_name: file_name.into(),
            roots,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve (or return the remembered) helper path.
    pub fn locate(&self) -> Result<PathBuf, SyncError> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.clone());
        }
        let found = self.probe()?;
        debug!(path = %found.display(), "Located elevation helper");
        Ok(self.resolved.get_or_init(|| found).clone())
    }

    fn probe(&self) -> Result<PathBuf, SyncError> {
        if let Some(found) = first_file(&self.roots.helper_candidates(&self.file_name)) {
            return Ok(found);
        }
        if self.roots.search_path {
            if let Ok(found) = which::which(&self.file_name) {
                return Ok(found);
            }
        }
        Err(SyncError::ElevationHelperNotFound {
            name: self.file_name.clone(),
        })
    }
}
