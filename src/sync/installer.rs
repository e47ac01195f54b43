//! Manifest tree installer

use super::eraser::erase;
use super::{
    ADMIN_VALUE, CHILDREN_KEY, COMMAND_KEY, DEFAULT_VALUE, EXTENDED_VALUE, ICON_VALUE,
    SUBMENU_VALUE, TITLE_VALUE,
};
use crate::error::SyncError;
use crate::locate::ElevationHelper;
use crate::manifest::{ManifestNode, ManifestTree, NodeKind};
use crate::namespace::{Namespace, NamespacePath, NamespaceValue};
use crate::projection::Projection;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Outcome of a successful install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Top-level entries installed
    pub entries: usize,
    pub items: usize,
    pub folders: usize,
}

/// Outcome of a successful removal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    /// Top-level entries whose keys were erased
    pub entries: usize,
    /// Keys deleted in total
    pub keys_removed: usize,
}

/// Synchronizes a manifest tree into a namespace root
///
/// Every entry is erased and recreated from scratch, so nothing left behind by
/// an earlier manifest survives. The first failure aborts the run; entries
/// already written stay in place.
pub struct Installer<'a, N: Namespace> {
    namespace: &'a N,
    root: NamespacePath,
    projection: Projection,
    helper: ElevationHelper,
}

impl<'a, N: Namespace> Installer<'a, N> {
    pub fn new(
        namespace: &'a N,
        root: NamespacePath,
        projection: Projection,
        helper: ElevationHelper,
    ) -> Self {
        Self {
            namespace,
            root,
            projection,
            helper,
        }
    }

    /// Install every entry of `tree` beneath the root.
    #[instrument(skip(self, tree), fields(root = %self.root))]
    pub fn install(&self, tree: &ManifestTree) -> Result<InstallReport, SyncError> {
        let started = Instant::now();
        info!(entries = tree.len(), "Installing menu tree");

        let mut report = InstallReport::default();
        for (id, node) in tree {
            self.install_node(&self.root, id, node, &mut report)
                .map_err(|e| SyncError::Entry {
                    id: id.clone(),
                    source: Box::new(e),
                })?;
            report.entries += 1;
        }

        info!(
            items = report.items,
            folders = report.folders,
            duration_ms = started.elapsed().as_millis(),
            "Menu tree installed"
        );
        Ok(report)
    }

    /// Erase the keys of every top-level entry of `tree`.
    #[instrument(skip(self, tree), fields(root = %self.root))]
    pub fn remove(&self, tree: &ManifestTree) -> Result<RemoveReport, SyncError> {
        let mut report = RemoveReport::default();
        for id in tree.keys() {
            let path = self.entry_path(&self.root, id)?;
            let removed = erase(self.namespace, &path).map_err(|e| SyncError::Erase {
                path: path.clone(),
                source: Box::new(e),
            })?;
            debug!(id = %id, keys = removed, "Removed menu entry");
            if removed > 0 {
                report.entries += 1;
            }
            report.keys_removed += removed;
        }
        info!(
            entries = report.entries,
            keys = report.keys_removed,
            "Menu entries removed"
        );
        Ok(report)
    }

    fn install_node(
        &self,
        parent: &NamespacePath,
        id: &str,
        node: &ManifestNode,
        report: &mut InstallReport,
    ) -> Result<(), SyncError> {
        let path = self.entry_path(parent, id)?;
        debug!(path = %path, folder = node.is_folder(), "Installing menu entry");

        self.recreate(&path)?;
        let key = self.create(&path)?;

        self.set(&key, &path, TITLE_VALUE, NamespaceValue::Str(node.title.clone()))?;
        let icon = self
            .projection
            .icon(node.icon_path.as_deref(), node.icon_index);
        if !icon.is_empty() {
            self.set(&key, &path, ICON_VALUE, NamespaceValue::Str(icon))?;
        }
        if node.extended {
            self.set(&key, &path, EXTENDED_VALUE, NamespaceValue::Str(String::new()))?;
        }
        if node.admin {
            self.set(&key, &path, ADMIN_VALUE, NamespaceValue::Str(String::new()))?;
        }

        match &node.kind {
            NodeKind::Folder { children } => {
                self.set(&key, &path, SUBMENU_VALUE, NamespaceValue::Str(String::new()))?;
                let container = self.entry_path(&path, CHILDREN_KEY)?;
                self.create(&container)?;
                for (child_id, child) in children {
                    self.install_node(&container, child_id, child, report)
                        .map_err(|e| SyncError::Entry {
                            id: child_id.clone(),
                            source: Box::new(e),
                        })?;
                }
                report.folders += 1;
            }
            NodeKind::Item { command } => {
                let command_path = self.entry_path(&path, COMMAND_KEY)?;
                self.recreate(&command_path)?;
                let command_key = self.create(&command_path)?;
                let line = self
                    .projection
                    .command(node.admin, command, || self.helper.locate())?;
                self.set(
                    &command_key,
                    &command_path,
                    DEFAULT_VALUE,
                    NamespaceValue::ExpandStr(line),
                )?;
                report.items += 1;
            }
        }
        Ok(())
    }

    fn entry_path(&self, parent: &NamespacePath, id: &str) -> Result<NamespacePath, SyncError> {
        parent
            .child(id)
            .map_err(|e| SyncError::namespace("resolve key under", parent, e))
    }

    fn recreate(&self, path: &NamespacePath) -> Result<(), SyncError> {
        let removed = erase(self.namespace, path).map_err(|e| SyncError::Erase {
            path: path.clone(),
            source: Box::new(e),
        })?;
        if removed > 0 {
            trace!(path = %path, keys = removed, "Erased stale keys");
        }
        Ok(())
    }

    fn create(&self, path: &NamespacePath) -> Result<N::Node, SyncError> {
        self.namespace
            .open_or_create(path)
            .map_err(|e| SyncError::namespace("create registry key", path, e))
    }

    fn set(
        &self,
        key: &N::Node,
        path: &NamespacePath,
        name: &str,
        value: NamespaceValue,
    ) -> Result<(), SyncError> {
        trace!(path = %path, name, value = value.as_str(), "Set value");
        self.namespace
            .set_value(key, name, &value)
            .map_err(|source| SyncError::SetValue {
                name: display_value_name(name),
                path: path.clone(),
                source,
            })
    }
}

fn display_value_name(name: &str) -> String {
    if name.is_empty() {
        "(Default)".to_string()
    } else {
        name.to_string()
    }
}
