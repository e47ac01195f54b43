//! Manifest model
//!
//! The declarative menu tree read once per run. Nodes decode into a tagged
//! union over items and folders; siblings are kept in identifier order.

use crate::error::SyncError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};

/// Top-level menu entries keyed by identifier
pub type ManifestTree = BTreeMap<String, ManifestNode>;

/// One menu entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct ManifestNode {
    pub title: String,
    /// Icon resource path; may contain the manifest folder placeholder
    pub icon_path: Option<String>,
    /// Sub-icon within a multi-icon resource
    pub icon_index: Option<i64>,
    /// Only shown with the extended-display modifier (Shift)
    pub extended: bool,
    /// Requires elevation
    pub admin: bool,
    pub kind: NodeKind,
}

/// Variant-specific part of a [`ManifestNode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Item { command: Vec<String> },
    Folder { children: ManifestTree },
}

impl ManifestNode {
    pub fn item(title: impl Into<String>, command: Vec<String>) -> Self {
        Self::new(title, NodeKind::Item { command })
    }

    pub fn folder(title: impl Into<String>, children: ManifestTree) -> Self {
        Self::new(title, NodeKind::Folder { children })
    }

    fn new(title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            title: title.into(),
            icon_path: None,
            icon_index: None,
            extended: false,
            admin: false,
            kind,
        }
    }

    pub fn with_icon(mut self, path: impl Into<String>, index: Option<i64>) -> Self {
        self.icon_path = Some(path.into());
        self.icon_index = index;
        self
    }

    pub fn with_extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match &self.kind {
            NodeKind::Item { .. } => 1,
            NodeKind::Folder { children } => {
                1 + children.values().map(ManifestNode::node_count).sum::<usize>()
            }
        }
    }
}

/// On-disk shape of a node before variant checks
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    icon_path: Option<String>,
    #[serde(default)]
    icon_index: Option<i64>,
    #[serde(default)]
    extended: Option<bool>,
    #[serde(default)]
    admin: Option<bool>,
    #[serde(default)]
    command: Option<Vec<String>>,
    #[serde(default)]
    items: Option<ManifestTree>,
}

impl TryFrom<RawNode> for ManifestNode {
    type Error = String;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let title = raw.title.unwrap_or_default();
        let kind = match raw.kind.as_deref().unwrap_or("item") {
            "item" | "" => {
                if raw.items.as_ref().is_some_and(|items| !items.is_empty()) {
                    return Err(format!("item {:?} cannot contain nested items", title));
                }
                NodeKind::Item {
                    command: raw.command.unwrap_or_default(),
                }
            }
            "folder" => {
                if raw.command.as_ref().is_some_and(|cmd| !cmd.is_empty()) {
                    return Err(format!("folder {:?} cannot have a command", title));
                }
                NodeKind::Folder {
                    children: raw.items.unwrap_or_default(),
                }
            }
            other => {
                return Err(format!(
                    "unknown menu type {:?} (expected \"item\" or \"folder\")",
                    other
                ))
            }
        };
        Ok(Self {
            title,
            icon_path: raw.icon_path.filter(|path| !path.is_empty()),
            icon_index: raw.icon_index,
            extended: raw.extended.unwrap_or_default(),
            admin: raw.admin.unwrap_or_default(),
            kind,
        })
    }
}

/// Manifest document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub items: ManifestTree,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and decode the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = std::fs::read_to_string(path).map_err(|source| SyncError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| SyncError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn node_count(&self) -> usize {
        self.items.values().map(ManifestNode::node_count).sum()
    }
}

/// Directory substituted for the manifest folder placeholder.
///
/// Canonicalized without the verbatim `\\?\` prefix so it stays usable inside
/// shell command lines.
pub fn manifest_dir(manifest_path: &Path) -> Result<PathBuf, SyncError> {
    let canonical =
        dunce::canonicalize(manifest_path).map_err(|source| SyncError::ManifestRead {
            path: manifest_path.to_path_buf(),
            source,
        })?;
    Ok(canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(canonical))
}
