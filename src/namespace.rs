//! Namespace Adapter
//!
//! Thin contract over a hierarchical key-value store (the registry, or an
//! emulation of it). Every call mutates persistent state immediately; there is
//! no batching or transaction.

pub mod memory;
pub mod path;
pub mod persistence;
#[cfg(windows)]
pub mod registry;

pub use memory::MemoryNamespace;
pub use path::NamespacePath;
pub use persistence::SledNamespace;
#[cfg(windows)]
pub use registry::{Hive, RegistryNamespace};

use crate::error::NamespaceError;
use serde::{Deserialize, Serialize};

/// A named scalar value stored on a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespaceValue {
    /// Plain string (`REG_SZ`)
    Str(String),
    /// String whose `%VAR%` tokens are expanded by the store's readers (`REG_EXPAND_SZ`)
    ExpandStr(String),
}

impl NamespaceValue {
    pub fn as_str(&self) -> &str {
        match self {
            NamespaceValue::Str(s) | NamespaceValue::ExpandStr(s) => s,
        }
    }

    pub fn is_expandable(&self) -> bool {
        matches!(self, NamespaceValue::ExpandStr(_))
    }
}

/// Hierarchical key-value store interface
///
/// Paths are relative to a root domain fixed when the backend is constructed
/// (e.g. the current user's hive).
pub trait Namespace {
    /// Handle to an opened key
    type Node;

    /// Open an existing key. Returns `None` if it does not exist.
    fn open(&self, path: &NamespacePath) -> Result<Option<Self::Node>, NamespaceError>;

    /// Open a key, creating every missing segment of `path`.
    fn open_or_create(&self, path: &NamespacePath) -> Result<Self::Node, NamespaceError>;

    /// Set (or overwrite) a named value. The empty name is the key's default value.
    fn set_value(
        &self,
        node: &Self::Node,
        name: &str,
        value: &NamespaceValue,
    ) -> Result<(), NamespaceError>;

    /// Names of the direct subkeys of `node`.
    fn list_children(&self, node: &Self::Node) -> Result<Vec<String>, NamespaceError>;

    /// Delete a key that has no subkeys. A missing key is not an error.
    fn delete_leaf(&self, path: &NamespacePath) -> Result<(), NamespaceError>;
}
