//! Sled-backed namespace
//!
//! File-backed emulation of the registry for hosts without one. Keys and values
//! live in a single sled tree:
//!
//! - `k:<path>` marks that a key exists
//! - `v:<path>\0<name>` holds a bincode-encoded [`NamespaceValue`]

use super::path::SEPARATOR;
use super::{Namespace, NamespacePath, NamespaceValue};
use crate::error::NamespaceError;
use std::collections::BTreeMap;
use std::path::Path;

const KEY_PREFIX: &str = "k:";
const VALUE_PREFIX: &str = "v:";

/// Sled-based implementation of [`Namespace`]
pub struct SledNamespace {
    db: sled::Db,
}

impl SledNamespace {
    /// Open (or create) a namespace store at the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, NamespaceError> {
        let db = sled::open(path.as_ref()).map_err(|e| NamespaceError::Storage {
            path: NamespacePath::root(),
            message: format!("failed to open sled database {:?}: {}", path.as_ref(), e),
        })?;
        Ok(Self { db })
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), NamespaceError> {
        self.db
            .flush()
            .map(|_| ())
            .map_err(|e| storage_error(&NamespacePath::root(), "flush", e))
    }

    pub fn exists(&self, path: &NamespacePath) -> Result<bool, NamespaceError> {
        if path.is_root() {
            return Ok(true);
        }
        self.db
            .contains_key(key_entry(path))
            .map_err(|e| storage_error(path, "read key", e))
    }

    /// All values on a key, or `None` if the key does not exist.
    pub fn values(
        &self,
        path: &NamespacePath,
    ) -> Result<Option<BTreeMap<String, NamespaceValue>>, NamespaceError> {
        if !self.exists(path)? {
            return Ok(None);
        }
        let prefix = value_prefix(path);
        let mut values = BTreeMap::new();
        for entry in self.db.scan_prefix(&prefix) {
            let (key, raw) = entry.map_err(|e| storage_error(path, "read values", e))?;
            let name = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            let value: NamespaceValue = bincode::deserialize(&raw).map_err(|e| {
                storage_error(path, &format!("decode value {:?}", name), e)
            })?;
            values.insert(name, value);
        }
        Ok(Some(values))
    }

    /// Every key at or beneath `path`, sorted.
    pub fn descendants(&self, path: &NamespacePath) -> Result<Vec<NamespacePath>, NamespaceError> {
        let mut found = Vec::new();
        if self.exists(path)? {
            found.push(path.clone());
        }
        for entry in self.db.scan_prefix(child_prefix(path)) {
            let (key, _) = entry.map_err(|e| storage_error(path, "list keys", e))?;
            let raw = String::from_utf8_lossy(&key[KEY_PREFIX.len()..]).into_owned();
            found.push(NamespacePath::parse(&raw)?);
        }
        found.sort();
        Ok(found)
    }
}

fn path_string(path: &NamespacePath) -> String {
    path.to_string()
}

fn key_entry(path: &NamespacePath) -> Vec<u8> {
    format!("{}{}", KEY_PREFIX, path_string(path)).into_bytes()
}

/// Prefix shared by every key strictly beneath `path`.
fn child_prefix(path: &NamespacePath) -> Vec<u8> {
    if path.is_root() {
        KEY_PREFIX.as_bytes().to_vec()
    } else {
        format!("{}{}{}", KEY_PREFIX, path_string(path), SEPARATOR).into_bytes()
    }
}

fn value_prefix(path: &NamespacePath) -> Vec<u8> {
    format!("{}{}\0", VALUE_PREFIX, path_string(path)).into_bytes()
}

fn storage_error(
    path: &NamespacePath,
    action: &str,
    err: impl std::fmt::Display,
) -> NamespaceError {
    NamespaceError::Storage {
        path: path.clone(),
        message: format!("failed to {}: {}", action, err),
    }
}

impl Namespace for SledNamespace {
    type Node = NamespacePath;

    fn open(&self, path: &NamespacePath) -> Result<Option<Self::Node>, NamespaceError> {
        Ok(self.exists(path)?.then(|| path.clone()))
    }

    fn open_or_create(&self, path: &NamespacePath) -> Result<Self::Node, NamespaceError> {
        let mut current = NamespacePath::root();
        for segment in path.segments() {
            current = current.child(segment)?;
            self.db
                .insert(key_entry(&current), &[] as &[u8])
                .map_err(|e| storage_error(&current, "create key", e))?;
        }
        Ok(path.clone())
    }

    fn set_value(
        &self,
        node: &Self::Node,
        name: &str,
        value: &NamespaceValue,
    ) -> Result<(), NamespaceError> {
        if !self.exists(node)? {
            return Err(NamespaceError::NotFound(node.clone()));
        }
        let encoded =
            bincode::serialize(value).map_err(|e| storage_error(node, "encode value", e))?;
        let mut key = value_prefix(node);
        key.extend_from_slice(name.as_bytes());
        self.db
            .insert(key, encoded)
            .map_err(|e| storage_error(node, &format!("set value {:?}", name), e))?;
        Ok(())
    }

    fn list_children(&self, node: &Self::Node) -> Result<Vec<String>, NamespaceError> {
        if !self.exists(node)? {
            return Err(NamespaceError::NotFound(node.clone()));
        }
        let prefix = child_prefix(node);
        let mut children = Vec::new();
        for entry in self.db.scan_prefix(&prefix) {
            let (key, _) = entry.map_err(|e| storage_error(node, "list keys", e))?;
            let rest = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
            if !rest.contains(SEPARATOR) {
                children.push(rest);
            }
        }
        Ok(children)
    }

    fn delete_leaf(&self, path: &NamespacePath) -> Result<(), NamespaceError> {
        if path.is_root() || !self.exists(path)? {
            return Ok(());
        }
        if let Some(entry) = self.db.scan_prefix(child_prefix(path)).next() {
            entry.map_err(|e| storage_error(path, "list keys", e))?;
            return Err(NamespaceError::NotEmpty(path.clone()));
        }
        for entry in self.db.scan_prefix(value_prefix(path)) {
            let (key, _) = entry.map_err(|e| storage_error(path, "read values", e))?;
            self.db
                .remove(key)
                .map_err(|e| storage_error(path, "delete value", e))?;
        }
        self.db
            .remove(key_entry(path))
            .map_err(|e| storage_error(path, "delete key", e))?;
        Ok(())
    }
}
