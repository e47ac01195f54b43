//! In-process namespace used for dry runs and tests

use super::{Namespace, NamespacePath, NamespaceValue};
use crate::error::NamespaceError;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Values held by one key, keyed by value name
pub type KeyValues = BTreeMap<String, NamespaceValue>;

/// One mutation applied to a [`MemoryNamespace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create(NamespacePath),
    SetValue(NamespacePath, String),
    Delete(NamespacePath),
}

#[derive(Debug, Default)]
struct State {
    keys: BTreeMap<NamespacePath, KeyValues>,
    denied: BTreeSet<NamespacePath>,
    log: Vec<Operation>,
}

impl State {
    fn exists(&self, path: &NamespacePath) -> bool {
        path.is_root() || self.keys.contains_key(path)
    }

    /// Keys at or beneath `path`, in sorted order.
    fn subtree<'a>(
        &'a self,
        path: &'a NamespacePath,
    ) -> impl Iterator<Item = (&'a NamespacePath, &'a KeyValues)> + 'a {
        self.keys
            .range(path.clone()..)
            .take_while(move |(key, _)| key.starts_with(path))
    }
}

/// Namespace kept entirely in memory
///
/// Single-threaded like the installer itself. Creation can be denied at chosen
/// paths to simulate a store rejecting a write.
#[derive(Debug, Default)]
pub struct MemoryNamespace {
    state: RefCell<State>,
}

impl MemoryNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make creating or deleting `path` fail with [`NamespaceError::Denied`].
    pub fn deny(&self, path: NamespacePath) {
        self.state.borrow_mut().denied.insert(path);
    }

    pub fn exists(&self, path: &NamespacePath) -> bool {
        self.state.borrow().exists(path)
    }

    pub fn value(&self, path: &NamespacePath, name: &str) -> Option<NamespaceValue> {
        self.state
            .borrow()
            .keys
            .get(path)
            .and_then(|values| values.get(name).cloned())
    }

    pub fn values(&self, path: &NamespacePath) -> Option<KeyValues> {
        self.state.borrow().keys.get(path).cloned()
    }

    /// Every key at or beneath `path` with its values, sorted by path.
    pub fn snapshot(&self, path: &NamespacePath) -> Vec<(NamespacePath, KeyValues)> {
        let state = self.state.borrow();
        state
            .subtree(path)
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect()
    }

    /// Mutations applied so far, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().log.clone()
    }

    pub fn clear_operations(&self) {
        self.state.borrow_mut().log.clear();
    }
}

impl Namespace for MemoryNamespace {
    type Node = NamespacePath;

    fn open(&self, path: &NamespacePath) -> Result<Option<Self::Node>, NamespaceError> {
        Ok(self.exists(path).then(|| path.clone()))
    }

    fn open_or_create(&self, path: &NamespacePath) -> Result<Self::Node, NamespaceError> {
        let mut state = self.state.borrow_mut();
        let mut current = NamespacePath::root();
        for segment in path.segments() {
            current = current.child(segment)?;
            if state.exists(&current) {
                continue;
            }
            if state.denied.contains(&current) {
                return Err(NamespaceError::Denied(current));
            }
            state.keys.insert(current.clone(), KeyValues::new());
        }
        state.log.push(Operation::Create(path.clone()));
        Ok(path.clone())
    }

    fn set_value(
        &self,
        node: &Self::Node,
        name: &str,
        value: &NamespaceValue,
    ) -> Result<(), NamespaceError> {
        let mut state = self.state.borrow_mut();
        let values = state
            .keys
            .get_mut(node)
            .ok_or_else(|| NamespaceError::NotFound(node.clone()))?;
        values.insert(name.to_string(), value.clone());
        state.log.push(Operation::SetValue(node.clone(), name.to_string()));
        Ok(())
    }

    fn list_children(&self, node: &Self::Node) -> Result<Vec<String>, NamespaceError> {
        let state = self.state.borrow();
        if !state.exists(node) {
            return Err(NamespaceError::NotFound(node.clone()));
        }
        Ok(state
            .subtree(node)
            .filter(|(key, _)| key.is_child_of(node))
            .filter_map(|(key, _)| key.name().map(str::to_string))
            .collect())
    }

    fn delete_leaf(&self, path: &NamespacePath) -> Result<(), NamespaceError> {
        let mut state = self.state.borrow_mut();
        if path.is_root() || !state.keys.contains_key(path) {
            return Ok(());
        }
        if state.subtree(path).any(|(key, _)| key != path) {
            return Err(NamespaceError::NotEmpty(path.clone()));
        }
        if state.denied.contains(path) {
            return Err(NamespaceError::Denied(path.clone()));
        }
        state.keys.remove(path);
        state.log.push(Operation::Delete(path.clone()));
        Ok(())
    }
}
