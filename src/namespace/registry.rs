//! Windows registry backend

use super::{Namespace, NamespacePath, NamespaceValue};
use crate::error::NamespaceError;
use std::io;
use winreg::enums::{
    RegType, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, KEY_READ,
};
use winreg::{RegKey, RegValue};

/// Root domain the namespace paths are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    CurrentUser,
    LocalMachine,
}

/// Opened registry key together with the path it was opened at
pub struct RegistryNode {
    key: RegKey,
    path: NamespacePath,
}

/// Registry-backed implementation of [`Namespace`]
pub struct RegistryNamespace {
    hive: RegKey,
}

impl RegistryNamespace {
    pub fn new(hive: Hive) -> Self {
        let predef = match hive {
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        };
        Self {
            hive: RegKey::predef(predef),
        }
    }
}

fn io_error(path: &NamespacePath, source: io::Error) -> NamespaceError {
    if source.kind() == io::ErrorKind::NotFound {
        NamespaceError::NotFound(path.clone())
    } else {
        NamespaceError::Io {
            path: path.clone(),
            source,
        }
    }
}

fn expand_string_bytes(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

impl Namespace for RegistryNamespace {
    type Node = RegistryNode;

    fn open(&self, path: &NamespacePath) -> Result<Option<Self::Node>, NamespaceError> {
        match self
            .hive
            .open_subkey_with_flags(path.to_string(), KEY_READ)
        {
            Ok(key) => Ok(Some(RegistryNode {
                key,
                path: path.clone(),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }

    fn open_or_create(&self, path: &NamespacePath) -> Result<Self::Node, NamespaceError> {
        let (key, _) = self
            .hive
            .create_subkey_with_flags(path.to_string(), KEY_ALL_ACCESS)
            .map_err(|e| io_error(path, e))?;
        Ok(RegistryNode {
            key,
            path: path.clone(),
        })
    }

    fn set_value(
        &self,
        node: &Self::Node,
        name: &str,
        value: &NamespaceValue,
    ) -> Result<(), NamespaceError> {
        let result = match value {
            NamespaceValue::Str(s) => node.key.set_value(name, s),
            NamespaceValue::ExpandStr(s) => node.key.set_raw_value(
                name,
                &RegValue {
                    bytes: expand_string_bytes(s),
                    vtype: RegType::REG_EXPAND_SZ,
                },
            ),
        };
        result.map_err(|e| io_error(&node.path, e))
    }

    fn list_children(&self, node: &Self::Node) -> Result<Vec<String>, NamespaceError> {
        node.key
            .enum_keys()
            .collect::<io::Result<Vec<String>>>()
            .map_err(|e| io_error(&node.path, e))
    }

    fn delete_leaf(&self, path: &NamespacePath) -> Result<(), NamespaceError> {
        match self.hive.delete_subkey(path.to_string()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(path, e)),
        }
    }
}
