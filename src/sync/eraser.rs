//! Recursive subtree deletion

use crate::error::{NamespaceError, SyncError};
use crate::namespace::{Namespace, NamespacePath};
use tracing::{instrument, trace};

/// Delete `path` and everything beneath it, children before parents.
///
/// A path that does not exist is a successful no-op. Returns the number of
/// keys removed. The first failure aborts the remaining siblings. The root of
/// the domain is never erased.
#[instrument(level = "trace", skip(namespace), fields(path = %path))]
pub fn erase<N: Namespace>(namespace: &N, path: &NamespacePath) -> Result<usize, SyncError> {
    if path.is_root() {
        return Err(SyncError::namespace(
            "erase",
            path,
            NamespaceError::InvalidSegment(String::new()),
        ));
    }

    let node = match namespace.open(path) {
        Ok(Some(node)) => node,
        Ok(None) => return Ok(0),
        Err(e) if e.is_not_found() => return Ok(0),
        Err(e) => return Err(SyncError::namespace("open", path, e)),
    };
    let children = namespace
        .list_children(&node)
        .map_err(|e| SyncError::namespace("list subkeys of", path, e))?;
    drop(node);

    let mut removed = 0;
    for child in children {
        let child_path = path
            .child(&child)
            .map_err(|e| SyncError::namespace("resolve subkey of", path, e))?;
        removed += erase(namespace, &child_path).map_err(|e| SyncError::EraseChild {
            child: child.clone(),
            parent: path.clone(),
            source: Box::new(e),
        })?;
    }

    match namespace.delete_leaf(path) {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(SyncError::namespace("delete", path, e)),
    }
    trace!(path = %path, "Deleted key");
    Ok(removed + 1)
}
