//! Namespace key paths

use crate::error::NamespaceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between key names, as the registry spells it.
pub const SEPARATOR: char = '\\';

/// Ordered sequence of key names addressing one location in the namespace.
///
/// Every segment is non-empty and free of the separator and NUL, so the `Display`
/// form round-trips through [`NamespacePath::parse`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// The empty path: the root of the caller-supplied domain.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `\`-separated path. Leading and trailing separators are ignored.
    pub fn parse(path: &str) -> Result<Self, NamespaceError> {
        let trimmed = path.trim_matches(SEPARATOR);
        let mut parsed = Self::root();
        if trimmed.is_empty() {
            return Ok(parsed);
        }
        for segment in trimmed.split(SEPARATOR) {
            parsed = parsed.child(segment)?;
        }
        Ok(parsed)
    }

    /// Path of the direct child named `segment`.
    pub fn child(&self, segment: &str) -> Result<Self, NamespaceError> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Self { segments })
    }

    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if `self` is `ancestor` or lies beneath it.
    pub fn starts_with(&self, ancestor: &NamespacePath) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    /// True if `self` is a direct child of `parent`.
    pub fn is_child_of(&self, parent: &NamespacePath) -> bool {
        self.depth() == parent.depth() + 1 && self.starts_with(parent)
    }
}

fn validate_segment(segment: &str) -> Result<(), NamespaceError> {
    if segment.is_empty() || segment.contains(SEPARATOR) || segment.contains('\0') {
        return Err(NamespaceError::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Debug for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespacePath({:?})", self.to_string())
    }
}
