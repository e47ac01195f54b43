//! Attribute projection
//!
//! Pure functions turning manifest attributes into the strings written to the
//! namespace. Icon paths are always quoted (they sit inside a comma-delimited
//! resource reference); command tokens are quoted only when they contain a
//! space or `%`. Embedded double quotes are not escaped.

use crate::error::SyncError;
use std::path::PathBuf;

/// Token replaced by the directory containing the manifest.
pub const MANIFEST_FOLDER_PLACEHOLDER: &str = "${manifestFolder}";

/// Directive passed to the elevation helper before the wrapped command.
pub const ELEVATE_DIRECTIVE: &str = "elevate";

/// Substitutions applied to manifest strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Placeholder token to substitute
    pub placeholder: String,
    /// Directory that replaces the placeholder
    pub base_dir: String,
    /// Elevation directive following the helper path
    pub elevate_directive: String,
}

impl Projection {
    pub fn new(base_dir: impl Into<String>) -> Self {
        Self {
            placeholder: MANIFEST_FOLDER_PLACEHOLDER.to_string(),
            base_dir: base_dir.into(),
            elevate_directive: ELEVATE_DIRECTIVE.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_elevate_directive(mut self, directive: impl Into<String>) -> Self {
        self.elevate_directive = directive.into();
        self
    }

    fn substitute(&self, value: &str) -> String {
        if self.placeholder.is_empty() {
            return value.to_string();
        }
        value.replace(&self.placeholder, &self.base_dir)
    }

    /// Icon resource reference, or the empty string when no icon is configured.
    pub fn icon(&self, icon_path: Option<&str>, icon_index: Option<i64>) -> String {
        let icon_path = match icon_path {
            Some(path) if !path.is_empty() => path,
            _ => return String::new(),
        };
        let quoted = quote(&self.substitute(icon_path));
        match icon_index {
            Some(index) => format!("{},{}", quoted, index),
            None => quoted,
        }
    }

    /// Full command line for an item.
    ///
    /// `helper` is only invoked when `admin` is set; its failure aborts the
    /// projection rather than silently producing a non-elevated command.
    pub fn command<F>(&self, admin: bool, tokens: &[String], helper: F) -> Result<String, SyncError>
    where
        F: FnOnce() -> Result<PathBuf, SyncError>,
    {
        let mut parts = Vec::with_capacity(tokens.len() + 2);
        if admin {
            let helper_path = helper()?;
            parts.push(quote(&helper_path.to_string_lossy()));
            parts.push(self.elevate_directive.clone());
        }
        for token in tokens {
            let token = self.substitute(token);
            if needs_quoting(&token) {
                parts.push(quote(&token));
            } else {
                parts.push(token);
            }
        }
        Ok(parts.join(" "))
    }
}

/// Icon reference for `icon_path`/`icon_index` with `base_dir` substituted.
pub fn project_icon(icon_path: Option<&str>, icon_index: Option<i64>, base_dir: &str) -> String {
    Projection::new(base_dir).icon(icon_path, icon_index)
}

/// Command line for `tokens`, prefixed by the elevation helper when `admin` is set.
pub fn project_command<F>(
    admin: bool,
    tokens: &[String],
    base_dir: &str,
    helper: F,
) -> Result<String, SyncError>
where
    F: FnOnce() -> Result<PathBuf, SyncError>,
{
    Projection::new(base_dir).command(admin, tokens, helper)
}

fn needs_quoting(token: &str) -> bool {
    token.contains(' ') || token.contains('%')
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}
