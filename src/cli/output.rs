//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::SyncError;

/// Map domain errors to a string for CLI output.
/// The message already carries the full breadcrumb chain.
pub fn map_error(e: &SyncError) -> String {
    format!("Error: {}", e)
}
