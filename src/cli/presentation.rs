//! Presentation: command result formatters.

use crate::namespace::memory::KeyValues;
use crate::namespace::NamespacePath;
use crate::sync::{InstallReport, RemoveReport};

pub fn format_install_summary(report: &InstallReport, location: &str) -> String {
    format!(
        "Installed {} menu {} ({} {}, {} {}) under {}",
        report.entries,
        plural(report.entries, "entry", "entries"),
        report.items,
        plural(report.items, "item", "items"),
        report.folders,
        plural(report.folders, "folder", "folders"),
        location
    )
}

pub fn format_remove_summary(report: &RemoveReport, location: &str) -> String {
    if report.entries == 0 {
        return format!("Nothing to remove under {}", location);
    }
    format!(
        "Removed {} menu {} ({} {}) from {}",
        report.entries,
        plural(report.entries, "entry", "entries"),
        report.keys_removed,
        plural(report.keys_removed, "key", "keys"),
        location
    )
}

/// Render the keys a dry run wrote beneath `root`, relative to it.
pub fn format_dry_run(
    keys: &[(NamespacePath, KeyValues)],
    root: &NamespacePath,
    report: &InstallReport,
    location: &str,
) -> String {
    let written: Vec<_> = keys.iter().filter(|(path, _)| path != root).collect();
    let mut lines = vec![format!(
        "Dry run: {} {} would be written under {} ({} {}, {} {})",
        written.len(),
        plural(written.len(), "key", "keys"),
        location,
        report.items,
        plural(report.items, "item", "items"),
        report.folders,
        plural(report.folders, "folder", "folders"),
    )];
    for (path, values) in written {
        let relative = &path.segments()[root.depth()..];
        lines.push(relative.join("\\"));
        for (name, value) in values {
            let name = if name.is_empty() { "(Default)" } else { name.as_str() };
            let kind = if value.is_expandable() {
                "REG_EXPAND_SZ"
            } else {
                "REG_SZ"
            };
            lines.push(format!("  {} {} = {}", name, kind, value.as_str()));
        }
    }
    lines.join("\n")
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
