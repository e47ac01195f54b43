//! Tree synchronization
//!
//! Tears down and recreates the namespace subtree for every manifest entry.

pub mod eraser;
pub mod installer;

pub use eraser::erase;
pub use installer::{InstallReport, Installer, RemoveReport};

/// Default location of directory-background context menu entries.
pub const DEFAULT_ROOT: &str = r"Software\Classes\Directory\Background\shell";

/// Display title.
pub const TITLE_VALUE: &str = "MUIVerb";
pub const ICON_VALUE: &str = "Icon";
/// Marker: only shown when Shift is held.
pub const EXTENDED_VALUE: &str = "Extended";
/// Marker: shows the elevation shield.
pub const ADMIN_VALUE: &str = "HasLUAShield";
/// Marker: this entry opens a submenu.
pub const SUBMENU_VALUE: &str = "SubCommands";
/// Key holding a folder's children.
pub const CHILDREN_KEY: &str = "shell";
/// Key holding an item's command line as its default value.
pub const COMMAND_KEY: &str = "command";
/// Name of a key's default value.
pub const DEFAULT_VALUE: &str = "";
