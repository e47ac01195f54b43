//! shellmenu: Declarative Context Menus
//!
//! Reads a declarative menu tree from `manifest.json` and synchronizes it into the
//! registry (or a file-backed emulation of it), erasing and recreating every entry
//! so no state from a previous manifest survives.

pub mod cli;
pub mod config;
pub mod error;
pub mod locate;
pub mod logging;
pub mod manifest;
pub mod namespace;
pub mod projection;
pub mod sync;
