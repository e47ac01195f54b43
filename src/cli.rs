//! CLI domain: parse, route, output, and presentation only.
//! No synchronization logic; the route table dispatches to the installer.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_dry_run, format_install_summary, format_remove_summary};
pub use route::RunContext;
