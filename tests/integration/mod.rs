//! Integration tests for shellmenu

mod config_integration;
mod sled_backend;
mod test_utils;

pub use test_utils::{fixture, with_isolated_env};
