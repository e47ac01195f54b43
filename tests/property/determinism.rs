//! Property-based tests for projection and synchronization determinism

use proptest::prelude::*;
use shellmenu::locate::{ElevationHelper, SearchRoots};
use shellmenu::manifest::{ManifestNode, ManifestTree};
use shellmenu::namespace::memory::KeyValues;
use shellmenu::namespace::{MemoryNamespace, NamespacePath};
use shellmenu::projection::{project_command, project_icon, Projection};
use shellmenu::sync::{Installer, DEFAULT_ROOT};
use std::path::PathBuf;

fn no_helper() -> Result<PathBuf, shellmenu::error::SyncError> {
    panic!("helper must not be resolved for non-admin items")
}

fn node_strategy() -> impl Strategy<Value = ManifestNode> {
    let leaf = (
        "[A-Za-z ]{0,8}",
        prop::collection::vec("[a-z%. ]{0,6}", 0..4),
        any::<bool>(),
    )
        .prop_map(|(title, command, extended)| {
            ManifestNode::item(title, command).with_extended(extended)
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            "[A-Za-z ]{0,8}",
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4),
            prop::option::of(("[a-z]{1,6}\\.dll", prop::option::of(0i64..8))),
        )
            .prop_map(|(title, children, icon)| {
                let node = ManifestNode::folder(title, children);
                match icon {
                    Some((path, index)) => node.with_icon(path, index),
                    None => node,
                }
            })
    })
}

fn tree_strategy() -> impl Strategy<Value = ManifestTree> {
    prop::collection::btree_map("[a-z]{1,6}", node_strategy(), 0..5)
}

fn install(ns: &MemoryNamespace, tree: &ManifestTree) {
    Installer::new(
        ns,
        NamespacePath::parse(DEFAULT_ROOT).unwrap(),
        Projection::new(r"C:\menu"),
        ElevationHelper::new("nircmd.exe", SearchRoots::fixed(None, None)),
    )
    .install(tree)
    .unwrap();
}

/// Keys strictly beneath the menu root with their values.
fn entries(ns: &MemoryNamespace) -> Vec<(NamespacePath, KeyValues)> {
    let root = NamespacePath::parse(DEFAULT_ROOT).unwrap();
    ns.snapshot(&root)
        .into_iter()
        .filter(|(path, _)| path != &root)
        .collect()
}

/// Tokens without a space or `%` are emitted verbatim; all others are quoted
#[test]
fn test_command_quoting_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec("[a-z%. ]{1,8}", 1..6), |tokens| {
            let line = project_command(false, &tokens, r"C:\menu", no_helper).unwrap();

            let expected: Vec<String> = tokens
                .iter()
                .map(|token| {
                    if token.contains(' ') || token.contains('%') {
                        format!("\"{}\"", token)
                    } else {
                        token.clone()
                    }
                })
                .collect();
            prop_assert_eq!(line, expected.join(" "));

            Ok(())
        })
        .unwrap();
}

/// Icon references are always quoted, with the index appended only when present
#[test]
fn test_icon_quoting_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &("[A-Za-z0-9 .]{1,12}", prop::option::of(-4i64..16)),
            |(path, index)| {
                let icon = project_icon(Some(&path), index, r"C:\menu");
                let quoted = format!("\"{}\"", path);
                match index {
                    Some(i) => prop_assert_eq!(icon, format!("{},{}", quoted, i)),
                    None => prop_assert_eq!(icon, quoted),
                }

                Ok(())
            },
        )
        .unwrap();
}

/// Installing any tree twice leaves the same namespace contents as installing it once
#[test]
fn test_install_idempotence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&tree_strategy(), |tree| {
            let once = MemoryNamespace::new();
            install(&once, &tree);

            let twice = MemoryNamespace::new();
            install(&twice, &tree);
            install(&twice, &tree);

            prop_assert_eq!(entries(&once), entries(&twice));

            Ok(())
        })
        .unwrap();
}

/// Replacing one tree with another leaves no trace of the first
#[test]
fn test_reinstall_convergence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(tree_strategy(), tree_strategy()), |(first, second)| {
            let root = NamespacePath::parse(DEFAULT_ROOT).unwrap();
            let fresh = MemoryNamespace::new();
            install(&fresh, &second);

            let replaced = MemoryNamespace::new();
            install(&replaced, &first);
            for id in first.keys().filter(|id| !second.contains_key(*id)) {
                let path = root.child(id).unwrap();
                shellmenu::sync::erase(&replaced, &path).unwrap();
            }
            install(&replaced, &second);

            prop_assert_eq!(entries(&fresh), entries(&replaced));

            Ok(())
        })
        .unwrap();
}
