//! Installing into the sled-backed namespace

use crate::integration::fixture::{self, item, tree};
use shellmenu::locate::{ElevationHelper, SearchRoots};
use shellmenu::manifest::ManifestTree;
use shellmenu::namespace::{NamespacePath, NamespaceValue, SledNamespace};
use shellmenu::projection::Projection;
use shellmenu::sync::{Installer, COMMAND_KEY, DEFAULT_ROOT, DEFAULT_VALUE, TITLE_VALUE};
use tempfile::TempDir;

fn root() -> NamespacePath {
    NamespacePath::parse(DEFAULT_ROOT).unwrap()
}

fn install(ns: &SledNamespace, manifest: &ManifestTree) {
    Installer::new(
        ns,
        root(),
        Projection::new("/opt/menu"),
        ElevationHelper::new("nircmd.exe", SearchRoots::fixed(None, None)),
    )
    .install(manifest)
    .unwrap();
}

#[test]
fn test_install_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("namespace");
    {
        let ns = SledNamespace::new(&store).unwrap();
        install(&ns, &fixture::sample_tree());
        ns.flush().unwrap();
    }

    let ns = SledNamespace::new(&store).unwrap();
    let notes = root().child("notes").unwrap();
    let values = ns.values(&notes).unwrap().unwrap();
    assert_eq!(
        values.get(TITLE_VALUE),
        Some(&NamespaceValue::Str("Notes".into()))
    );
    let command = ns
        .values(&notes.child(COMMAND_KEY).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(
        command.get(DEFAULT_VALUE),
        Some(&NamespaceValue::ExpandStr("notepad.exe".into()))
    );
}

#[test]
fn test_reinstall_with_changed_manifest_leaves_no_residue() {
    let temp_dir = TempDir::new().unwrap();
    let ns = SledNamespace::new(temp_dir.path().join("namespace")).unwrap();
    install(&ns, &fixture::sample_tree());

    let dev = root().child("dev").unwrap();
    let before = ns.descendants(&dev).unwrap();
    assert!(before.len() > 4);

    install(
        &ns,
        &tree(vec![
            ("dev", item("Developer", &["code.exe", "."])),
            ("notes", item("Notes", &["notepad.exe"])),
        ]),
    );

    assert_eq!(
        ns.descendants(&dev).unwrap(),
        vec![dev.clone(), dev.child(COMMAND_KEY).unwrap()]
    );
    let values = ns.values(&dev).unwrap().unwrap();
    assert_eq!(values.len(), 1);
}

#[test]
fn test_install_matches_memory_backend() {
    use shellmenu::namespace::MemoryNamespace;

    let temp_dir = TempDir::new().unwrap();
    let sled_ns = SledNamespace::new(temp_dir.path().join("namespace")).unwrap();
    let memory_ns = MemoryNamespace::new();
    install(&sled_ns, &fixture::sample_tree());
    Installer::new(
        &memory_ns,
        root(),
        Projection::new("/opt/menu"),
        ElevationHelper::new("nircmd.exe", SearchRoots::fixed(None, None)),
    )
    .install(&fixture::sample_tree())
    .unwrap();

    let from_memory: Vec<_> = memory_ns
        .snapshot(&root())
        .into_iter()
        .filter(|(path, _)| path != &root())
        .collect();
    let mut from_sled = Vec::new();
    for path in sled_ns.descendants(&root()).unwrap() {
        if path == root() {
            continue;
        }
        let values = sled_ns.values(&path).unwrap().unwrap();
        from_sled.push((path, values));
    }
    assert_eq!(from_sled, from_memory);
}

#[test]
fn test_remove_clears_store() {
    let temp_dir = TempDir::new().unwrap();
    let ns = SledNamespace::new(temp_dir.path().join("namespace")).unwrap();
    let manifest = fixture::sample_tree();
    let installer = Installer::new(
        &ns,
        root(),
        Projection::new("/opt/menu"),
        ElevationHelper::new("nircmd.exe", SearchRoots::fixed(None, None)),
    );
    installer.install(&manifest).unwrap();
    let report = installer.remove(&manifest).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(ns.descendants(&root()).unwrap(), vec![root()]);
}
