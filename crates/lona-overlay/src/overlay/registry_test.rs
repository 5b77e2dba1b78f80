// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for root registration and finder installation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{INTERCEPT_PRIORITY, NamespaceRegistry};
use crate::runtime::Runtime;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use tempfile::TempDir;

fn root_with(entries: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for entry in entries {
        if let Some(name) = entry.strip_suffix('/') {
            fs::create_dir(dir.path().join(name)).unwrap();
        } else {
            fs::write(dir.path().join(entry), "").unwrap();
        }
    }
    dir
}

#[test]
fn register_indexes_immediate_entries() {
    let root = root_with(&["app/", "config.lona", "notes.txt"]);
    let registry = NamespaceRegistry::new();
    registry.register_root(root.path());

    assert_eq!(registry.roots(), vec![root.path().to_path_buf()]);
    let expected: BTreeSet<String> = ["app", "config", "notes"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(registry.known_names(), expected);
}

#[test]
fn register_twice_is_a_no_op() {
    let root = root_with(&["a.lona"]);
    let registry = NamespaceRegistry::new();
    registry.register_root(root.path());
    let roots = registry.roots();
    let known = registry.known_names();

    fs::write(root.path().join("b.lona"), "").unwrap();
    registry.register_root(root.path());

    assert_eq!(registry.roots(), roots);
    assert_eq!(registry.known_names(), known);
}

#[test]
fn non_directories_are_ignored() {
    let root = root_with(&["file.lona"]);
    let registry = NamespaceRegistry::new();
    registry.register_root(root.path().join("file.lona"));
    registry.register_root(root.path().join("missing"));
    assert!(registry.roots().is_empty());
    assert!(registry.known_names().is_empty());
}

#[test]
fn roots_keep_registration_order() {
    let first = root_with(&[]);
    let second = root_with(&[]);
    let registry = NamespaceRegistry::new();
    registry.register_root(second.path());
    registry.register_root(first.path());
    assert_eq!(
        registry.roots(),
        vec![second.path().to_path_buf(), first.path().to_path_buf()]
    );
}

#[test]
fn install_inserts_after_native_finder() {
    let rt = Runtime::new(Vec::new());
    let registry = NamespaceRegistry::new();
    registry.install(&rt);
    assert_eq!(rt.finder_names()[INTERCEPT_PRIORITY], "override");
    assert_eq!(rt.finder_names(), vec!["native", "override", "path"]);
    assert!(rt.has_resolver());
}

#[test]
fn install_twice_is_a_no_op() {
    let rt = Runtime::new(Vec::new());
    let registry = NamespaceRegistry::new();
    registry.install(&rt);
    registry.install(&rt);
    assert_eq!(rt.finder_names(), vec!["native", "override", "path"]);
}

#[test]
fn uninstall_removes_finder_and_resolver() {
    let rt = Runtime::new(Vec::new());
    let registry = NamespaceRegistry::new();
    registry.install(&rt);
    registry.uninstall(&rt);
    assert_eq!(rt.finder_names(), vec!["native", "path"]);
    assert!(!rt.has_resolver());
}

proptest! {
    #[test]
    fn registration_is_idempotent(names in prop::collection::btree_set("[a-z]{1,8}", 0..6), repeats in 1usize..4) {
        let root = TempDir::new().unwrap();
        for name in &names {
            fs::write(root.path().join(format!("{name}.lona")), "").unwrap();
        }
        let registry = NamespaceRegistry::new();
        for _ in 0..repeats {
            registry.register_root(root.path());
        }
        prop_assert_eq!(registry.roots(), vec![root.path().to_path_buf()]);
        prop_assert_eq!(registry.known_names(), names);
    }

    #[test]
    fn missing_paths_never_register(name in "[a-z]{1,12}") {
        let base = TempDir::new().unwrap();
        let registry = NamespaceRegistry::new();
        registry.register_root(base.path().join(&name).join("absent"));
        prop_assert!(registry.roots().is_empty());
    }
}
