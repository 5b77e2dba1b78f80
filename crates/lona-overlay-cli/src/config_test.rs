// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn empty_config_is_default() {
    assert_eq!(Config::parse("", Path::new("/etc")).unwrap(), Config::default());
}

#[test]
fn relative_paths_resolve_against_base() {
    let config = Config::parse(
        r#"
        lib_paths = ["lib", "/abs/lib"]
        overlay_roots = ["site"]
        log = "debug"
        "#,
        Path::new("/project"),
    )
    .unwrap();
    assert_eq!(
        config.lib_paths,
        vec![PathBuf::from("/project/lib"), PathBuf::from("/abs/lib")]
    );
    assert_eq!(config.overlay_roots, vec![PathBuf::from("/project/site")]);
    assert_eq!(config.log.as_deref(), Some("debug"));
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(Config::parse("libs = []", Path::new("/")).is_err());
}

#[test]
fn load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lona.toml");
    fs::write(&path, "overlay_roots = [\"r1\"]").unwrap();
    let config = Config::load(&path).unwrap();
    assert_eq!(config.overlay_roots, vec![dir.path().join("r1")]);
}

#[test]
fn load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config"));
}
