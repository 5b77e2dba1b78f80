// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{Cli, run};
use crate::config::Config;
use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, source: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("lib/app.lona"),
            "(ns app) (defn greet [] \"hello\") (def level 1)",
        );
        write(
            &dir.path().join("site/app.lona"),
            "(ns app) (defn greet [] (str ((parent greet)) \"!\"))",
        );
        Self { dir }
    }

    fn config(&self) -> Config {
        Config {
            lib_paths: vec![self.dir.path().join("lib")],
            overlay_roots: vec![self.dir.path().join("site")],
            log: None,
        }
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(&cli, &self.config(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }
}

#[test]
fn prints_symbols_with_override_source() {
    let project = Project::new();
    let output = project.run(&["lona-overlay", "app"]).unwrap();
    let site = project.dir.path().join("site/app.lona");
    assert!(output.contains(&format!("greet = #<fn app/greet>  ; {}", site.display())));
    assert!(output.contains("level = 1\n"));
    assert!(!output.contains("*ns*"));
}

#[test]
fn evaluates_expression() {
    let project = Project::new();
    let output = project
        .run(&["lona-overlay", "app", "--eval", "(greet)"])
        .unwrap();
    assert_eq!(output, "\"hello!\"\n");
}

#[test]
fn prints_chain() {
    let project = Project::new();
    let output = project
        .run(&["lona-overlay", "app", "-e", "level", "--chain"])
        .unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "1");
    assert!(lines[1].starts_with("0: base "));
    assert!(lines[2].starts_with("1: override "));
}

#[test]
fn load_failure_is_an_error() {
    let project = Project::new();
    let err = project.run(&["lona-overlay", "missing"]).unwrap_err();
    assert!(err.to_string().contains("failed to load missing"));
}

#[test]
fn command_line_paths_follow_config_paths() {
    let cli = Cli::try_parse_from(["lona-overlay", "app", "-L", "a:b", "-O", "r1", "-O", "r2"])
        .unwrap();
    let config = cli.settings().unwrap();
    assert_eq!(config.lib_paths.len(), 2);
    assert_eq!(config.overlay_roots.len(), 2);
    assert_eq!(cli.verbose, 0);
}
