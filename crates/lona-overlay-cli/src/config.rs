// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Configuration file.
//!
//! ```toml
//! lib_paths = ["lib"]
//! overlay_roots = ["site", "local"]
//! log = "lona_overlay=debug"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use anyhow::Context as _;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from a TOML file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Library search paths, searched in order.
    #[serde(default)]
    pub lib_paths: Vec<PathBuf>,
    /// Override roots, registered in order.
    #[serde(default)]
    pub overlay_roots: Vec<PathBuf>,
    /// Log filter directive, used when `RUST_LOG` is unset.
    pub log: Option<String>,
}

impl Config {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&text, base).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse configuration text, resolving relative paths against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        for path in config
            .lib_paths
            .iter_mut()
            .chain(config.overlay_roots.iter_mut())
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        Ok(config)
    }
}
