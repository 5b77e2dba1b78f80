// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! On-disk source trees for integration tests.

#![allow(
    dead_code,
    reason = "each test binary uses a different subset of the tree helpers"
)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a `lib` root and any number of override
/// roots.
///
/// # Example
///
/// ```ignore
/// let tree = SourceTree::new()?;
/// tree.lib("app.lona", "(ns app) (defn f [] 1)")?;
/// tree.overlay("r1", "app.lona", "(ns app) (defn f [] 2)")?;
/// ```
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Create an empty tree with an empty `lib` directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("lib"))?;
        Ok(Self { dir })
    }

    /// The library root.
    #[must_use]
    pub fn lib_path(&self) -> PathBuf {
        self.dir.path().join("lib")
    }

    /// An override root; not created until a file is written into it.
    #[must_use]
    pub fn root_path(&self, root: &str) -> PathBuf {
        self.dir.path().join(root)
    }

    /// Write a unit below the library root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn lib(&self, relative: &str, source: &str) -> io::Result<PathBuf> {
        write(&self.lib_path(), relative, source)
    }

    /// Write a unit below an override root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn overlay(&self, root: &str, relative: &str, source: &str) -> io::Result<PathBuf> {
        write(&self.root_path(root), relative, source)
    }

    /// Create an empty override root directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn empty_root(&self, root: &str) -> io::Result<PathBuf> {
        let path = self.root_path(root);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}

fn write(root: &Path, relative: &str, source: &str) -> io::Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, source)?;
    Ok(path)
}
