// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Standard finders and loaders.
//!
//! The path finder maps dotted names onto `.lona` files below the library
//! paths; the native finder serves namespaces built in Rust.

use super::{Finder, LoadError, Loader, NamespaceSpec, Runtime, exec_source};
use crate::namespace::{Namespace, SymbolTable};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// File extension of Lonala source units.
pub const SOURCE_EXTENSION: &str = "lona";

/// File name of a package's own unit.
pub const PACKAGE_INIT: &str = "init.lona";

/// Physical location of a source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLocation {
    path: PathBuf,
    package: bool,
}

impl UnitLocation {
    /// A location at `path`; `package` marks an `init.lona` unit.
    #[must_use]
    pub const fn new(path: PathBuf, package: bool) -> Self {
        Self { path, package }
    }

    /// Source file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the unit is a package.
    #[must_use]
    pub const fn is_package(&self) -> bool {
        self.package
    }

    /// Directory searched for sub-namespaces of a package.
    #[must_use]
    pub fn package_dir(&self) -> Option<&Path> {
        if self.package {
            self.path.parent()
        } else {
            None
        }
    }

    /// The same unit below another root directory.
    ///
    /// The name's segments give the directories (all but the last for a
    /// plain unit), and the file name is kept: `a.b.c` becomes
    /// `<root>/a/b/c.lona`, package `a.b` becomes `<root>/a/b/init.lona`.
    #[must_use]
    pub fn relocate(&self, name: &str, root: &Path) -> Self {
        let mut parts: Vec<&str> = name.split('.').collect();
        if !self.package {
            parts.pop();
        }
        let mut path = root.to_path_buf();
        path.extend(parts);
        if let Some(file) = self.path.file_name() {
            path.push(file);
        }
        Self::new(path, self.package)
    }
}

/// Finds source units on disk.
#[derive(Debug, Default)]
pub struct PathFinder;

impl PathFinder {
    /// Locate the unit for `name`.
    ///
    /// With a search path only the last name segment is looked up in it;
    /// otherwise the whole dotted name is mapped below each library path.
    /// A package directory wins over a plain file of the same name.
    #[must_use]
    pub fn locate(
        name: &str,
        search: Option<&[PathBuf]>,
        lib_paths: &[PathBuf],
    ) -> Option<UnitLocation> {
        let (dirs, relative): (&[PathBuf], PathBuf) = match search {
            Some(dirs) => (dirs, PathBuf::from(name.rsplit('.').next().unwrap_or(name))),
            None => (lib_paths, name.split('.').collect()),
        };
        for dir in dirs {
            let base = dir.join(&relative);
            let init = base.join(PACKAGE_INIT);
            if init.is_file() {
                return Some(UnitLocation::new(init, true));
            }
            let file = base.with_extension(SOURCE_EXTENSION);
            if file.is_file() {
                return Some(UnitLocation::new(file, false));
            }
        }
        None
    }
}

impl Finder for PathFinder {
    fn name(&self) -> &str {
        "path"
    }

    fn find_spec(&self, name: &str, search: Option<&[PathBuf]>, rt: &Runtime) -> Option<NamespaceSpec> {
        let location = Self::locate(name, search, rt.lib_paths())?;
        Some(NamespaceSpec {
            name: name.to_owned(),
            loader: Rc::new(SourceLoader),
            location: Some(location),
        })
    }
}

/// Executes a single source unit into a fresh namespace.
#[derive(Debug, Default)]
pub struct SourceLoader;

impl Loader for SourceLoader {
    fn create(&self, spec: &NamespaceSpec, _rt: &Runtime) -> Result<Rc<Namespace>, LoadError> {
        Ok(Namespace::new(&spec.name, spec.location.clone(), "source"))
    }

    fn exec(&self, ns: &Rc<Namespace>, rt: &Runtime) -> Result<(), LoadError> {
        exec_source(rt, ns)
    }
}

/// Serves namespaces defined in Rust through [`Runtime::define_native`].
#[derive(Debug, Default)]
pub struct NativeFinder {
    units: RefCell<BTreeMap<String, Rc<SymbolTable>>>,
}

impl NativeFinder {
    pub(crate) fn define(&self, name: &str, symbols: SymbolTable) {
        self.units
            .borrow_mut()
            .insert(name.to_owned(), Rc::new(symbols));
    }
}

impl Finder for NativeFinder {
    fn name(&self) -> &str {
        "native"
    }

    fn find_spec(&self, name: &str, _search: Option<&[PathBuf]>, _rt: &Runtime) -> Option<NamespaceSpec> {
        let symbols = Rc::clone(self.units.borrow().get(name)?);
        Some(NamespaceSpec {
            name: name.to_owned(),
            loader: Rc::new(NativeLoader { symbols }),
            location: None,
        })
    }
}

struct NativeLoader {
    symbols: Rc<SymbolTable>,
}

impl Loader for NativeLoader {
    fn create(&self, spec: &NamespaceSpec, _rt: &Runtime) -> Result<Rc<Namespace>, LoadError> {
        Ok(Namespace::new(&spec.name, None, "native"))
    }

    fn exec(&self, ns: &Rc<Namespace>, _rt: &Runtime) -> Result<(), LoadError> {
        for (name, value) in self.symbols.iter() {
            ns.define(name, value.clone());
        }
        Ok(())
    }
}
