// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Registered override roots and the namespaces they cover.

use super::{AttributeNotFound, OverrideFinder, RegisteredNamespace};
use crate::namespace::LayerHandle;
use crate::runtime::{Finder, Resolver, Runtime};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Position of the override finder in a runtime's finder list: after the
/// native finder, before the path finder.
pub const INTERCEPT_PRIORITY: usize = 1;

/// Override roots, the top-level names they may override, and the chains
/// built so far.
///
/// Create one with [`NamespaceRegistry::new`], register roots, then
/// [`install`](Self::install) it into a runtime.
#[derive(Debug)]
pub struct NamespaceRegistry {
    roots: RefCell<Vec<PathBuf>>,
    known: RefCell<BTreeSet<String>>,
    namespaces: RefCell<BTreeMap<String, Rc<RegisteredNamespace>>>,
    pub(super) finder: Rc<OverrideFinder>,
}

impl NamespaceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|registry| Self {
            roots: RefCell::new(Vec::new()),
            known: RefCell::new(BTreeSet::new()),
            namespaces: RefCell::new(BTreeMap::new()),
            finder: Rc::new(OverrideFinder::new(registry.clone())),
        })
    }

    /// Register an override root.
    ///
    /// Paths already registered and paths that are not directories are
    /// ignored. The names of the root's immediate entries, extension
    /// stripped, become overridable.
    pub fn register_root(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if self.roots.borrow().iter().any(|root| root == path) {
            tracing::debug!(root = %path.display(), "override root already registered");
            return;
        }
        if !path.is_dir() {
            tracing::debug!(root = %path.display(), "override root is not a directory, ignored");
            return;
        }
        self.roots.borrow_mut().push(path.to_path_buf());
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(root = %path.display(), error = %err, "cannot list override root");
                return;
            }
        };
        let mut known = self.known.borrow_mut();
        for entry in entries.flatten() {
            let entry = entry.path();
            if let Some(stem) = entry.file_stem() {
                known.insert(stem.to_string_lossy().into_owned());
            }
        }
        tracing::debug!(root = %path.display(), known = known.len(), "registered override root");
    }

    /// Registered roots, in registration order.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.borrow().clone()
    }

    /// Top-level names that may have overrides.
    #[must_use]
    pub fn known_names(&self) -> BTreeSet<String> {
        self.known.borrow().clone()
    }

    pub(crate) fn is_known(&self, name: &str) -> bool {
        self.known.borrow().contains(name)
    }

    /// The chain of a namespace loaded through this registry.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<Rc<RegisteredNamespace>> {
        self.namespaces.borrow().get(name).cloned()
    }

    /// Names of all namespaces loaded through this registry.
    #[must_use]
    pub fn namespace_names(&self) -> Vec<String> {
        self.namespaces.borrow().keys().cloned().collect()
    }

    pub(crate) fn get_or_register(
        &self,
        name: &str,
        search_path: Option<&[PathBuf]>,
    ) -> Rc<RegisteredNamespace> {
        let mut namespaces = self.namespaces.borrow_mut();
        let registered = namespaces.entry(name.to_owned()).or_insert_with(|| {
            Rc::new(RegisteredNamespace::new(
                name.to_owned(),
                search_path.map(<[PathBuf]>::to_vec),
            ))
        });
        Rc::clone(registered)
    }

    fn finder(&self) -> Rc<dyn Finder> {
        Rc::clone(&self.finder) as Rc<dyn Finder>
    }

    /// Insert the override finder into `rt` and make this registry its
    /// resolver. Installing twice into the same runtime does nothing.
    pub fn install(self: &Rc<Self>, rt: &Runtime) {
        let finder = self.finder();
        if rt.has_finder(&finder) {
            tracing::debug!("override finder already installed");
            return;
        }
        rt.insert_finder(INTERCEPT_PRIORITY, finder);
        rt.set_resolver(Some(Rc::clone(self) as Rc<dyn Resolver>));
        tracing::debug!(finders = ?rt.finder_names(), "installed override finder");
    }

    /// Remove the override finder and resolver from `rt`.
    ///
    /// Namespaces loaded while installed stay loaded.
    pub fn uninstall(&self, rt: &Runtime) {
        if rt.remove_finder(&self.finder()) {
            rt.set_resolver(None);
            tracing::debug!("uninstalled override finder");
        }
    }
}

impl Resolver for NamespaceRegistry {
    fn parent(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        Self::parent(self, handle, name)
    }

    fn base(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        Self::base(self, handle, name)
    }
}
