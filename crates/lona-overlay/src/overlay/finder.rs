// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Interception of the runtime's load protocol.

use super::NamespaceRegistry;
use crate::namespace::Namespace;
use crate::runtime::{Finder, LoadError, Loader, NamespaceSpec, Runtime, exec_source};
use std::fmt;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

/// Claims namespaces whose top-level name is known to have overrides.
pub struct OverrideFinder {
    registry: Weak<NamespaceRegistry>,
}

impl OverrideFinder {
    pub(crate) const fn new(registry: Weak<NamespaceRegistry>) -> Self {
        Self { registry }
    }
}

impl fmt::Debug for OverrideFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideFinder").finish_non_exhaustive()
    }
}

impl Finder for OverrideFinder {
    fn name(&self) -> &str {
        "override"
    }

    fn find_spec(&self, name: &str, search: Option<&[PathBuf]>, _rt: &Runtime) -> Option<NamespaceSpec> {
        let registry = self.registry.upgrade()?;
        let search = if registry.is_known(name) {
            None
        } else {
            let (top, _) = name.split_once('.')?;
            if !registry.is_known(top) {
                return None;
            }
            if search.is_none() {
                tracing::debug!(namespace = name, "sub-namespace without search path, declined");
                return None;
            }
            search.map(<[PathBuf]>::to_vec)
        };
        Some(NamespaceSpec {
            name: name.to_owned(),
            loader: Rc::new(OverrideLoader {
                registry: Weak::clone(&self.registry),
                search,
            }),
            location: None,
        })
    }
}

/// Builds override chains while loading.
pub struct OverrideLoader {
    registry: Weak<NamespaceRegistry>,
    search: Option<Vec<PathBuf>>,
}

impl OverrideLoader {
    /// Search path hint handed to the registered namespace.
    #[must_use]
    pub fn search_path(&self) -> Option<&[PathBuf]> {
        self.search.as_deref()
    }

    fn registry(&self, name: &str) -> Result<Rc<NamespaceRegistry>, LoadError> {
        self.registry.upgrade().ok_or_else(|| LoadError::NotFound {
            name: name.to_owned(),
        })
    }
}

impl Loader for OverrideLoader {
    fn create(&self, spec: &NamespaceSpec, rt: &Runtime) -> Result<Rc<Namespace>, LoadError> {
        let registry = self.registry(&spec.name)?;
        let registered = registry.get_or_register(&spec.name, self.search_path());
        registered.prepare(rt)
    }

    fn exec(&self, ns: &Rc<Namespace>, rt: &Runtime) -> Result<(), LoadError> {
        match ns.owner() {
            Some(registered) => {
                let registry = self.registry(ns.name())?;
                registered.load(rt, &registry.roots())
            }
            None => exec_source(rt, ns),
        }
    }
}
