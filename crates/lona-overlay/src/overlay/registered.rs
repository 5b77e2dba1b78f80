// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Chain construction for one overridable namespace.

use super::Layer;
use crate::eval::exec_unit;
use crate::namespace::{Namespace, SymbolTable, is_reserved};
use crate::runtime::{LoadError, PathFinder, Runtime, UnitLocation, exec_source};
use crate::value::{SymbolKind, Value};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::{fs, io};

/// The override chain of one fully-qualified namespace.
///
/// `chain[0]` is the base layer; every later layer's parent is its
/// predecessor. The live namespace object is created once per load and
/// keeps its identity while overrides are merged into it.
#[derive(Debug)]
pub struct RegisteredNamespace {
    name: String,
    search_path: Option<Vec<PathBuf>>,
    pub(super) chain: RefCell<Vec<Rc<Layer>>>,
    pub(super) pending: RefCell<Option<Rc<Layer>>>,
    live: RefCell<Option<Rc<Namespace>>>,
}

impl RegisteredNamespace {
    pub(crate) const fn new(name: String, search_path: Option<Vec<PathBuf>>) -> Self {
        Self {
            name,
            search_path,
            chain: RefCell::new(Vec::new()),
            pending: RefCell::new(None),
            live: RefCell::new(None),
        }
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent package search path this namespace was found with.
    #[must_use]
    pub fn search_path(&self) -> Option<&[PathBuf]> {
        self.search_path.as_deref()
    }

    /// The layers built by the last load, base first.
    #[must_use]
    pub fn chain(&self) -> Vec<Rc<Layer>> {
        self.chain.borrow().clone()
    }

    /// The live namespace object of the last load.
    #[must_use]
    pub fn live(&self) -> Option<Rc<Namespace>> {
        self.live.borrow().clone()
    }

    /// Phase one: reset the chain and create the empty live namespace for
    /// the base unit.
    pub(crate) fn prepare(self: &Rc<Self>, rt: &Runtime) -> Result<Rc<Namespace>, LoadError> {
        self.chain.borrow_mut().clear();
        self.pending.borrow_mut().take();
        let location = PathFinder::locate(&self.name, self.search_path(), rt.lib_paths())
            .ok_or_else(|| LoadError::NotFound {
                name: self.name.clone(),
            })?;
        let ns = Namespace::new(&self.name, Some(location), "overlay");
        ns.set_owner(self);
        *self.live.borrow_mut() = Some(Rc::clone(&ns));
        Ok(ns)
    }

    /// Phase two: execute the base unit, then every override found below
    /// `roots`, merging each into the live namespace.
    pub(crate) fn load(&self, rt: &Runtime, roots: &[PathBuf]) -> Result<(), LoadError> {
        let Some(live) = self.live() else {
            return Err(LoadError::NotFound {
                name: self.name.clone(),
            });
        };
        let Some(base_location) = live.location().cloned() else {
            return Err(LoadError::NotFound {
                name: self.name.clone(),
            });
        };

        exec_source(rt, &live)?;
        let mut parent = Rc::new(Layer::base(
            base_location.path().to_path_buf(),
            live.snapshot(),
        ));
        self.chain.borrow_mut().push(Rc::clone(&parent));

        for root in roots {
            let location = base_location.relocate(&self.name, root);
            let Some(layer) = self.exec_override(rt, &location, &parent)? else {
                continue;
            };
            self.chain.borrow_mut().push(Rc::clone(&layer));
            self.merge(&live, &layer);
            parent = layer;
        }
        tracing::debug!(
            namespace = %self.name,
            layers = self.chain.borrow().len(),
            "override chain built"
        );
        Ok(())
    }

    /// Execute one override unit. Returns `None` if the root has no file for
    /// this namespace.
    fn exec_override(
        &self,
        rt: &Runtime,
        location: &UnitLocation,
        parent: &Rc<Layer>,
    ) -> Result<Option<Rc<Layer>>, LoadError> {
        let path = location.path();
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(namespace = %self.name, path = %path.display(), "no override in root");
                return Ok(None);
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let unit = Namespace::new(&self.name, Some(location.clone()), "overlay");
        let layer = Rc::new(Layer::pending(
            path.to_path_buf(),
            Rc::clone(parent),
            Rc::clone(&unit),
        ));
        *self.pending.borrow_mut() = Some(Rc::clone(&layer));
        let result = exec_unit(rt, &unit, &source, unit.handle());
        self.pending.borrow_mut().take();
        result.map_err(|err| LoadError::eval(&self.name, Some(path), err))?;
        layer.seal(unit.snapshot());
        Ok(Some(layer))
    }

    /// Push the eligible symbols of `layer` as an overlay onto `live`.
    fn merge(&self, live: &Namespace, layer: &Layer) {
        let mut merged = SymbolTable::new();
        for (name, value) in layer.symbols() {
            if self.is_mergeable(live, &name, &value) {
                tracing::trace!(namespace = %self.name, symbol = %name, "merging");
                merged.insert(name, value);
            } else {
                tracing::trace!(namespace = %self.name, symbol = %name, "not merged");
            }
        }
        tracing::debug!(
            namespace = %self.name,
            source = %layer.source().display(),
            merged = merged.len(),
            "merged override layer"
        );
        live.push_overlay(layer.source().to_path_buf(), merged);
    }

    /// Whether an override's `name = value` may replace the live entry.
    ///
    /// The live namespace must already define `name`, metadata never
    /// merges, and natives, partial applications and namespace objects
    /// never merge. Functions and types merge only when both they and the
    /// entry they replace were defined by this namespace.
    #[must_use]
    pub fn is_mergeable(&self, live: &Namespace, name: &str, value: &Value) -> bool {
        if is_reserved(name) {
            return false;
        }
        let Some(existing) = live.get(name) else {
            return false;
        };
        match value.kind() {
            SymbolKind::Native | SymbolKind::Bound | SymbolKind::Namespace => false,
            SymbolKind::Function | SymbolKind::Type => {
                self.owns(value) && existing.kind().has_owner() && self.owns(&existing)
            }
            SymbolKind::Value => true,
        }
    }

    fn owns(&self, value: &Value) -> bool {
        value.owner() == Some(self.name.as_str())
    }

    /// Find the layer whose source is `source`, including a pending one.
    #[must_use]
    pub fn find_layer(&self, source: &Path) -> Option<Rc<Layer>> {
        let found = self
            .chain
            .borrow()
            .iter()
            .find(|layer| layer.source() == source)
            .cloned();
        found.or_else(|| {
            self.pending
                .borrow()
                .as_ref()
                .filter(|layer| layer.source() == source)
                .cloned()
        })
    }
}
