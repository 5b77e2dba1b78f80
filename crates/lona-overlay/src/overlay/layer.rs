// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Layers of an override chain.

use crate::namespace::{Namespace, SymbolTable};
use crate::value::Value;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// One source unit in an override chain.
///
/// `symbols` is the snapshot taken right after the unit's own body ran, so
/// it holds exactly what that unit defined or imported. It is empty while
/// the layer is still pending.
#[derive(Debug)]
pub struct Layer {
    source: PathBuf,
    parent: Option<Rc<Layer>>,
    symbols: RefCell<SymbolTable>,
    // Functions defined by an override body resolve their globals here.
    unit: Option<Rc<Namespace>>,
}

impl Layer {
    pub(crate) const fn base(source: PathBuf, symbols: SymbolTable) -> Self {
        Self {
            source,
            parent: None,
            symbols: RefCell::new(symbols),
            unit: None,
        }
    }

    pub(crate) const fn pending(source: PathBuf, parent: Rc<Self>, unit: Rc<Namespace>) -> Self {
        Self {
            source,
            parent: Some(parent),
            symbols: RefCell::new(SymbolTable::new()),
            unit: Some(unit),
        }
    }

    pub(crate) fn seal(&self, symbols: SymbolTable) {
        *self.symbols.borrow_mut() = symbols;
    }

    /// Source file of this layer.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The layer this one overrides; `None` for the base layer.
    #[must_use]
    pub const fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Whether this is the base layer.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        self.parent.is_none()
    }

    /// This layer's own definition of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.symbols.borrow().get(name).cloned()
    }

    /// Copy of this layer's own symbols.
    #[must_use]
    pub fn symbols(&self) -> SymbolTable {
        self.symbols.borrow().clone()
    }

    /// The namespace object the override body executed in.
    #[must_use]
    pub const fn unit(&self) -> Option<&Rc<Namespace>> {
        self.unit.as_ref()
    }

    /// Walk the ancestors of this layer, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Rc<Self>> {
        std::iter::successors(self.parent.as_ref(), |layer| layer.parent.as_ref())
    }
}
