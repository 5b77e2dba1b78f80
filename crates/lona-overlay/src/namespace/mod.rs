// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Live namespace objects.
//!
//! A [`Namespace`] is shared by reference between the runtime's table of
//! present namespaces, every function defined in it, and any other namespace
//! that aliases it. Its identity never changes once created.
//!
//! Symbols live in two places: the base table, written by the namespace's
//! own unit body, and a stack of overlay tables pushed by the override
//! engine. Reads consult the overlays top-down before falling through to the
//! base table, which gives the same resolution order as overwriting the base
//! entries in place while leaving the base definitions untouched.


use crate::overlay::RegisteredNamespace;
use crate::runtime::UnitLocation;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Name → value mapping.
pub type SymbolTable = BTreeMap<String, Value>;

/// Metadata symbols every namespace may carry. They never take part in an
/// override merge.
pub const RESERVED_NAMES: [&str; 9] = [
    "*doc*",
    "*file*",
    "*loader*",
    "*spec*",
    "*cached*",
    "*ns*",
    "*package*",
    "*path*",
    "*builtins*",
];

/// Check whether a symbol name is reserved metadata.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Identity of the layer whose code is executing.
///
/// Every unit body and every function carries the handle of the source unit
/// that defined it. Parent and base discovery take this handle instead of
/// inspecting the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerHandle {
    namespace: Rc<str>,
    source: Option<PathBuf>,
}

impl LayerHandle {
    pub(crate) const fn new(namespace: Rc<str>, source: Option<PathBuf>) -> Self {
        Self { namespace, source }
    }

    /// Namespace the executing code declared.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Source file of the executing layer, if it came from disk.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Symbols merged from one override layer.
#[derive(Debug)]
struct Overlay {
    source: PathBuf,
    symbols: SymbolTable,
}

/// A live namespace object.
pub struct Namespace {
    name: Rc<str>,
    location: Option<UnitLocation>,
    table: RefCell<SymbolTable>,
    overlays: RefCell<Vec<Overlay>>,
    owner: RefCell<Option<Weak<RegisteredNamespace>>>,
}

impl Namespace {
    /// Create an empty namespace backed by `location`, tagged with the name
    /// of the loader that created it.
    #[must_use]
    pub fn new(name: &str, location: Option<UnitLocation>, loader: &str) -> Rc<Self> {
        let ns = Self {
            name: Rc::from(name),
            location,
            table: RefCell::new(SymbolTable::new()),
            overlays: RefCell::new(Vec::new()),
            owner: RefCell::new(None),
        };
        ns.write_metadata(loader);
        Rc::new(ns)
    }

    fn write_metadata(&self, loader: &str) {
        let mut table = self.table.borrow_mut();
        table.insert("*ns*".into(), Value::string(&self.name));
        table.insert("*doc*".into(), Value::Nil);
        table.insert("*loader*".into(), Value::keyword(loader));
        let package = match &self.location {
            Some(loc) if loc.is_package() => self.name.to_string(),
            _ => self
                .name
                .rsplit_once('.')
                .map_or_else(String::new, |(parent, _)| parent.to_owned()),
        };
        table.insert("*package*".into(), Value::string(&package));
        if let Some(loc) = &self.location {
            table.insert(
                "*file*".into(),
                Value::string(&loc.path().to_string_lossy()),
            );
            if let Some(dir) = loc.package_dir() {
                table.insert(
                    "*path*".into(),
                    Value::vector(vec![Value::string(&dir.to_string_lossy())]),
                );
            }
        }
    }

    /// Fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_rc(&self) -> Rc<str> {
        Rc::clone(&self.name)
    }

    /// Source unit backing this namespace, if any.
    #[must_use]
    pub const fn location(&self) -> Option<&UnitLocation> {
        self.location.as_ref()
    }

    /// Search path for sub-namespaces; `None` unless this is a package.
    #[must_use]
    pub fn search_path(&self) -> Option<Vec<PathBuf>> {
        self.location
            .as_ref()
            .and_then(UnitLocation::package_dir)
            .map(|dir| vec![dir.to_path_buf()])
    }

    /// Handle identifying code defined by this namespace's own unit.
    #[must_use]
    pub fn handle(&self) -> LayerHandle {
        LayerHandle::new(
            self.name_rc(),
            self.location.as_ref().map(|loc| loc.path().to_path_buf()),
        )
    }

    /// Look up a symbol, checking overlays top-down before the base table.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let overlays = self.overlays.borrow();
        for overlay in overlays.iter().rev() {
            if let Some(value) = overlay.symbols.get(name) {
                return Some(value.clone());
            }
        }
        self.table.borrow().get(name).cloned()
    }

    /// Whether the namespace has an entry of this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table.borrow().contains_key(name)
    }

    /// Value defined by the namespace's own body, ignoring overlays.
    #[must_use]
    pub fn get_base(&self, name: &str) -> Option<Value> {
        self.table.borrow().get(name).cloned()
    }

    /// Define or redefine a symbol.
    ///
    /// A later definition replaces whatever overlays had merged for the name.
    pub fn define(&self, name: &str, value: Value) {
        for overlay in self.overlays.borrow_mut().iter_mut() {
            overlay.symbols.remove(name);
        }
        self.table.borrow_mut().insert(name.to_owned(), value);
    }

    /// Copy of the symbols defined by the namespace's own body.
    #[must_use]
    pub fn snapshot(&self) -> SymbolTable {
        self.table.borrow().clone()
    }

    /// Visible symbols, with overlays applied.
    #[must_use]
    pub fn symbols(&self) -> SymbolTable {
        let mut visible = self.snapshot();
        for overlay in self.overlays.borrow().iter() {
            for (name, value) in &overlay.symbols {
                visible.insert(name.clone(), value.clone());
            }
        }
        visible
    }

    /// Push the merged symbols of one override layer.
    pub(crate) fn push_overlay(&self, source: PathBuf, symbols: SymbolTable) {
        self.overlays.borrow_mut().push(Overlay { source, symbols });
    }

    /// Number of overlays pushed onto this namespace.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.borrow().len()
    }

    /// Source file of the overlay that currently provides `name`, if the
    /// visible value comes from an override.
    #[must_use]
    pub fn overridden_by(&self, name: &str) -> Option<PathBuf> {
        self.overlays
            .borrow()
            .iter()
            .rev()
            .find(|overlay| overlay.symbols.contains_key(name))
            .map(|overlay| overlay.source.clone())
    }

    pub(crate) fn set_owner(&self, owner: &Rc<RegisteredNamespace>) {
        *self.owner.borrow_mut() = Some(Rc::downgrade(owner));
    }

    /// The registered namespace that owns this object, if the override
    /// engine created it.
    #[must_use]
    pub fn owner(&self) -> Option<Rc<RegisteredNamespace>> {
        self.owner.borrow().as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("overlays", &self.overlay_count())
            .finish_non_exhaustive()
    }
}
