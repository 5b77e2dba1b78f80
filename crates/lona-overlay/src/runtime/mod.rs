// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! The host runtime: present namespaces, library paths and finders.
//!
//! Loading a namespace follows a fixed protocol. Each finder in order is
//! asked for a [`NamespaceSpec`]; the first one wins. Its loader creates an
//! empty namespace object, the runtime records it as present, and only then
//! does the loader execute the body. Recording before execution lets a unit
//! that is still loading be found by units it requires.

#[cfg(test)]
mod runtime_test;

mod finder;

pub use finder::{NativeFinder, PACKAGE_INIT, PathFinder, SOURCE_EXTENSION, SourceLoader, UnitLocation};

use crate::eval::{EvalError, eval_forms, exec_unit};
use crate::intrinsics::{CORE_NAMESPACE, core_symbols};
use crate::namespace::{LayerHandle, Namespace, SymbolTable};
use crate::overlay::AttributeNotFound;
use crate::reader::read_all;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::{fmt, fs, io};

/// Error raised while loading a namespace.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No finder knows the namespace.
    #[error("namespace not found: {name}")]
    NotFound { name: String },
    /// A dotted name below a namespace that is not a package.
    #[error("cannot load {name}: {parent} is not a package")]
    NotAPackage { name: String, parent: String },
    /// A source unit could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A unit body failed to execute.
    #[error("failed to execute {namespace}{}", at(path.as_deref()))]
    Eval {
        namespace: String,
        path: Option<PathBuf>,
        #[source]
        source: Box<EvalError>,
    },
}

fn at(path: Option<&Path>) -> String {
    path.map(|p| format!(" ({})", p.display())).unwrap_or_default()
}

impl LoadError {
    pub(crate) fn eval(namespace: &str, path: Option<&Path>, source: EvalError) -> Self {
        Self::Eval {
            namespace: namespace.to_owned(),
            path: path.map(Path::to_path_buf),
            source: Box::new(source),
        }
    }
}

/// Result of a successful find: which loader handles the namespace.
pub struct NamespaceSpec {
    /// Fully-qualified name.
    pub name: String,
    /// Loader that creates and executes the namespace.
    pub loader: Rc<dyn Loader>,
    /// Source unit, if the namespace has one.
    pub location: Option<UnitLocation>,
}

impl fmt::Debug for NamespaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceSpec")
            .field("name", &self.name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Decides whether it can provide a namespace.
pub trait Finder {
    /// Short name, for diagnostics.
    fn name(&self) -> &str;

    /// Return a spec for `name`, or `None` to let the next finder try.
    ///
    /// `search` is the parent package's search path for dotted names.
    fn find_spec(&self, name: &str, search: Option<&[PathBuf]>, rt: &Runtime) -> Option<NamespaceSpec>;
}

/// Two-phase namespace loader.
pub trait Loader {
    /// Phase one: create the empty namespace object.
    fn create(&self, spec: &NamespaceSpec, rt: &Runtime) -> Result<Rc<Namespace>, LoadError>;

    /// Phase two: execute the body into the object.
    fn exec(&self, ns: &Rc<Namespace>, rt: &Runtime) -> Result<(), LoadError>;
}

/// Answers `parent` and `base` lookups on behalf of executing code.
pub trait Resolver {
    /// Nearest ancestor definition of `name` above the calling layer.
    fn parent(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound>;

    /// Definition of `name` in the base layer of the calling namespace.
    fn base(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound>;
}

/// The namespace host.
pub struct Runtime {
    lib_paths: Vec<PathBuf>,
    finders: RefCell<Vec<Rc<dyn Finder>>>,
    present: RefCell<BTreeMap<String, Rc<Namespace>>>,
    natives: Rc<NativeFinder>,
    core: Rc<Namespace>,
    resolver: RefCell<Option<Rc<dyn Resolver>>>,
}

impl Runtime {
    /// Create a runtime searching `lib_paths` for source units.
    ///
    /// The finder list starts as `[native, path]`.
    #[must_use]
    pub fn new(lib_paths: Vec<PathBuf>) -> Self {
        let natives = Rc::new(NativeFinder::default());
        let core = Namespace::new(CORE_NAMESPACE, None, "native");
        for (name, value) in core_symbols() {
            core.define(&name, value);
        }
        let finders: Vec<Rc<dyn Finder>> = vec![
            Rc::clone(&natives) as Rc<dyn Finder>,
            Rc::new(PathFinder),
        ];
        let mut present = BTreeMap::new();
        present.insert(CORE_NAMESPACE.to_owned(), Rc::clone(&core));
        Self {
            lib_paths,
            finders: RefCell::new(finders),
            present: RefCell::new(present),
            natives,
            core,
            resolver: RefCell::new(None),
        }
    }

    /// Library search paths.
    #[must_use]
    pub fn lib_paths(&self) -> &[PathBuf] {
        &self.lib_paths
    }

    /// The intrinsics namespace every unit falls back to.
    #[must_use]
    pub const fn core(&self) -> &Rc<Namespace> {
        &self.core
    }

    /// Load `name` unless it is already present.
    pub fn require(&self, name: &str) -> Result<Rc<Namespace>, LoadError> {
        if let Some(ns) = self.present(name) {
            return Ok(ns);
        }
        let search = match name.rsplit_once('.') {
            Some((parent, _)) => {
                let parent_ns = self.require(parent)?;
                let path = parent_ns.search_path().ok_or_else(|| LoadError::NotAPackage {
                    name: name.to_owned(),
                    parent: parent.to_owned(),
                })?;
                Some(path)
            }
            None => None,
        };
        // The parent's body may have required `name` already.
        if let Some(ns) = self.present(name) {
            return Ok(ns);
        }
        let spec = self
            .find_spec(name, search.as_deref())
            .ok_or_else(|| LoadError::NotFound {
                name: name.to_owned(),
            })?;
        let ns = spec.loader.create(&spec, self)?;
        self.insert_present(Rc::clone(&ns));
        tracing::debug!(namespace = name, "executing namespace body");
        if let Err(err) = spec.loader.exec(&ns, self) {
            self.remove_present(name);
            return Err(err);
        }
        Ok(ns)
    }

    /// Forget `name` and load it again into a new namespace object.
    pub fn reload(&self, name: &str) -> Result<Rc<Namespace>, LoadError> {
        self.remove_present(name);
        self.require(name)
    }

    fn find_spec(&self, name: &str, search: Option<&[PathBuf]>) -> Option<NamespaceSpec> {
        let finders = self.finders.borrow().clone();
        finders.iter().find_map(|finder| {
            let spec = finder.find_spec(name, search, self)?;
            tracing::trace!(namespace = name, finder = finder.name(), "found namespace");
            Some(spec)
        })
    }

    /// Evaluate `source` in the context of `ns`, returning the last value.
    pub fn eval_in(&self, ns: &Rc<Namespace>, source: &str) -> Result<Value, EvalError> {
        let forms = read_all(source)?;
        eval_forms(self, ns, &forms, ns.handle())
    }

    /// Register a namespace built in Rust. It is created on first require.
    pub fn define_native(&self, name: &str, symbols: SymbolTable) {
        self.natives.define(name, symbols);
    }

    /// Insert a finder at `index`, clamped to the length of the list.
    pub fn insert_finder(&self, index: usize, finder: Rc<dyn Finder>) {
        let mut finders = self.finders.borrow_mut();
        let index = index.min(finders.len());
        finders.insert(index, finder);
    }

    /// Remove a finder. Returns whether it was installed.
    pub fn remove_finder(&self, finder: &Rc<dyn Finder>) -> bool {
        let mut finders = self.finders.borrow_mut();
        let before = finders.len();
        finders.retain(|f| !same_finder(f, finder));
        finders.len() != before
    }

    /// Whether `finder` is in the finder list.
    #[must_use]
    pub fn has_finder(&self, finder: &Rc<dyn Finder>) -> bool {
        self.finders.borrow().iter().any(|f| same_finder(f, finder))
    }

    /// Names of the installed finders, in lookup order.
    #[must_use]
    pub fn finder_names(&self) -> Vec<String> {
        self.finders
            .borrow()
            .iter()
            .map(|f| f.name().to_owned())
            .collect()
    }

    /// Install or clear the resolver used by `parent` and `base`.
    pub fn set_resolver(&self, resolver: Option<Rc<dyn Resolver>>) {
        *self.resolver.borrow_mut() = resolver;
    }

    /// Whether a resolver is installed.
    #[must_use]
    pub fn has_resolver(&self) -> bool {
        self.resolver.borrow().is_some()
    }

    /// Resolve `name` in the layer above the one identified by `handle`.
    pub fn resolve_parent(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        match self.resolver() {
            Some(resolver) => resolver.parent(handle, name),
            None => Err(AttributeNotFound::new(handle.namespace(), name, "no resolver installed")),
        }
    }

    /// Resolve `name` in the base layer of the handle's namespace.
    pub fn resolve_base(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        match self.resolver() {
            Some(resolver) => resolver.base(handle, name),
            None => Err(AttributeNotFound::new(handle.namespace(), name, "no resolver installed")),
        }
    }

    fn resolver(&self) -> Option<Rc<dyn Resolver>> {
        self.resolver.borrow().clone()
    }

    /// A present namespace by name.
    #[must_use]
    pub fn present(&self, name: &str) -> Option<Rc<Namespace>> {
        self.present.borrow().get(name).cloned()
    }

    /// Names of all present namespaces.
    #[must_use]
    pub fn present_names(&self) -> Vec<String> {
        self.present.borrow().keys().cloned().collect()
    }

    pub(crate) fn insert_present(&self, ns: Rc<Namespace>) {
        self.present.borrow_mut().insert(ns.name().to_owned(), ns);
    }

    pub(crate) fn remove_present(&self, name: &str) -> Option<Rc<Namespace>> {
        self.present.borrow_mut().remove(name)
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("lib_paths", &self.lib_paths)
            .field("finders", &self.finder_names())
            .field("present", &self.present_names())
            .finish_non_exhaustive()
    }
}

fn same_finder(a: &Rc<dyn Finder>, b: &Rc<dyn Finder>) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

/// Read a source unit into a string.
pub(crate) fn read_unit(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Execute the namespace's own source unit into it.
pub(crate) fn exec_source(rt: &Runtime, ns: &Rc<Namespace>) -> Result<(), LoadError> {
    let Some(location) = ns.location() else {
        return Ok(());
    };
    let path = location.path();
    let source = read_unit(path)?;
    exec_unit(rt, ns, &source, ns.handle()).map_err(|err| LoadError::eval(ns.name(), Some(path), err))
}
