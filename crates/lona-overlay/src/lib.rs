// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! # Lona Overlay
//!
//! Layered namespace overrides for Lonala.
//!
//! This crate provides:
//! - Reader (lexer/parser) for Lonala source code
//! - Value representation and printing
//! - A small evaluator for unit bodies and expressions
//! - A runtime loading namespaces from library paths
//! - The override engine: roots, chains and parent/base discovery
//!
//! ```no_run
//! use lona_overlay::{NamespaceRegistry, Runtime};
//!
//! let rt = Runtime::new(vec!["lib".into()]);
//! let registry = NamespaceRegistry::new();
//! registry.register_root("overrides");
//! registry.install(&rt);
//! let ns = rt.require("app.config").unwrap();
//! ```

pub mod eval;
pub mod intrinsics;
pub mod namespace;
pub mod overlay;
pub mod reader;
pub mod runtime;
pub mod value;

// Re-export commonly used types at crate root
pub use eval::EvalError;
pub use namespace::{LayerHandle, Namespace};
pub use overlay::{AttributeNotFound, Layer, NamespaceRegistry, RegisteredNamespace};
pub use runtime::{LoadError, Runtime};
pub use value::{SymbolKind, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
