// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Runtime with an installed override registry.

#![allow(
    dead_code,
    reason = "each test binary uses a different subset of the runtime helpers"
)]

use super::SourceTree;
use lona_overlay::{EvalError, LoadError, NamespaceRegistry, Runtime, Value};
use std::rc::Rc;

/// Failure while loading or evaluating in a test runtime.
#[derive(Debug, thiserror::Error)]
pub enum TestRuntimeError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// A runtime over a [`SourceTree`]'s library root with a registry
/// installed. Override roots are registered explicitly, in order.
pub struct TestRuntime {
    pub rt: Runtime,
    pub registry: Rc<NamespaceRegistry>,
}

impl TestRuntime {
    /// Create a runtime for `tree` with the named roots registered in order.
    #[must_use]
    pub fn new(tree: &SourceTree, roots: &[&str]) -> Self {
        let rt = Runtime::new(vec![tree.lib_path()]);
        let registry = NamespaceRegistry::new();
        for root in roots {
            registry.register_root(tree.root_path(root));
        }
        registry.install(&rt);
        Self { rt, registry }
    }

    /// Evaluate `expr` in the context of namespace `ns`, loading it first.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or evaluation fails.
    pub fn eval(&self, ns: &str, expr: &str) -> Result<Value, TestRuntimeError> {
        let namespace = self.rt.require(ns)?;
        Ok(self.rt.eval_in(&namespace, expr)?)
    }

    /// Evaluate and print.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or evaluation fails.
    pub fn rep(&self, ns: &str, expr: &str) -> Result<String, TestRuntimeError> {
        Ok(self.eval(ns, expr)?.to_string())
    }
}

/// Assert that evaluating an expression in a namespace prints as expected.
///
/// # Panics
///
/// Panics if loading or evaluation fails or the output doesn't match.
#[macro_export]
macro_rules! assert_rep {
    ($t:expr, $ns:expr, $input:expr, $expected:expr) => {
        match $t.rep($ns, $input) {
            Ok(output) => assert_eq!(output, $expected, "input: {:?}", $input),
            Err(e) => panic!("rep failed for {:?}: {}", $input, e),
        }
    };
}
