// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Shared test infrastructure for integration tests.
//!
//! This module provides:
//! - [`SourceTree`] - A temporary directory of library and override roots
//! - [`TestRuntime`] - A runtime with an installed registry over a tree
//!
//! # Design
//!
//! This module is **not** a test file, so it must comply with full clippy rules.
//! Test-specific allowances (like `unwrap_used`) are only permitted in `*_test.rs` files.
//! Macros defined here are expanded at call sites, so they can use unwrap in test files.

#![allow(unused_imports, reason = "each test binary uses a different subset of the re-exports")]

pub mod test_runtime;
pub mod tree;

pub use test_runtime::{TestRuntime, TestRuntimeError};
pub use tree::SourceTree;
