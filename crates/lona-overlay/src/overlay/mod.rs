// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Layered namespace overrides.
//!
//! An override root is a directory mirroring the library layout. When a
//! namespace whose top-level name appears in a registered root is required,
//! the override loader executes the base unit and then, root by root, each
//! override unit of the same name. Eligible symbols defined by an override
//! become visible on the live base namespace; the defining unit is recorded
//! as a [`Layer`] in the namespace's chain so override code can reach the
//! definitions it replaced through `parent` and `base`.

#[cfg(test)]
mod registry_test;

mod discovery;
mod finder;
mod layer;
mod registered;
mod registry;

pub use discovery::AttributeNotFound;
pub use finder::{OverrideFinder, OverrideLoader};
pub use layer::Layer;
pub use registered::RegisteredNamespace;
pub use registry::{INTERCEPT_PRIORITY, NamespaceRegistry};
