// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Parent and base discovery.
//!
//! Both walk the chain of the namespace named by the caller's
//! [`LayerHandle`], starting from the layer whose source matches the
//! handle. They never modify anything.

use super::{Layer, NamespaceRegistry, RegisteredNamespace};
use crate::namespace::LayerHandle;
use crate::value::Value;
use std::rc::Rc;

/// Discovery found no definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot resolve {name} from {namespace}: {reason}")]
pub struct AttributeNotFound {
    /// Namespace of the calling code.
    pub namespace: String,
    /// Requested symbol.
    pub name: String,
    /// What was missing.
    pub reason: &'static str,
}

impl AttributeNotFound {
    pub(crate) fn new(namespace: &str, name: &str, reason: &'static str) -> Self {
        Self {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            reason,
        }
    }
}

impl RegisteredNamespace {
    fn calling_layer(&self, handle: &LayerHandle, name: &str) -> Result<Rc<Layer>, AttributeNotFound> {
        handle
            .source()
            .and_then(|source| self.find_layer(source))
            .ok_or_else(|| AttributeNotFound::new(self.name(), name, "calling layer not in chain"))
    }

    /// Nearest definition of `name` strictly above the calling layer.
    pub fn parent(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        let layer = self.calling_layer(handle, name)?;
        layer
            .ancestors()
            .find_map(|ancestor| ancestor.get(name))
            .ok_or_else(|| AttributeNotFound::new(self.name(), name, "no ancestor defines it"))
    }

    /// Definition of `name` in the base layer.
    pub fn base(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        self.calling_layer(handle, name)?;
        self.chain
            .borrow()
            .first()
            .and_then(|base| base.get(name))
            .ok_or_else(|| AttributeNotFound::new(self.name(), name, "base layer does not define it"))
    }
}

impl NamespaceRegistry {
    fn registered_for(&self, handle: &LayerHandle, name: &str) -> Result<Rc<RegisteredNamespace>, AttributeNotFound> {
        self.namespace(handle.namespace())
            .ok_or_else(|| AttributeNotFound::new(handle.namespace(), name, "namespace is not registered"))
    }

    /// Parent discovery for code running in the layer `handle`.
    pub fn parent(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        self.registered_for(handle, name)?.parent(handle, name)
    }

    /// Base discovery for code running in the layer `handle`.
    pub fn base(&self, handle: &LayerHandle, name: &str) -> Result<Value, AttributeNotFound> {
        self.registered_for(handle, name)?.base(handle, name)
    }
}
