// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Callable and compound values.

use super::Value;
use crate::eval::{EvalError, Frame};
use crate::namespace::{LayerHandle, Namespace};
use crate::reader::Form;
use std::rc::{Rc, Weak};

/// Signature of a Rust intrinsic.
pub type NativeFn = fn(&[Value]) -> Result<Value, EvalError>;

/// A function defined in Lonala source.
///
/// Free symbols in the body resolve against `globals`, the namespace object
/// of the unit that defined the function. For a base unit that is the live
/// namespace, so merged overrides are visible; for an override unit it is
/// that unit's own namespace.
pub struct Function {
    pub(crate) name: Option<Rc<str>>,
    pub(crate) params: Rc<[Rc<str>]>,
    pub(crate) body: Rc<[Form]>,
    pub(crate) globals: Weak<Namespace>,
    pub(crate) locals: Option<Rc<Frame>>,
    pub(crate) owner: Rc<str>,
    pub(crate) handle: LayerHandle,
}

impl Function {
    /// Function name, if it was defined with `defn`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Namespace that defined the function.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Layer whose source defined the function.
    #[must_use]
    pub const fn handle(&self) -> &LayerHandle {
        &self.handle
    }
}

/// A record type defined with `deftype`.
pub struct TypeDef {
    pub(crate) name: Rc<str>,
    pub(crate) fields: Rc<[Rc<str>]>,
    pub(crate) owner: Rc<str>,
}

impl TypeDef {
    /// Type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field names, in order.
    #[must_use]
    pub fn fields(&self) -> &[Rc<str>] {
        &self.fields
    }

    /// Namespace that defined the type.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// An instance of a [`TypeDef`].
pub struct Record {
    pub(crate) ty: Rc<TypeDef>,
    pub(crate) values: Vec<Value>,
}

impl Record {
    /// The record's type.
    #[must_use]
    pub const fn ty(&self) -> &Rc<TypeDef> {
        &self.ty
    }

    /// Field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        let index = self.ty.fields.iter().position(|f| &**f == field)?;
        self.values.get(index)
    }
}

/// A Rust intrinsic.
#[derive(Clone, Copy)]
pub struct Native {
    name: &'static str,
    func: NativeFn,
}

impl Native {
    /// Wrap a Rust function.
    #[must_use]
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        Self { name, func }
    }

    /// Intrinsic name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the intrinsic.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        (self.func)(args)
    }
}

/// A callable with leading arguments already supplied (`partial`).
pub struct Bound {
    pub(crate) target: Value,
    pub(crate) args: Vec<Value>,
}

impl Bound {
    /// The wrapped callable.
    #[must_use]
    pub const fn target(&self) -> &Value {
        &self.target
    }

    /// The pre-supplied arguments.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}
