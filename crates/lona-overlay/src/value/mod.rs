// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Value representation for the Lonala language.
//!
//! Every value belongs to exactly one [`SymbolKind`]. The kind is a
//! structural property of the variant, and together with the owning
//! namespace recorded on functions and types it decides whether a symbol
//! may take part in an override merge.

#[cfg(test)]
mod printer_test;

mod function;
mod printer;

pub use function::{Bound, Function, Native, NativeFn, Record, TypeDef};
pub use printer::print_plain;

use crate::namespace::Namespace;
use std::rc::Rc;

/// The closed set of symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Plain data: nil, booleans, integers, strings, keywords, symbols,
    /// collections, records.
    Value,
    /// A function defined in Lonala source.
    Function,
    /// A record type defined with `deftype`.
    Type,
    /// An intrinsic implemented in Rust.
    Native,
    /// A partial application.
    Bound,
    /// A namespace object.
    Namespace,
}

impl SymbolKind {
    /// Whether symbols of this kind record the namespace that defined them.
    #[must_use]
    pub const fn has_owner(self) -> bool {
        matches!(self, Self::Function | Self::Type)
    }
}

/// A Lonala value.
#[derive(Clone, Default)]
pub enum Value {
    /// The nil value.
    #[default]
    Nil,
    /// Boolean true or false.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// Immutable string.
    Str(Rc<str>),
    /// Keyword, stored without the leading colon.
    Keyword(Rc<str>),
    /// Quoted symbol.
    Symbol(Rc<str>),
    /// List.
    List(Rc<[Value]>),
    /// Vector.
    Vector(Rc<[Value]>),
    /// Instance of a `deftype` type.
    Record(Rc<Record>),
    /// Function defined in Lonala source.
    Function(Rc<Function>),
    /// Record type.
    Type(Rc<TypeDef>),
    /// Rust intrinsic.
    Native(Native),
    /// Partial application.
    Bound(Rc<Bound>),
    /// Namespace object.
    Namespace(Rc<Namespace>),
}

impl Value {
    /// Create a string value.
    #[must_use]
    pub fn string(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }

    /// Create a keyword value.
    #[must_use]
    pub fn keyword(s: &str) -> Self {
        Self::Keyword(Rc::from(s))
    }

    /// Create a list value.
    #[must_use]
    pub fn list(items: Vec<Self>) -> Self {
        Self::List(Rc::from(items))
    }

    /// Create a vector value.
    #[must_use]
    pub fn vector(items: Vec<Self>) -> Self {
        Self::Vector(Rc::from(items))
    }

    /// The symbol kind of this value.
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        match self {
            Self::Nil
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Str(_)
            | Self::Keyword(_)
            | Self::Symbol(_)
            | Self::List(_)
            | Self::Vector(_)
            | Self::Record(_) => SymbolKind::Value,
            Self::Function(_) => SymbolKind::Function,
            Self::Type(_) => SymbolKind::Type,
            Self::Native(_) => SymbolKind::Native,
            Self::Bound(_) => SymbolKind::Bound,
            Self::Namespace(_) => SymbolKind::Namespace,
        }
    }

    /// The namespace that defined this value, for functions and types.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Function(f) => Some(f.owner()),
            Self::Type(t) => Some(t.owner()),
            _ => None,
        }
    }

    /// Short name of the value's runtime type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Keyword(_) => "keyword",
            Self::Symbol(_) => "symbol",
            Self::List(_) => "list",
            Self::Vector(_) => "vector",
            Self::Record(_) => "record",
            Self::Function(_) => "function",
            Self::Type(_) => "type",
            Self::Native(_) => "native",
            Self::Bound(_) => "bound",
            Self::Namespace(_) => "namespace",
        }
    }

    /// Lonala truthiness: everything except `nil` and `false`.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Check if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// The integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or vector.
    #[must_use]
    pub fn as_seq(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Vector(items) => Some(items),
            Self::Nil => Some(&[]),
            _ => None,
        }
    }
}

/// Data compares structurally; functions, types, bound values and
/// namespaces compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b))
            | (Self::Keyword(a), Self::Keyword(b))
            | (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::List(a) | Self::Vector(a), Self::List(b) | Self::Vector(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => {
                Rc::ptr_eq(&a.ty, &b.ty) && a.values == b.values
            }
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => a.name() == b.name(),
            (Self::Bound(a), Self::Bound(b)) => Rc::ptr_eq(a, b),
            (Self::Namespace(a), Self::Namespace(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
