// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Printer for Lonala values.
//!
//! Converts values back to their string representation.

use super::Value;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => {
                f.write_str("\"")?;
                write_escaped(f, s)?;
                f.write_str("\"")
            }
            Self::Keyword(k) => write!(f, ":{k}"),
            Self::Symbol(s) => f.write_str(s),
            Self::List(items) => write_seq(f, "(", items, ")"),
            Self::Vector(items) => write_seq(f, "[", items, "]"),
            Self::Record(r) => {
                write!(f, "#{}{{", r.ty.name)?;
                for (i, (field, value)) in r.ty.fields.iter().zip(&r.values).enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, ":{field} {value}")?;
                }
                f.write_str("}")
            }
            Self::Function(func) => match func.name() {
                Some(name) => write!(f, "#<fn {}/{name}>", func.owner),
                None => write!(f, "#<fn {}>", func.owner),
            },
            Self::Type(t) => write!(f, "#<type {}/{}>", t.owner, t.name),
            Self::Native(n) => write!(f, "#<native {}>", n.name()),
            Self::Bound(b) => write!(f, "#<bound {}>", b.target),
            Self::Namespace(ns) => write!(f, "#<ns {}>", ns.name()),
        }
    }
}

/// Render a value the way `str` does: strings without quotes.
#[must_use]
pub fn print_plain(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        Value::Nil => String::new(),
        other => other.to_string(),
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            _ => write!(f, "{c}")?,
        }
    }
    Ok(())
}
