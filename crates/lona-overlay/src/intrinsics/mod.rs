// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Built-in intrinsic functions.
//!
//! Intrinsics are operations implemented in Rust. They are collected into
//! the `lona.core` namespace, which every unit falls back to when a symbol
//! is not bound locally. Intrinsic values have the `native` symbol kind and
//! are therefore never merged by the override engine.


use crate::eval::{EvalError, bind};
use crate::namespace::SymbolTable;
use crate::value::{Native, NativeFn, SymbolKind, Value, print_plain};

/// Name of the namespace holding the intrinsics.
pub const CORE_NAMESPACE: &str = "lona.core";

/// Intrinsic name and implementation table.
const INTRINSICS: [(&str, NativeFn); 23] = [
    ("+", add),
    ("-", sub),
    ("*", mul),
    ("/", div),
    ("mod", rem),
    ("=", eq),
    ("<", lt),
    (">", gt),
    ("<=", le),
    (">=", ge),
    ("not", not),
    ("nil?", is_nil),
    ("integer?", is_int),
    ("string?", is_str),
    ("str", str),
    ("inc", inc),
    ("dec", dec),
    ("list", list),
    ("vector", vector),
    ("count", count),
    ("first", first),
    ("get", get),
    ("partial", partial),
];

/// Look up an intrinsic by name.
#[must_use]
pub fn lookup_intrinsic(name: &str) -> Option<Native> {
    INTRINSICS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(n, f)| Native::new(n, f))
}

/// All intrinsics as a symbol table.
#[must_use]
pub fn core_symbols() -> SymbolTable {
    INTRINSICS
        .iter()
        .map(|&(name, f)| (name.to_owned(), Value::Native(Native::new(name, f))))
        .collect()
}

fn int_arg(op: &'static str, value: &Value) -> Result<i64, EvalError> {
    value.as_int().ok_or(EvalError::Type {
        op,
        expected: "integer",
        found: value.type_name(),
    })
}

fn arity(op: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::Arity {
            name: op.to_owned(),
            expected,
            found: args.len(),
        })
    }
}

fn fold_ints(
    op: &'static str,
    args: &[Value],
    init: i64,
    f: fn(i64, i64) -> Option<i64>,
) -> Result<Value, EvalError> {
    let mut acc = init;
    for arg in args {
        acc = f(acc, int_arg(op, arg)?).ok_or(EvalError::Overflow)?;
    }
    Ok(Value::Int(acc))
}

fn add(args: &[Value]) -> Result<Value, EvalError> {
    fold_ints("+", args, 0, i64::checked_add)
}

fn mul(args: &[Value]) -> Result<Value, EvalError> {
    fold_ints("*", args, 1, i64::checked_mul)
}

fn sub(args: &[Value]) -> Result<Value, EvalError> {
    match args {
        [] => Err(EvalError::Arity {
            name: "-".into(),
            expected: 1,
            found: 0,
        }),
        [only] => int_arg("-", only)?
            .checked_neg()
            .map(Value::Int)
            .ok_or(EvalError::Overflow),
        [first, rest @ ..] => fold_ints("-", rest, int_arg("-", first)?, i64::checked_sub),
    }
}

fn div(args: &[Value]) -> Result<Value, EvalError> {
    arity("/", args, 2)?;
    let (a, b) = (int_arg("/", &args[0])?, int_arg("/", &args[1])?);
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    a.checked_div(b).map(Value::Int).ok_or(EvalError::Overflow)
}

fn rem(args: &[Value]) -> Result<Value, EvalError> {
    arity("mod", args, 2)?;
    let (a, b) = (int_arg("mod", &args[0])?, int_arg("mod", &args[1])?);
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    a.checked_rem_euclid(b)
        .map(Value::Int)
        .ok_or(EvalError::Overflow)
}

fn eq(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(args.windows(2).all(|w| w[0] == w[1])))
}

fn compare(op: &'static str, args: &[Value], f: fn(i64, i64) -> bool) -> Result<Value, EvalError> {
    let ints = args
        .iter()
        .map(|arg| int_arg(op, arg))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Bool(ints.windows(2).all(|w| f(w[0], w[1]))))
}

fn lt(args: &[Value]) -> Result<Value, EvalError> {
    compare("<", args, |a, b| a < b)
}

fn gt(args: &[Value]) -> Result<Value, EvalError> {
    compare(">", args, |a, b| a > b)
}

fn le(args: &[Value]) -> Result<Value, EvalError> {
    compare("<=", args, |a, b| a <= b)
}

fn ge(args: &[Value]) -> Result<Value, EvalError> {
    compare(">=", args, |a, b| a >= b)
}

fn not(args: &[Value]) -> Result<Value, EvalError> {
    arity("not", args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn is_nil(args: &[Value]) -> Result<Value, EvalError> {
    arity("nil?", args, 1)?;
    Ok(Value::Bool(args[0].is_nil()))
}

fn is_int(args: &[Value]) -> Result<Value, EvalError> {
    arity("integer?", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Int(_))))
}

fn is_str(args: &[Value]) -> Result<Value, EvalError> {
    arity("string?", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Str(_))))
}

fn str(args: &[Value]) -> Result<Value, EvalError> {
    let joined: String = args.iter().map(print_plain).collect();
    Ok(Value::string(&joined))
}

fn inc(args: &[Value]) -> Result<Value, EvalError> {
    arity("inc", args, 1)?;
    int_arg("inc", &args[0])?
        .checked_add(1)
        .map(Value::Int)
        .ok_or(EvalError::Overflow)
}

fn dec(args: &[Value]) -> Result<Value, EvalError> {
    arity("dec", args, 1)?;
    int_arg("dec", &args[0])?
        .checked_sub(1)
        .map(Value::Int)
        .ok_or(EvalError::Overflow)
}

fn list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

fn vector(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::vector(args.to_vec()))
}

fn seq_arg<'a>(op: &'static str, value: &'a Value) -> Result<&'a [Value], EvalError> {
    value.as_seq().ok_or(EvalError::Type {
        op,
        expected: "list or vector",
        found: value.type_name(),
    })
}

fn count(args: &[Value]) -> Result<Value, EvalError> {
    arity("count", args, 1)?;
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        other => seq_arg("count", other)?.len(),
    };
    i64::try_from(n).map(Value::Int).map_err(|_| EvalError::Overflow)
}

fn first(args: &[Value]) -> Result<Value, EvalError> {
    arity("first", args, 1)?;
    Ok(seq_arg("first", &args[0])?.first().cloned().unwrap_or_default())
}

fn get(args: &[Value]) -> Result<Value, EvalError> {
    arity("get", args, 2)?;
    let found = match (&args[0], &args[1]) {
        (Value::Record(record), Value::Keyword(field)) => record.get(field).cloned(),
        (Value::List(items) | Value::Vector(items), Value::Int(index)) => usize::try_from(*index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned(),
        _ => None,
    };
    Ok(found.unwrap_or_default())
}

fn partial(args: &[Value]) -> Result<Value, EvalError> {
    let Some((target, rest)) = args.split_first() else {
        return Err(EvalError::Arity {
            name: "partial".into(),
            expected: 1,
            found: 0,
        });
    };
    let callable = matches!(
        target.kind(),
        SymbolKind::Function | SymbolKind::Native | SymbolKind::Type | SymbolKind::Bound
    );
    if !callable {
        return Err(EvalError::NotCallable {
            found: target.type_name(),
        });
    }
    Ok(bind(target.clone(), rest.to_vec()))
}
