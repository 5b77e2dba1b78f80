// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{Value, print_plain};
use crate::namespace::Namespace;
use crate::runtime::Runtime;

fn show(src: &str) -> String {
    let rt = Runtime::new(Vec::new());
    let ns = Namespace::new("app.core", None, "source");
    rt.eval_in(&ns, src).unwrap().to_string()
}

#[test]
fn print_atoms() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::keyword("k").to_string(), ":k");
}

#[test]
fn print_string_escapes() {
    assert_eq!(Value::string("a\"b\n").to_string(), "\"a\\\"b\\n\"");
}

#[test]
fn print_collections() {
    assert_eq!(show("(list 1 2 3)"), "(1 2 3)");
    assert_eq!(show("[1 \"a\" :b]"), "[1 \"a\" :b]");
    assert_eq!(show("'(a [b])"), "(a [b])");
}

#[test]
fn print_record() {
    assert_eq!(
        show("(do (deftype Point [x y]) (Point 1 2))"),
        "#Point{:x 1, :y 2}"
    );
}

#[test]
fn print_callables() {
    assert_eq!(show("(defn f [] 1)"), "#<fn app.core/f>");
    assert_eq!(show("(fn [] 1)"), "#<fn app.core>");
    assert_eq!(show("(deftype T [a])"), "#<type app.core/T>");
    assert_eq!(show("+"), "#<native +>");
    assert_eq!(show("(partial + 1)"), "#<bound #<native +>>");
}

#[test]
fn print_plain_strips_quotes() {
    assert_eq!(print_plain(&Value::string("hi")), "hi");
    assert_eq!(print_plain(&Value::Nil), "");
    assert_eq!(print_plain(&Value::Int(3)), "3");
}
