// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the runtime load protocol.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{Finder, LoadError, NamespaceSpec, PathFinder, Runtime, UnitLocation};
use crate::eval::EvalError;
use crate::namespace::SymbolTable;
use crate::reader::{ParseError, ReadError};
use crate::value::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, source: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, source).unwrap();
}

fn runtime(lib: &TempDir) -> Runtime {
    Runtime::new(vec![lib.path().to_path_buf()])
}

#[test]
fn default_finders() {
    let rt = Runtime::new(Vec::new());
    assert_eq!(rt.finder_names(), vec!["native", "path"]);
    assert!(rt.present("lona.core").is_some());
}

#[test]
fn require_plain_unit() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "greet.lona", "(ns greet) (defn hi [n] (str \"hi \" n))");
    let rt = runtime(&lib);

    let ns = rt.require("greet").unwrap();
    assert_eq!(ns.name(), "greet");
    assert_eq!(
        rt.eval_in(&ns, "(hi \"bob\")").unwrap(),
        Value::string("hi bob")
    );
    assert!(Rc::ptr_eq(&ns, &rt.require("greet").unwrap()));
}

#[test]
fn require_package_and_sub_namespace() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "app/init.lona", "(ns app) (def version 1)");
    write(lib.path(), "app/util.lona", "(ns app.util) (def x 2)");
    let rt = runtime(&lib);

    let util = rt.require("app.util").unwrap();
    assert_eq!(util.get("x"), Some(Value::Int(2)));
    assert_eq!(util.get("*package*"), Some(Value::string("app")));
    let app = rt.present("app").unwrap();
    assert!(app.location().unwrap().is_package());
}

#[test]
fn sub_namespace_of_plain_unit_is_rejected() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "flat.lona", "(ns flat)");
    let rt = runtime(&lib);
    assert!(matches!(
        rt.require("flat.inner"),
        Err(LoadError::NotAPackage { .. })
    ));
}

#[test]
fn missing_namespace() {
    let rt = Runtime::new(Vec::new());
    assert!(matches!(
        rt.require("nowhere"),
        Err(LoadError::NotFound { .. })
    ));
}

#[test]
fn failed_body_is_not_left_present() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "broken.lona", "(ns broken) (undefined-fn)");
    let rt = runtime(&lib);

    let err = rt.require("broken").unwrap_err();
    assert!(matches!(err, LoadError::Eval { ref namespace, .. } if namespace == "broken"));
    assert!(rt.present("broken").is_none());
}

#[test]
fn deeply_nested_body_is_a_load_error() {
    let lib = TempDir::new().unwrap();
    let body = format!("(ns deep) (def x {}1{})", "(do ".repeat(2000), ")".repeat(2000));
    write(lib.path(), "deep.lona", &body);
    let rt = runtime(&lib);

    let err = rt.require("deep").unwrap_err();
    assert!(matches!(
        err,
        LoadError::Eval { ref source, .. }
            if matches!(**source, EvalError::Read(ReadError::Parse(ParseError::TooDeep { .. })))
    ));
    assert!(rt.present("deep").is_none());
}

#[test]
fn unit_sees_itself_while_loading() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "a.lona", "(ns a) (def x 1) (alias b b)");
    write(lib.path(), "b.lona", "(ns b) (alias a a) (def y a/x)");
    let rt = runtime(&lib);
    rt.require("a").unwrap();
    assert_eq!(rt.present("b").unwrap().get("y"), Some(Value::Int(1)));
}

#[test]
fn reload_creates_new_object() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "r.lona", "(ns r) (def x 1)");
    let rt = runtime(&lib);
    let first = rt.require("r").unwrap();
    write(lib.path(), "r.lona", "(ns r) (def x 2)");
    let second = rt.reload("r").unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.get("x"), Some(Value::Int(2)));
}

#[test]
fn native_namespaces() {
    let rt = Runtime::new(Vec::new());
    let mut symbols = SymbolTable::new();
    symbols.insert("pi".into(), Value::Int(3));
    rt.define_native("math", symbols);
    let ns = rt.require("math").unwrap();
    assert_eq!(ns.get("pi"), Some(Value::Int(3)));
    assert_eq!(ns.get("*loader*"), Some(Value::keyword("native")));
}

struct Nothing;

impl Finder for Nothing {
    fn name(&self) -> &str {
        "nothing"
    }

    fn find_spec(&self, _: &str, _: Option<&[PathBuf]>, _: &Runtime) -> Option<NamespaceSpec> {
        None
    }
}

#[test]
fn finder_insertion_is_clamped() {
    let rt = Runtime::new(Vec::new());
    let finder: Rc<dyn Finder> = Rc::new(Nothing);
    rt.insert_finder(99, Rc::clone(&finder));
    assert_eq!(rt.finder_names(), vec!["native", "path", "nothing"]);
    assert!(rt.has_finder(&finder));
    assert!(rt.remove_finder(&finder));
    assert!(!rt.remove_finder(&finder));
    assert_eq!(rt.finder_names(), vec!["native", "path"]);
}

#[test]
fn locate_prefers_package() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "p/init.lona", "(ns p)");
    write(lib.path(), "p.lona", "(ns p)");
    let libs = [lib.path().to_path_buf()];
    let loc = PathFinder::locate("p", None, &libs).unwrap();
    assert!(loc.is_package());
    assert_eq!(loc.package_dir(), Some(lib.path().join("p").as_path()));
}

#[test]
fn locate_with_search_path_uses_last_segment() {
    let lib = TempDir::new().unwrap();
    write(lib.path(), "p/q.lona", "(ns p.q)");
    let search = [lib.path().join("p")];
    let loc = PathFinder::locate("p.q", Some(&search), &[]).unwrap();
    assert_eq!(loc.path(), lib.path().join("p/q.lona"));
}

#[test]
fn relocate_mirrors_layout() {
    let plain = UnitLocation::new(PathBuf::from("/lib/a/b/c.lona"), false);
    assert_eq!(
        plain.relocate("a.b.c", Path::new("/r")).path(),
        Path::new("/r/a/b/c.lona")
    );
    let package = UnitLocation::new(PathBuf::from("/lib/a/b/init.lona"), true);
    let moved = package.relocate("a.b", Path::new("/r"));
    assert_eq!(moved.path(), Path::new("/r/a/b/init.lona"));
    assert!(moved.is_package());
}
