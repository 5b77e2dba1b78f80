// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tree-walking evaluator for Lonala unit bodies.
//!
//! A unit body is a sequence of top-level forms executed against one
//! namespace object. Every evaluation carries the [`LayerHandle`] of the code
//! being run, which is what `(parent sym)` and `(base sym)` hand to the
//! installed resolver.


use crate::namespace::{LayerHandle, Namespace};
use crate::overlay::AttributeNotFound;
use crate::reader::{Form, ReadError, read_all};
use crate::runtime::{LoadError, Runtime};
use crate::value::{Bound, Function, Record, TypeDef, Value};
use std::cell::Cell;
use std::rc::Rc;

/// Maximum evaluation depth before evaluation gives up. Nested forms and
/// function calls both count.
pub const MAX_EVAL_DEPTH: usize = 384;

/// Error raised while evaluating Lonala code.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Source could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),
    /// Symbol has no binding.
    #[error("unable to resolve symbol: {name}")]
    Unbound { name: String },
    /// Value in call position cannot be called.
    #[error("{found} is not callable")]
    NotCallable { found: &'static str },
    /// Wrong number of arguments.
    #[error("{name}: expected {expected} arguments, got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    /// Argument of the wrong type.
    #[error("{op}: expected {expected}, got {found}")]
    Type {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Integer overflow.
    #[error("integer overflow")]
    Overflow,
    /// Special form used with the wrong shape.
    #[error("malformed {form}: {reason}")]
    BadForm {
        form: &'static str,
        reason: &'static str,
    },
    /// `(ns ...)` names a different namespace than the unit being loaded.
    #[error("unit declares namespace {found}, expected {expected}")]
    NamespaceMismatch { expected: String, found: String },
    /// A namespace required by `refer` or `alias` failed to load.
    #[error("could not require {namespace}")]
    Require {
        namespace: String,
        #[source]
        source: Box<LoadError>,
    },
    /// Parent or base discovery failed.
    #[error(transparent)]
    AttributeNotFound(#[from] AttributeNotFound),
    /// Evaluation nested deeper than [`MAX_EVAL_DEPTH`].
    #[error("evaluation depth exceeded {MAX_EVAL_DEPTH}")]
    StackOverflow,
    /// A function outlived the namespace that defined it.
    #[error("namespace {name} is no longer loaded")]
    NamespaceGone { name: String },
}

/// Local bindings introduced by `let` and function parameters.
pub struct Frame {
    bindings: Vec<(Rc<str>, Value)>,
    parent: Option<Rc<Frame>>,
}

impl Frame {
    fn lookup(&self, name: &str) -> Option<Value> {
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some((_, value)) = current.bindings.iter().rev().find(|(n, _)| &**n == name) {
                return Some(value.clone());
            }
            frame = current.parent.as_deref();
        }
        None
    }
}

/// Execute a unit body against `ns`.
///
/// Top-level definitions are written into `ns`. `handle` identifies the
/// layer the source belongs to.
pub fn exec_unit(
    rt: &Runtime,
    ns: &Rc<Namespace>,
    source: &str,
    handle: LayerHandle,
) -> Result<(), EvalError> {
    let forms = read_all(source)?;
    let cx = Context {
        rt,
        ns: Rc::clone(ns),
        handle,
        depth: Cell::new(0),
    };
    for form in &forms {
        cx.eval(form, None)?;
    }
    Ok(())
}

/// Evaluate forms in the context of `ns`, returning the last result.
pub fn eval_forms(
    rt: &Runtime,
    ns: &Rc<Namespace>,
    forms: &[Form],
    handle: LayerHandle,
) -> Result<Value, EvalError> {
    let cx = Context {
        rt,
        ns: Rc::clone(ns),
        handle,
        depth: Cell::new(0),
    };
    cx.eval_body(forms, None)
}

/// Call a callable value with already-evaluated arguments.
pub fn apply(rt: &Runtime, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
    apply_at(rt, callee, args, 0)
}

fn apply_at(rt: &Runtime, callee: &Value, args: &[Value], depth: usize) -> Result<Value, EvalError> {
    if depth > MAX_EVAL_DEPTH {
        return Err(EvalError::StackOverflow);
    }
    match callee {
        Value::Function(func) => call_function(rt, func, args, depth),
        Value::Native(native) => native.call(args),
        Value::Type(ty) => {
            if args.len() != ty.fields.len() {
                return Err(EvalError::Arity {
                    name: ty.name.to_string(),
                    expected: ty.fields.len(),
                    found: args.len(),
                });
            }
            Ok(Value::Record(Rc::new(Record {
                ty: Rc::clone(ty),
                values: args.to_vec(),
            })))
        }
        Value::Bound(bound) => {
            let mut full = bound.args.clone();
            full.extend_from_slice(args);
            apply_at(rt, &bound.target, &full, depth + 1)
        }
        Value::Keyword(key) => match args {
            [Value::Record(record)] => Ok(record.get(key).cloned().unwrap_or_default()),
            [_] => Ok(Value::Nil),
            _ => Err(EvalError::Arity {
                name: format!(":{key}"),
                expected: 1,
                found: args.len(),
            }),
        },
        other => Err(EvalError::NotCallable {
            found: other.type_name(),
        }),
    }
}

fn call_function(
    rt: &Runtime,
    func: &Function,
    args: &[Value],
    depth: usize,
) -> Result<Value, EvalError> {
    if args.len() != func.params.len() {
        return Err(EvalError::Arity {
            name: func.name().unwrap_or("fn").to_owned(),
            expected: func.params.len(),
            found: args.len(),
        });
    }
    let ns = func.globals.upgrade().ok_or_else(|| EvalError::NamespaceGone {
        name: func.owner.to_string(),
    })?;
    let frame = Rc::new(Frame {
        bindings: func.params.iter().cloned().zip(args.iter().cloned()).collect(),
        parent: func.locals.clone(),
    });
    let cx = Context {
        rt,
        ns,
        handle: func.handle.clone(),
        depth: Cell::new(depth + 1),
    };
    cx.eval_body(&func.body, Some(&frame))
}

/// Evaluation context: where globals resolve and which layer is running.
struct Context<'a> {
    rt: &'a Runtime,
    ns: Rc<Namespace>,
    handle: LayerHandle,
    depth: Cell<usize>,
}

impl Context<'_> {
    fn eval(&self, form: &Form, locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        match form {
            Form::Nil => Ok(Value::Nil),
            Form::Bool(b) => Ok(Value::Bool(*b)),
            Form::Int(n) => Ok(Value::Int(*n)),
            Form::Str(s) => Ok(Value::string(s)),
            Form::Keyword(k) => Ok(Value::keyword(k)),
            Form::Symbol(name) => self.resolve(name, locals),
            Form::Vector(items) => self.nested(|| {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, locals))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::vector(values))
            }),
            Form::List(items) => self.nested(|| self.eval_list(items, locals)),
        }
    }

    fn nested(&self, f: impl FnOnce() -> Result<Value, EvalError>) -> Result<Value, EvalError> {
        let depth = self.depth.get() + 1;
        if depth > MAX_EVAL_DEPTH {
            return Err(EvalError::StackOverflow);
        }
        self.depth.set(depth);
        let result = f();
        self.depth.set(depth - 1);
        result
    }

    fn eval_body(&self, forms: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let mut result = Value::Nil;
        for form in forms {
            result = self.eval(form, locals)?;
        }
        Ok(result)
    }

    fn resolve(&self, name: &str, locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        if let Some(value) = locals.and_then(|frame| frame.lookup(name)) {
            return Ok(value);
        }
        if let Some(value) = self.ns.get(name) {
            return Ok(value);
        }
        if let Some((qualifier, member)) = split_qualified(name) {
            return self.resolve_qualified(qualifier, member, locals);
        }
        self.rt.core().get(name).ok_or_else(|| EvalError::Unbound {
            name: name.to_owned(),
        })
    }

    fn resolve_qualified(
        &self,
        qualifier: &str,
        member: &str,
        locals: Option<&Rc<Frame>>,
    ) -> Result<Value, EvalError> {
        let target = locals
            .and_then(|frame| frame.lookup(qualifier))
            .or_else(|| self.ns.get(qualifier));
        match (target, qualifier) {
            (Some(Value::Namespace(ns)), _) => ns.get(member).ok_or_else(|| EvalError::Unbound {
                name: format!("{qualifier}/{member}"),
            }),
            (_, "parent") => Ok(self.rt.resolve_parent(&self.handle, member)?),
            (_, "base") => Ok(self.rt.resolve_base(&self.handle, member)?),
            _ => Err(EvalError::Unbound {
                name: format!("{qualifier}/{member}"),
            }),
        }
    }

    fn eval_list(&self, items: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let Some((head, rest)) = items.split_first() else {
            return Ok(Value::list(Vec::new()));
        };
        if let Some(name) = head.as_symbol() {
            if let Some(result) = self.eval_special(name, rest, locals) {
                return result;
            }
        }
        let callee = self.eval(head, locals)?;
        let args = rest
            .iter()
            .map(|arg| self.eval(arg, locals))
            .collect::<Result<Vec<_>, _>>()?;
        apply_at(self.rt, &callee, &args, self.depth.get())
    }

    /// Dispatch special forms. Returns `None` if `name` is not one.
    fn eval_special(
        &self,
        name: &str,
        args: &[Form],
        locals: Option<&Rc<Frame>>,
    ) -> Option<Result<Value, EvalError>> {
        let result = match name {
            "ns" => self.eval_ns(args),
            "def" => self.eval_def(args, locals),
            "defn" => self.eval_defn(args, locals),
            "deftype" => self.eval_deftype(args),
            "fn" => self.eval_fn(None, args, locals),
            "if" => self.eval_if(args, locals),
            "do" => self.eval_body(args, locals),
            "let" => self.eval_let(args, locals),
            "quote" => match args {
                [form] => Ok(quote(form)),
                _ => Err(bad("quote", "expected exactly one form")),
            },
            "refer" => self.eval_refer(args),
            "alias" => self.eval_alias(args),
            "parent" => match args {
                [Form::Symbol(member)] => self
                    .rt
                    .resolve_parent(&self.handle, member)
                    .map_err(EvalError::from),
                _ => Err(bad("parent", "expected a symbol")),
            },
            "base" => match args {
                [Form::Symbol(member)] => self
                    .rt
                    .resolve_base(&self.handle, member)
                    .map_err(EvalError::from),
                _ => Err(bad("base", "expected a symbol")),
            },
            _ => return None,
        };
        Some(result)
    }

    fn eval_ns(&self, args: &[Form]) -> Result<Value, EvalError> {
        let (name, doc) = match args {
            [Form::Symbol(name)] => (name, None),
            [Form::Symbol(name), Form::Str(doc)] => (name, Some(doc)),
            _ => return Err(bad("ns", "expected a name and optional docstring")),
        };
        if name != self.ns.name() {
            return Err(EvalError::NamespaceMismatch {
                expected: self.ns.name().to_owned(),
                found: name.clone(),
            });
        }
        if let Some(doc) = doc {
            self.ns.define("*doc*", Value::string(doc));
        }
        Ok(Value::Nil)
    }

    fn eval_def(&self, args: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let (name, init) = match args {
            [Form::Symbol(name)] => (name, None),
            [Form::Symbol(name), init] => (name, Some(init)),
            _ => return Err(bad("def", "expected a symbol and optional value")),
        };
        let value = match init {
            Some(form) => self.eval(form, locals)?,
            None => Value::Nil,
        };
        self.ns.define(name, value.clone());
        Ok(value)
    }

    fn eval_defn(&self, args: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let Some((Form::Symbol(name), rest)) = args.split_first() else {
            return Err(bad("defn", "expected a name"));
        };
        // Optional docstring before the parameter vector.
        let rest = match rest {
            [Form::Str(_), tail @ ..] => tail,
            _ => rest,
        };
        let func = self.eval_fn(Some(name.as_str()), rest, locals)?;
        self.ns.define(name, func.clone());
        Ok(func)
    }

    fn eval_fn(
        &self,
        name: Option<&str>,
        args: &[Form],
        locals: Option<&Rc<Frame>>,
    ) -> Result<Value, EvalError> {
        let Some((Form::Vector(params), body)) = args.split_first() else {
            return Err(bad("fn", "expected a parameter vector"));
        };
        let params = params
            .iter()
            .map(|p| p.as_symbol().map(Rc::from))
            .collect::<Option<Vec<Rc<str>>>>()
            .ok_or_else(|| bad("fn", "parameters must be symbols"))?;
        Ok(Value::Function(Rc::new(Function {
            name: name.map(Rc::from),
            params: Rc::from(params),
            body: Rc::from(body),
            globals: Rc::downgrade(&self.ns),
            locals: locals.cloned(),
            owner: self.ns.name_rc(),
            handle: self.handle.clone(),
        })))
    }

    fn eval_deftype(&self, args: &[Form]) -> Result<Value, EvalError> {
        let [Form::Symbol(name), Form::Vector(fields)] = args else {
            return Err(bad("deftype", "expected a name and a field vector"));
        };
        let fields = fields
            .iter()
            .map(|f| f.as_symbol().map(Rc::from))
            .collect::<Option<Vec<Rc<str>>>>()
            .ok_or_else(|| bad("deftype", "fields must be symbols"))?;
        let ty = Value::Type(Rc::new(TypeDef {
            name: Rc::from(name.as_str()),
            fields: Rc::from(fields),
            owner: self.ns.name_rc(),
        }));
        self.ns.define(name, ty.clone());
        Ok(ty)
    }

    fn eval_if(&self, args: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let (test, then, otherwise) = match args {
            [test, then] => (test, then, None),
            [test, then, otherwise] => (test, then, Some(otherwise)),
            _ => return Err(bad("if", "expected test, then and optional else")),
        };
        if self.eval(test, locals)?.is_truthy() {
            self.eval(then, locals)
        } else {
            otherwise.map_or(Ok(Value::Nil), |form| self.eval(form, locals))
        }
    }

    fn eval_let(&self, args: &[Form], locals: Option<&Rc<Frame>>) -> Result<Value, EvalError> {
        let Some((Form::Vector(bindings), body)) = args.split_first() else {
            return Err(bad("let", "expected a binding vector"));
        };
        if bindings.len() % 2 != 0 {
            return Err(bad("let", "bindings must come in pairs"));
        }
        let mut frame = locals.cloned();
        for pair in bindings.chunks_exact(2) {
            let Form::Symbol(name) = &pair[0] else {
                return Err(bad("let", "binding names must be symbols"));
            };
            let value = self.eval(&pair[1], frame.as_ref())?;
            frame = Some(Rc::new(Frame {
                bindings: vec![(Rc::from(name.as_str()), value)],
                parent: frame,
            }));
        }
        self.eval_body(body, frame.as_ref())
    }

    fn eval_refer(&self, args: &[Form]) -> Result<Value, EvalError> {
        let Some((Form::Symbol(target), symbols)) = args.split_first() else {
            return Err(bad("refer", "expected a namespace name"));
        };
        let ns = self.require(target)?;
        for symbol in symbols {
            let Form::Symbol(member) = symbol else {
                return Err(bad("refer", "referred names must be symbols"));
            };
            let value = ns.get(member).ok_or_else(|| EvalError::Unbound {
                name: format!("{target}/{member}"),
            })?;
            self.ns.define(member, value);
        }
        Ok(Value::Nil)
    }

    fn eval_alias(&self, args: &[Form]) -> Result<Value, EvalError> {
        let [Form::Symbol(alias), Form::Symbol(target)] = args else {
            return Err(bad("alias", "expected an alias and a namespace name"));
        };
        let ns = Value::Namespace(self.require(target)?);
        self.ns.define(alias, ns.clone());
        Ok(ns)
    }

    fn require(&self, target: &str) -> Result<Rc<Namespace>, EvalError> {
        self.rt.require(target).map_err(|err| EvalError::Require {
            namespace: target.to_owned(),
            source: Box::new(err),
        })
    }
}

/// Build a partial application.
pub(crate) fn bind(target: Value, args: Vec<Value>) -> Value {
    Value::Bound(Rc::new(Bound { target, args }))
}

fn quote(form: &Form) -> Value {
    match form {
        Form::Nil => Value::Nil,
        Form::Bool(b) => Value::Bool(*b),
        Form::Int(n) => Value::Int(*n),
        Form::Str(s) => Value::string(s),
        Form::Keyword(k) => Value::keyword(k),
        Form::Symbol(s) => Value::Symbol(Rc::from(s.as_str())),
        Form::List(items) => Value::list(items.iter().map(quote).collect()),
        Form::Vector(items) => Value::vector(items.iter().map(quote).collect()),
    }
}

/// Split `alias/name` into its parts. A bare `/` is not qualified.
fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let (qualifier, member) = name.split_once('/')?;
    (!qualifier.is_empty() && !member.is_empty()).then_some((qualifier, member))
}

const fn bad(form: &'static str, reason: &'static str) -> EvalError {
    EvalError::BadForm { form, reason }
}
