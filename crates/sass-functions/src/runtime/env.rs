//! Chained lexical scopes and argument binding.
//!
//! An `Env` is a cheap handle to one scope; scopes point at their parent, so
//! a user-defined function can keep its defining scope alive as a closure.
//! Reads walk outward. Writes only ever touch the innermost scope.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::functions::Function;
use crate::runtime::Evaluator;
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::{Separator, Value};
use crate::syntax::ast::{Expr, ParamList};

/// Sass treats `$foo_bar` and `$foo-bar` (and function names alike) as the
/// same identifier.
pub fn canonical_name(name: &str) -> String {
    name.trim_start_matches('$').replace('_', "-")
}

// ─── Args ─────────────────────────────────────────────────────────────────────

/// Already-evaluated call arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub named: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self { Self::default() }

    pub fn positional(values: Vec<Value>) -> Self {
        Self { positional: values, named: Vec::new() }
    }

    pub fn with_named(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.push((name.into(), value));
        self
    }

    /// Total argument count used for overload selection.
    pub fn len(&self) -> usize { self.positional.len() + self.named.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self { Self::positional(values) }
}

// ─── Scope ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Scope {
    vars: RefCell<HashMap<String, Value>>,
    functions: RefCell<HashMap<String, Rc<Function>>>,
    parent: Option<Env>,
}

#[derive(Clone)]
pub struct Env(Rc<Scope>);

/// Non-owning handle to a scope, held by functions defined in that scope.
#[derive(Clone)]
pub struct WeakEnv(Weak<Scope>);

impl WeakEnv {
    pub fn upgrade(&self) -> Option<Env> { self.0.upgrade().map(Env) }
}

impl Env {
    /// A scope with no parent.
    pub fn root() -> Self { Self(Rc::new(Scope::default())) }

    /// A new innermost scope whose lookups fall back to `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(Scope { parent: Some(self.clone()), ..Scope::default() }))
    }

    pub fn parent(&self) -> Option<&Env> { self.0.parent.as_ref() }

    pub fn downgrade(&self) -> WeakEnv { WeakEnv(Rc::downgrade(&self.0)) }

    /// Number of scopes between this one and the root.
    pub fn depth(&self) -> usize {
        self.parent().map_or(0, |p| p.depth() + 1)
    }

    // ─── Variables ────────────────────────────────────────────────────────────

    /// Bind in this scope, shadowing any outer binding of the same name.
    pub fn define(&self, name: &str, value: Value) {
        self.0.vars.borrow_mut().insert(canonical_name(name), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        let key = canonical_name(name);
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(v) = env.0.vars.borrow().get(&key) {
                return Some(v.clone());
            }
            scope = env.parent();
        }
        None
    }

    /// Lookup restricted to this scope.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.vars.borrow().get(&canonical_name(name)).cloned()
    }

    // ─── Functions ────────────────────────────────────────────────────────────

    pub fn define_function(&self, function: Function) {
        self.0.functions.borrow_mut().insert(canonical_name(&function.name), Rc::new(function));
    }

    pub fn lookup_function(&self, name: &str) -> Option<Rc<Function>> {
        let key = canonical_name(name);
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(f) = env.0.functions.borrow().get(&key) {
                return Some(Rc::clone(f));
            }
            scope = env.parent();
        }
        None
    }

    // ─── Binding ──────────────────────────────────────────────────────────────

    /// Bind `args` to `params` in this scope.
    ///
    /// Positional arguments fill parameters in order, named arguments fill by
    /// name, missing parameters take their default, and a rest parameter
    /// collects surplus positional arguments into a comma list. Defaults that
    /// are not literals are evaluated in this scope, so they can refer to the
    /// parameters before them.
    pub fn bind(
        &self,
        function: &str,
        params: &ParamList,
        args: &Args,
        factory: &mut ValueFactory,
        evaluator: &mut dyn Evaluator,
    ) -> Result<()> {
        let fixed = params.params.len();
        let supplied = args.len();
        let arity_error = |detail: String| {
            Error::argument_count(format!(
                "`{function}` takes {} argument(s) but {supplied} were passed: {detail}",
                params.arity_label()
            ))
        };

        if args.positional.len() > fixed && params.rest.is_none() {
            return Err(arity_error(format!("{} too many", args.positional.len() - fixed)));
        }

        let mut slots: Vec<Option<Value>> = vec![None; fixed];
        for (slot, value) in slots.iter_mut().zip(&args.positional) {
            *slot = Some(value.clone());
        }

        for (name, value) in &args.named {
            let key = canonical_name(name);
            let Some(index) = params.params.iter().position(|p| canonical_name(&p.name) == key) else {
                return Err(arity_error(format!("no parameter named `${key}`")));
            };
            if slots[index].is_some() {
                return Err(arity_error(format!("`${key}` was passed both by position and by name")));
            }
            slots[index] = Some(value.clone());
        }

        let mut missing = Vec::new();
        for (param, slot) in params.params.iter().zip(slots) {
            let value = match (slot, &param.default) {
                (Some(v), _) => v,
                (None, Some(Expr::Literal(v))) => v.clone(),
                (None, Some(expr)) => evaluator.eval(expr, self, factory)?,
                (None, None) => {
                    missing.push(format!("${}", param.name));
                    continue;
                }
            };
            tracing::trace!(function, param = %param.name, %value, "bind");
            self.define(&param.name, value);
        }
        if !missing.is_empty() {
            return Err(arity_error(format!("missing {}", missing.join(", "))));
        }

        if let Some(rest) = &params.rest {
            let extra = args.positional.iter().skip(fixed).cloned().collect();
            let list = factory.list(extra, Separator::Comma);
            self.define(rest, list);
        }
        Ok(())
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vars: Vec<String> = self.0.vars.borrow().keys().cloned().collect();
        vars.sort();
        f.debug_struct("Env")
            .field("depth", &self.depth())
            .field("vars", &vars)
            .finish_non_exhaustive()
    }
}
