//! Function records, the builtin registry and call dispatch.
//!
//! The registry maps a canonical name to an ordered list of candidates. A
//! name with one candidate is not overloaded; a name with several is
//! resolved by the first candidate whose arity window fits the call.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::env::{canonical_name, Env, WeakEnv};
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::Value;
use crate::syntax::ast::{FunctionDef, ParamList};
use crate::syntax::signature;

pub mod frame;
pub mod dispatch;

mod color;
mod opacity;
mod strings;
mod numbers;
mod lists;
mod introspection;
mod logic;

pub use frame::CallFrame;

/// Native implementation of a builtin.
pub type Primitive = fn(&mut CallFrame<'_>) -> Result<Value>;

// ─── Function record ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum Body {
    Native(Primitive),
    /// A `@function` and the scope it was defined in. The scope owns the
    /// record, so the handle back to it is weak.
    UserDefined { def: Rc<FunctionDef>, closure: WeakEnv },
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Native(_) => f.write_str("Native"),
            Body::UserDefined { def, .. } => write!(f, "UserDefined({})", def.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: ParamList,
    pub body: Body,
    pub overloaded: bool,
}

impl Function {
    pub fn native(name: &str, params: ParamList, primitive: Primitive) -> Self {
        Self {
            name: name.to_string(),
            params,
            body: Body::Native(primitive),
            overloaded: false,
        }
    }

    pub fn user_defined(def: Rc<FunctionDef>, closure: &Env) -> Self {
        Self {
            name: def.name.clone(),
            params: def.params.clone(),
            body: Body::UserDefined { def, closure: closure.downgrade() },
            overloaded: false,
        }
    }

    pub fn accepts(&self, arity: usize) -> bool { self.params.accepts(arity) }

    pub fn is_native(&self) -> bool { matches!(self.body, Body::Native(_)) }

    /// `name($a, $b: …, $rest...)`, for diagnostics.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self.params.params.iter()
            .map(|p| match &p.default {
                Some(d) => match d.as_literal() {
                    Some(v) => format!("${}: {v}", p.name),
                    None => format!("${}: …", p.name),
                },
                None => format!("${}", p.name),
            })
            .collect();
        if let Some(rest) = &self.params.rest {
            parts.push(format!("${rest}..."));
        }
        format!("{}({})", self.name, parts.join(", "))
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Registry {
    functions: HashMap<String, Vec<Function>>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Parse `signature` and add `primitive` as a candidate for `name`.
    /// A second candidate under the same name marks every candidate
    /// overloaded.
    pub fn register(&mut self, name: &str, signature: &str, primitive: Primitive) -> Result<()> {
        let params = signature::parse(signature, &mut ValueFactory::new())
            .map_err(|e| e.context(format!("registering `{name}`")))?;
        self.insert(Function::native(name, params, primitive));
        Ok(())
    }

    pub fn insert(&mut self, function: Function) {
        let candidates = self.functions.entry(canonical_name(&function.name)).or_default();
        candidates.push(function);
        if candidates.len() > 1 {
            candidates.iter_mut().for_each(|f| f.overloaded = true);
        }
    }

    /// Every builtin. Run once during setup; the result is read-only.
    pub fn standard() -> Result<Self> {
        let mut r = Self::new();
        color::register(&mut r)?;
        opacity::register(&mut r)?;
        strings::register(&mut r)?;
        numbers::register(&mut r)?;
        lists::register(&mut r)?;
        introspection::register(&mut r)?;
        logic::register(&mut r)?;
        tracing::debug!(functions = r.functions.len(), "built builtin registry");
        Ok(r)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&canonical_name(name))
    }

    pub fn candidates(&self, name: &str) -> &[Function] {
        self.functions.get(&canonical_name(name)).map(Vec::as_slice).unwrap_or_default()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize { self.functions.len() }

    pub fn is_empty(&self) -> bool { self.functions.is_empty() }

    /// Pick the candidate for a call with `arity` arguments.
    pub fn resolve(&self, name: &str, arity: usize) -> Result<&Function> {
        let Some(candidates) = self.functions.get(&canonical_name(name)) else {
            return Err(Error::undefined_function(name));
        };
        match candidates.as_slice() {
            [only] => Ok(only),
            many => {
                let chosen = many.iter().position(|f| f.accepts(arity))
                    .ok_or_else(|| Error::no_matching_overload(name, arity))?;
                tracing::debug!(function = name, arity, candidate = chosen, "resolved overload");
                Ok(&many[chosen])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn noop(frame: &mut CallFrame<'_>) -> Result<Value> { Ok(frame.factory.null()) }

    #[test]
    fn single_candidate_is_not_overloaded() {
        let mut r = Registry::new();
        r.register("one", "$a", noop).unwrap();
        assert!(!r.candidates("one")[0].overloaded);
        assert_eq!(r.resolve("one", 5).unwrap().name, "one");
    }

    #[test]
    fn overloads_resolve_by_arity_in_registration_order() {
        let mut r = Registry::new();
        r.register("pick", "$a, $b, $c, $d", noop).unwrap();
        r.register("pick", "$a, $b", noop).unwrap();
        r.register("pick", "$a, $b: 1", noop).unwrap();
        assert!(r.candidates("pick").iter().all(|f| f.overloaded));

        assert_eq!(r.resolve("pick", 4).unwrap().params.params.len(), 4);
        assert_eq!(r.resolve("pick", 2).unwrap().params.required(), 2);
        assert_eq!(r.resolve("pick", 1).unwrap().params.required(), 1);

        let err = r.resolve("pick", 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoMatchingOverload);
        assert!(err.message.contains("3 argument"), "{}", err.message);
    }

    #[test]
    fn unknown_name() {
        let err = Registry::new().resolve("nope", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedFunction);
    }

    #[test]
    fn names_are_canonical() {
        let mut r = Registry::new();
        r.register("adjust-hue", "$color, $degrees", noop).unwrap();
        assert!(r.contains("adjust_hue"));
        assert_eq!(r.names(), vec!["adjust-hue"]);
    }

    #[test]
    fn bad_signature_fails_registration() {
        let err = Registry::new().register("broken", "$a,,", noop).unwrap_err();
        assert_eq!(err.code, ErrorCode::Signature);
        assert!(err.message.contains("broken"));
    }

    #[test]
    fn signature_rendering() {
        let mut r = Registry::new();
        r.register("mix", "$color-1, $color-2, $weight: 50%", noop).unwrap();
        r.register("compact", "$values...", noop).unwrap();
        assert_eq!(r.candidates("mix")[0].signature(), "mix($color-1, $color-2, $weight: 50%)");
        assert_eq!(r.candidates("compact")[0].signature(), "compact($values...)");
    }

    #[test]
    fn standard_registry_builds() {
        let r = Registry::standard().unwrap();
        assert!(r.len() >= 45);
        assert_eq!(r.candidates("rgba").len(), 2);
        assert!(r.candidates("rgb").iter().all(|f| f.is_native() && !f.overloaded));
    }
}
