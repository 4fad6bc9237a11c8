//! Operator overload registry: maps (BinOp, lhs type, rhs type) to an
//! implementation.
//!
//! Supporting an operator for a new pair of value types means calling
//! `register()` here. The interpreter only handles `and`, `or`, `==` and
//! `!=` itself, since those apply to every value.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::Value;
use crate::syntax::ast::BinOp;
use crate::types::unit::Number;

// ─── Function pointer ─────────────────────────────────────────────────────────

pub type BinopFn = fn(&Value, &Value, &mut ValueFactory) -> Result<Value>;

// ─── Registry ─────────────────────────────────────────────────────────────────

pub struct BinopRegistry {
    ops: HashMap<(BinOp, &'static str, &'static str), BinopFn>,
}

impl BinopRegistry {
    pub fn new() -> Self {
        Self { ops: HashMap::new() }
    }

    pub fn register(&mut self, op: BinOp, lhs: &'static str, rhs: &'static str, f: BinopFn) {
        self.ops.insert((op, lhs, rhs), f);
    }

    pub fn supports(&self, op: BinOp, lhs: &Value, rhs: &Value) -> bool {
        self.ops.contains_key(&(op, lhs.type_name(), rhs.type_name()))
    }

    /// Evaluate `l op r`. Returns `None` if no handler is registered for this
    /// type combination; the caller produces the error.
    pub fn eval(&self, op: BinOp, l: &Value, r: &Value, factory: &mut ValueFactory) -> Option<Result<Value>> {
        self.ops.get(&(op, l.type_name(), r.type_name())).map(|f| f(l, r, factory))
    }
}

impl Default for BinopRegistry {
    fn default() -> Self {
        let mut r = Self::new();
        register_number(&mut r);
        register_string(&mut r);
        r
    }
}

// ─── number ───────────────────────────────────────────────────────────────────

fn numbers<'v>(l: &'v Value, r: &'v Value) -> Result<(&'v Number, &'v Number)> {
    Ok((l.as_number()?, r.as_number()?))
}

fn ordering(l: &Value, r: &Value, f: &mut ValueFactory, pred: fn(Ordering) -> bool) -> Result<Value> {
    let (a, b) = numbers(l, r)?;
    let ord = a.compare(b)?;
    Ok(f.boolean(pred(ord)))
}

fn register_number(r: &mut BinopRegistry) {
    use BinOp::*;
    r.register(Add, "number", "number", |l, r, f| {
        let (a, b) = numbers(l, r)?;
        Ok(f.from_number(a.add(b)?))
    });
    r.register(Sub, "number", "number", |l, r, f| {
        let (a, b) = numbers(l, r)?;
        Ok(f.from_number(a.sub(b)?))
    });
    r.register(Mul, "number", "number", |l, r, f| {
        let (a, b) = numbers(l, r)?;
        Ok(f.from_number(a.mul(b)))
    });
    r.register(Div, "number", "number", |l, r, f| {
        let (a, b) = numbers(l, r)?;
        Ok(f.from_number(a.div(b)))
    });
    r.register(Rem, "number", "number", |l, r, f| {
        let (a, b) = numbers(l, r)?;
        Ok(f.from_number(a.rem(b)?))
    });
    r.register(Lt,   "number", "number", |l, r, f| ordering(l, r, f, Ordering::is_lt));
    r.register(LtEq, "number", "number", |l, r, f| ordering(l, r, f, Ordering::is_le));
    r.register(Gt,   "number", "number", |l, r, f| ordering(l, r, f, Ordering::is_gt));
    r.register(GtEq, "number", "number", |l, r, f| ordering(l, r, f, Ordering::is_ge));
}

// ─── string ───────────────────────────────────────────────────────────────────

/// `+` on strings concatenates; the result is quoted when the left side is.
fn concat(l: &Value, r: &Value, f: &mut ValueFactory) -> Result<Value> {
    let quoted = l.as_string().map(|(_, q)| q).unwrap_or(false);
    let text = |v: &Value| match v.as_string() {
        Ok((content, _)) => content.to_string(),
        Err(_) => v.to_string(),
    };
    Ok(f.string(format!("{}{}", text(l), text(r)), quoted))
}

fn register_string(r: &mut BinopRegistry) {
    use BinOp::*;
    r.register(Add, "string", "string", concat);
    r.register(Add, "string", "number", concat);
    r.register(Add, "number", "string", concat);
    r.register(Add, "string", "bool", concat);
}

/// Error for an operator applied to a pair of types nothing handles.
pub fn unsupported(op: BinOp, l: &Value, r: &Value) -> Error {
    Error::type_mismatch(format!(
        "undefined operation `{l} {} {r}` ({} and {})",
        op.symbol(), l.type_name(), r.type_name()
    ))
}
