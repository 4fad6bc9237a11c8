//! Syntax-tree nodes for function parameters, definitions and bodies.
//!
//! These are what a parser hands over; primitives never see them. Literals
//! are already runtime `Value`s.

use std::rc::Rc;

use crate::error::Location;
use crate::runtime::value::{Separator, Value};

// ─── Parameters ──────────────────────────────────────────────────────────────

/// `$name` or `$name: <default>`. Names are stored without the `$`.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), default: None }
    }

    pub fn optional(name: impl Into<String>, default: Expr) -> Self {
        Self { name: name.into(), default: Some(default) }
    }
}

/// Ordered parameters plus an optional trailing `$rest...`.
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
    pub rest: Option<String>,
}

impl ParamList {
    pub fn new(params: Vec<Param>, rest: Option<String>) -> Self {
        Self { params, rest }
    }

    /// Parameters without a default.
    pub fn required(&self) -> usize {
        self.params.iter().filter(|p| p.default.is_none()).count()
    }

    /// Largest accepted argument count; `None` when a rest parameter is declared.
    pub fn max_arity(&self) -> Option<usize> {
        match self.rest {
            Some(_) => None,
            None => Some(self.params.len()),
        }
    }

    pub fn accepts(&self, arity: usize) -> bool {
        arity >= self.required() && self.max_arity().is_none_or(|max| arity <= max)
    }

    /// Human-readable arity for diagnostics: `2`, `1..3`, `1+`.
    pub fn arity_label(&self) -> String {
        let required = self.required();
        match self.max_arity() {
            None => format!("{required}+"),
            Some(max) if max == required => format!("{required}"),
            Some(max) => format!("{required}..{max}"),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).chain(self.rest.clone()).collect()
    }
}

// ─── Functions ───────────────────────────────────────────────────────────────

/// `@function name($params...) { body }`
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub name: String,
    pub params: ParamList,
    pub body: Vec<Stmt>,
    pub location: Option<Location>,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `$name: value;` in the current scope.
    Assign { name: String, value: Expr },
    /// `@return value;`
    Return(Expr),
    /// A nested `@function`, visible to the rest of the enclosing body.
    Function(Rc<FunctionDef>),
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add, Sub, Mul, Div, Rem,
    Eq, NotEq, Lt, LtEq, Gt, GtEq,
    And, Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+", BinOp::Sub => "-", BinOp::Mul => "*", BinOp::Div => "/", BinOp::Rem => "%",
            BinOp::Eq => "==", BinOp::NotEq => "!=",
            BinOp::Lt => "<", BinOp::LtEq => "<=", BinOp::Gt => ">", BinOp::GtEq => ">=",
            BinOp::And => "and", BinOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// A call argument, positional or `$name: value`.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: Option<String>,
    pub value: Expr,
}

impl Arg {
    pub fn positional(value: Expr) -> Self { Self { name: None, value } }

    pub fn named(name: impl Into<String>, value: Expr) -> Self {
        Self { name: Some(name.into()), value }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    Variable { name: String, location: Option<Location> },
    List { items: Vec<Expr>, separator: Separator },
    Unary { op: UnOp, operand: Box<Expr>, location: Option<Location> },
    Binary { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr>, location: Option<Location> },
    Call { name: String, args: Vec<Arg>, location: Option<Location> },
}

impl Expr {
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable { name: name.into(), location: None }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), location: None }
    }

    pub fn call(name: impl Into<String>, args: Vec<Arg>) -> Self {
        Expr::Call { name: name.into(), args, location: None }
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Expr::Literal(v) => Some(v),
            _ => None,
        }
    }
}
