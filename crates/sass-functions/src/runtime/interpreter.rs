//! Tree-walking evaluator for expressions and `@function` bodies.
//!
//! Every call goes through `functions::dispatch`, so the interpreter itself
//! contains no builtin implementations. Binary operators are looked up in
//! the `BinopRegistry`.

use crate::error::{Error, ErrorCode, Location, Result};
use crate::functions::Function;
use crate::runtime::env::{Args, Env};
use crate::runtime::factory::ValueFactory;
use crate::runtime::stack::ensure_sufficient_stack;
use crate::runtime::value::Value;
use crate::runtime::Evaluator;
use crate::syntax::ast::{Arg, BinOp, Expr, FunctionDef, Stmt, UnOp};
use crate::types::binop_registry::{self, BinopRegistry};
use crate::Session;

use std::rc::Rc;

/// Result of running a statement list.
enum Flow {
    Next,
    Return(Value),
}

pub struct Interpreter<'a> {
    session: &'a Session,
    binops: BinopRegistry,
    depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session, binops: BinopRegistry::default(), depth: 0 }
    }

    /// Current user-function nesting.
    pub fn depth(&self) -> usize { self.depth }

    /// Register `def` in `env`, closing over `env`.
    pub fn define_function(&self, def: Rc<FunctionDef>, env: &Env) {
        tracing::debug!(function = %def.name, "define");
        env.define_function(Function::user_defined(def, env));
    }

    // ─── Statements ───────────────────────────────────────────────────────────

    /// Run statements in `env` until one returns.
    pub fn run(&mut self, body: &[Stmt], env: &Env, factory: &mut ValueFactory) -> Result<Option<Value>> {
        for stmt in body {
            if let Flow::Return(v) = self.exec_stmt(stmt, env, factory)? {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Env, factory: &mut ValueFactory) -> Result<Flow> {
        match stmt {
            Stmt::Assign { name, value } => {
                let v = self.eval(value, env, factory)?;
                env.define(name, v);
                Ok(Flow::Next)
            }
            Stmt::Return(expr) => Ok(Flow::Return(self.eval(expr, env, factory)?)),
            Stmt::Function(def) => {
                self.define_function(Rc::clone(def), env);
                Ok(Flow::Next)
            }
        }
    }

    // ─── Expressions ──────────────────────────────────────────────────────────

    fn eval_unary(&mut self, op: UnOp, operand: &Value, factory: &mut ValueFactory) -> Result<Value> {
        match op {
            UnOp::Not => Ok(factory.boolean(!operand.is_truthy())),
            UnOp::Neg => {
                let n = operand.as_number()
                    .map_err(|_| Error::type_mismatch(format!("undefined operation `-{operand}`")))?;
                Ok(factory.from_number(n.map(|v| -v)))
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        env: &Env,
        factory: &mut ValueFactory,
        location: Option<&Location>,
    ) -> Result<Value> {
        let l = self.eval(lhs, env, factory)?;
        match op {
            BinOp::And if !l.is_truthy() => return Ok(l),
            BinOp::Or if l.is_truthy() => return Ok(l),
            BinOp::And | BinOp::Or => return self.eval(rhs, env, factory),
            _ => {}
        }
        let r = self.eval(rhs, env, factory)?;
        match op {
            BinOp::Eq => Ok(factory.boolean(l == r)),
            BinOp::NotEq => Ok(factory.boolean(l != r)),
            _ => self.binops.eval(op, &l, &r, factory)
                .unwrap_or_else(|| Err(binop_registry::unsupported(op, &l, &r)))
                .map_err(|e| e.at(location)),
        }
    }

    fn eval_expr(&mut self, expr: &Expr, env: &Env, factory: &mut ValueFactory) -> Result<Value> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Variable { name, location } => env.lookup(name)
                .ok_or_else(|| Error::undefined_variable(name).at(location.as_ref())),
            Expr::List { items, separator } => {
                let values = items.iter()
                    .map(|e| self.eval(e, env, factory))
                    .collect::<Result<Vec<_>>>()?;
                Ok(factory.list(values, *separator))
            }
            Expr::Unary { op, operand, location } => {
                let v = self.eval(operand, env, factory)?;
                self.eval_unary(*op, &v, factory).map_err(|e| e.at(location.as_ref()))
            }
            Expr::Binary { op, lhs, rhs, location } => {
                self.eval_binary(*op, lhs, rhs, env, factory, location.as_ref())
            }
            Expr::Call { name, args, location } => {
                self.eval_call(name, args, env, factory, location.as_ref())
            }
        }
    }

    fn eval_call(
        &mut self,
        name: &str,
        args: &[Arg],
        env: &Env,
        factory: &mut ValueFactory,
        location: Option<&Location>,
    ) -> Result<Value> {
        let mut evaluated = Args::new();
        for arg in args {
            let v = self.eval(&arg.value, env, factory)?;
            match &arg.name {
                Some(n) => evaluated.named.push((n.clone(), v)),
                None => evaluated.positional.push(v),
            }
        }
        let session = self.session;
        session.call(name, &evaluated, env, factory, self, location)
    }
}

impl Evaluator for Interpreter<'_> {
    fn eval(&mut self, expr: &Expr, env: &Env, factory: &mut ValueFactory) -> Result<Value> {
        ensure_sufficient_stack(|| self.eval_expr(expr, env, factory))
    }

    fn call_body(&mut self, def: &FunctionDef, env: &Env, factory: &mut ValueFactory) -> Result<Value> {
        let limit = self.session.options().max_depth;
        if self.depth >= limit {
            return Err(Error::new(
                ErrorCode::StackOverflow,
                format!("`{}` nested more than {limit} calls deep", def.name),
            ).at(def.location.as_ref()));
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.run(&def.body, env, factory));
        self.depth -= 1;

        match result? {
            Some(v) => Ok(v),
            None => Err(Error::new(
                ErrorCode::MissingReturn,
                format!("function `{}` finished without @return", def.name),
            ).at(def.location.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Separator;
    use crate::syntax::ast::{Param, ParamList};
    use crate::types::unit::Unit;
    use crate::Options;

    fn lit(f: &mut ValueFactory, v: f64) -> Expr { Expr::Literal(f.unitless(v)) }

    fn def(name: &str, params: ParamList, body: Vec<Stmt>) -> Rc<FunctionDef> {
        Rc::new(FunctionDef { name: name.into(), params, body, location: None })
    }

    #[test]
    fn arithmetic_and_variables() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let env = Env::root();
        env.define("x", f.number(4.0, Unit::new("px")));
        let expr = Expr::binary(BinOp::Mul, Expr::variable("x"), lit(&mut f, 3.0));
        let v = Interpreter::new(&s).eval(&expr, &env, &mut f).unwrap();
        assert_eq!(v.to_string(), "12px");
    }

    #[test]
    fn logic_short_circuits() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let env = Env::root();
        // The right side would fail if it were evaluated.
        let expr = Expr::binary(BinOp::And, Expr::Literal(f.boolean(false)), Expr::variable("missing"));
        let v = Interpreter::new(&s).eval(&expr, &env, &mut f).unwrap();
        assert_eq!(v.as_bool().unwrap(), false);

        let expr = Expr::binary(BinOp::Or, Expr::Literal(f.null()), lit(&mut f, 2.0));
        let v = Interpreter::new(&s).eval(&expr, &env, &mut f).unwrap();
        assert_eq!(v.to_string(), "2");
    }

    #[test]
    fn undefined_variable_reports_location() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let loc = Location::new("a.scss", 2);
        let expr = Expr::Variable { name: "nope".into(), location: Some(loc.clone()) };
        let err = Interpreter::new(&s).eval(&expr, &Env::root(), &mut f).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedVariable);
        assert_eq!(err.location, Some(loc));
    }

    #[test]
    fn list_expressions() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let items = vec![lit(&mut f, 1.0), lit(&mut f, 2.0)];
        let expr = Expr::List { items, separator: Separator::Comma };
        let v = Interpreter::new(&s).eval(&expr, &Env::root(), &mut f).unwrap();
        assert_eq!(v.to_string(), "1, 2");
    }

    #[test]
    fn missing_return() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let env = Env::root();
        let body = vec![Stmt::Assign { name: "x".into(), value: lit(&mut f, 1.0) }];
        let d = def("nothing", ParamList::default(), body);
        let err = Interpreter::new(&s).call_body(&d, &env, &mut f).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingReturn);
    }

    #[test]
    fn runaway_recursion_is_an_error() {
        let s = Session::new(Options::default().with_max_depth(16)).unwrap();
        let mut f = ValueFactory::new();
        let env = Env::root();
        let forever = def(
            "forever",
            ParamList::new(vec![Param::required("n")], None),
            vec![Stmt::Return(Expr::call("forever", vec![Arg::positional(Expr::variable("n"))]))],
        );
        let mut interp = Interpreter::new(&s);
        interp.define_function(forever, &env);
        let call = Expr::call("forever", vec![Arg::positional(lit(&mut f, 1.0))]);
        let err = interp.eval(&call, &env, &mut f).unwrap_err();
        assert_eq!(err.code, ErrorCode::StackOverflow);
        assert_eq!(interp.depth(), 0);
    }

    #[test]
    fn default_depth_limit_on_a_small_stack() {
        // A plain 2 MiB thread, independent of RUST_MIN_STACK.
        let worker = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let s = Session::new(Options::default()).unwrap();
                let mut f = ValueFactory::new();
                let env = Env::root();
                let forever = def(
                    "forever",
                    ParamList::new(vec![Param::required("n")], None),
                    vec![Stmt::Return(Expr::call("forever", vec![Arg::positional(Expr::variable("n"))]))],
                );
                let mut interp = Interpreter::new(&s);
                interp.define_function(forever, &env);
                let call = Expr::call("forever", vec![Arg::positional(lit(&mut f, 1.0))]);
                let err = interp.eval(&call, &env, &mut f).unwrap_err();
                (err.code, interp.depth())
            })
            .unwrap();
        assert_eq!(worker.join().unwrap(), (ErrorCode::StackOverflow, 0));
    }

    #[test]
    fn nested_definitions_are_local() {
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let env = Env::root();
        let inner = def("inner", ParamList::default(), vec![Stmt::Return(lit(&mut f, 7.0))]);
        let outer = def(
            "outer",
            ParamList::default(),
            vec![Stmt::Function(inner), Stmt::Return(Expr::call("inner", vec![]))],
        );
        let mut interp = Interpreter::new(&s);
        interp.define_function(outer, &env);
        let v = interp.eval(&Expr::call("outer", vec![]), &env, &mut f).unwrap();
        assert_eq!(v.to_string(), "7");
        assert!(env.lookup_function("inner").is_none());
    }
}
