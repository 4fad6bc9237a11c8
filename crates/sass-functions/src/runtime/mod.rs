pub mod value;
pub mod factory;
pub mod env;
pub mod interpreter;
pub mod stack;

use crate::error::Result;
use crate::syntax::ast::{Expr, FunctionDef};
use env::Env;
use factory::ValueFactory;
use value::Value;

/// The evaluator seam. Dispatch calls back into it for non-literal parameter
/// defaults and to run the body of a user-defined function; `Interpreter`
/// is the in-crate implementation.
pub trait Evaluator {
    fn eval(&mut self, expr: &Expr, env: &Env, factory: &mut ValueFactory) -> Result<Value>;

    /// Run `def`'s body in `env`, where its arguments are already bound.
    fn call_body(&mut self, def: &FunctionDef, env: &Env, factory: &mut ValueFactory) -> Result<Value>;
}
