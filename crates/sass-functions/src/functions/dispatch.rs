//! Resolve one call site to one function record and run it.

use crate::error::{Error, Location, Result};
use crate::functions::{Body, CallFrame, Function, Primitive};
use crate::runtime::env::{Args, Env};
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::Value;
use crate::runtime::Evaluator;
use crate::Session;

/// Call `name` with already-evaluated `args` from scope `env`.
///
/// User-defined functions visible from `env` shadow builtins. Builtins are
/// resolved through the session's registry, by arity when overloaded.
#[tracing::instrument(level = "debug", skip_all, fields(function = name, arity = args.len()))]
pub fn call(
    session: &Session,
    name: &str,
    args: &Args,
    env: &Env,
    factory: &mut ValueFactory,
    evaluator: &mut dyn Evaluator,
    location: Option<&Location>,
) -> Result<Value> {
    if let Some(user) = env.lookup_function(name) {
        tracing::debug!("user-defined");
        return invoke(session, &user, args, env, factory, evaluator, location);
    }
    let function = session.registry().resolve(name, args.len()).map_err(|e| e.at(location))?;
    invoke(session, function, args, env, factory, evaluator, location)
}

fn invoke(
    session: &Session,
    function: &Function,
    args: &Args,
    env: &Env,
    factory: &mut ValueFactory,
    evaluator: &mut dyn Evaluator,
    location: Option<&Location>,
) -> Result<Value> {
    match &function.body {
        Body::Native(primitive) => {
            call_native(session, function, *primitive, args, env, factory, evaluator, location)
        }
        Body::UserDefined { def, closure } => {
            let Some(defining) = closure.upgrade() else {
                return Err(Error::undefined_function(&function.name).at(location));
            };
            let scope = defining.child();
            scope.bind(&function.name, &function.params, args, factory, evaluator)
                .map_err(|e| e.at(location))?;
            evaluator.call_body(def, &scope, factory).map_err(|e| e.at(location))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn call_native(
    session: &Session,
    function: &Function,
    primitive: Primitive,
    args: &Args,
    caller: &Env,
    factory: &mut ValueFactory,
    evaluator: &mut dyn Evaluator,
    location: Option<&Location>,
) -> Result<Value> {
    let bound = Env::root();
    bound.bind(&function.name, &function.params, args, factory, evaluator)
        .map_err(|e| e.at(location))?;

    let previous = factory.set_location(location.cloned());
    let mut frame = CallFrame {
        name: &function.name,
        args: &bound,
        caller,
        factory: &mut *factory,
        location,
        options: session.options(),
    };
    let result = primitive(&mut frame).map_err(|e| e.context(&function.name).at(location));
    factory.set_location(previous);
    result
}
