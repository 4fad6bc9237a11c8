//! Dispatch tests: overload selection, argument binding, user-defined
//! functions and call-site locations.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use sass_functions::syntax::ast::{Arg, BinOp, Expr, FunctionDef, Param, ParamList, Stmt};
use sass_functions::syntax::signature;
use sass_functions::{
    Args, CallFrame, Color, Env, ErrorCode, Evaluator, Function, Interpreter, Location, Options,
    Registry, Result, Session, Unit, Value, ValueFactory,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn session() -> Session {
    Session::new(Options::default()).unwrap_or_else(|e| panic!("registry failed to build: {e}"))
}

/// Returns `$a + $b`, so tests can see which defaults were bound.
fn sum(frame: &mut CallFrame<'_>) -> Result<Value> {
    let a = frame.number("a")?;
    let b = frame.number("b")?;
    Ok(frame.factory.from_number(a.add(&b)?))
}

fn four(frame: &mut CallFrame<'_>) -> Result<Value> {
    Ok(frame.factory.unquoted("four"))
}

fn picky() -> Session {
    let mut r = Registry::new();
    r.register("pick", "$a, $b, $c, $d", four).unwrap();
    r.register("pick", "$a, $b: 10", sum).unwrap();
    Session::with_registry(r, Options::default())
}

fn user_fn(name: &str, params: ParamList, body: Vec<Stmt>) -> Rc<FunctionDef> {
    Rc::new(FunctionDef { name: name.into(), params, body, location: None })
}

fn params(f: &mut ValueFactory, src: &str) -> ParamList {
    signature::parse(src, f).unwrap_or_else(|e| panic!("{e}"))
}

// ─── Overloads ───────────────────────────────────────────────────────────────

#[test]
fn overload_with_unset_optional() {
    let s = picky();
    let mut f = ValueFactory::new();
    let v = s.call_builtin("pick", &Args::positional(vec![f.unitless(1.0)]), &mut f, None).unwrap();
    assert_eq!(v.to_string(), "11");

    let args = Args::positional(vec![f.null(), f.null(), f.null(), f.null()]);
    let v = s.call_builtin("pick", &args, &mut f, None).unwrap();
    assert_eq!(v.to_string(), "four");
}

#[test]
fn overload_arity_failure() {
    let s = picky();
    let mut f = ValueFactory::new();
    let args = Args::positional(vec![f.null(), f.null(), f.null()]);
    let err = s.call_builtin("pick", &args, &mut f, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoMatchingOverload);
    assert_eq!(err.message, "no overload of `pick` accepts 3 argument(s)");

    let err = session().call_builtin("rgba", &args, &mut f, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::NoMatchingOverload);
}

#[test]
fn named_arguments_count_toward_arity() {
    let s = picky();
    let mut f = ValueFactory::new();
    let args = Args::positional(vec![f.unitless(1.0)]).with_named("b", f.unitless(2.0));
    let v = s.call_builtin("pick", &args, &mut f, None).unwrap();
    assert_eq!(v.to_string(), "3");
}

#[test]
fn single_candidate_reports_arity() {
    let s = session();
    let mut f = ValueFactory::new();
    let err = s.call_builtin("rgb", &Args::positional(vec![f.unitless(1.0)]), &mut f, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::ArgumentCount);
    assert_eq!(err.message, "`rgb` takes 3 argument(s) but 1 were passed: missing $green, $blue");
}

#[test]
fn unknown_function() {
    let s = session();
    let mut f = ValueFactory::new();
    let err = s.call_builtin("frobnicate", &Args::new(), &mut f, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndefinedFunction);
}

// ─── Named arguments ─────────────────────────────────────────────────────────

#[test]
fn named_arguments_ignore_dash_underscore() {
    let s = session();
    let mut f = ValueFactory::new();
    let args = Args::new()
        .with_named("$color_1", f.color(Color::rgb(255.0, 255.0, 255.0)))
        .with_named("color-2", f.color(Color::rgb(0.0, 0.0, 0.0)))
        .with_named("weight", f.number(100.0, Unit::percent()));
    let v = s.call_builtin("mix", &args, &mut f, None).unwrap();
    assert_eq!(v.to_string(), "#ffffff");
}

#[test]
fn unknown_named_argument() {
    let s = session();
    let mut f = ValueFactory::new();
    let args = Args::positional(vec![f.unitless(1.0)]).with_named("precision", f.unitless(2.0));
    let err = s.call_builtin("round", &args, &mut f, None).unwrap_err();
    assert_eq!(err.code, ErrorCode::ArgumentCount);
    assert!(err.message.contains("no parameter named `$precision`"), "{}", err.message);
}

// ─── User-defined functions ──────────────────────────────────────────────────

#[test]
fn user_function_with_defaults_and_named_args() {
    let s = session();
    let mut f = ValueFactory::new();
    let env = Env::root();
    let double = user_fn(
        "scale",
        params(&mut f, "$n, $by: 2"),
        vec![Stmt::Return(Expr::binary(BinOp::Mul, Expr::variable("n"), Expr::variable("by")))],
    );
    let mut interp = Interpreter::new(&s);
    interp.define_function(double, &env);

    let px = f.number(4.0, Unit::new("px"));
    let v = s.call("scale", &Args::positional(vec![px.clone()]), &env, &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "8px");

    let args = Args::positional(vec![px]).with_named("by", f.unitless(3.0));
    let v = s.call("scale", &args, &env, &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "12px");
}

#[test]
fn defaults_may_refer_to_earlier_parameters() {
    let s = session();
    let mut f = ValueFactory::new();
    let env = Env::root();
    let params = ParamList::new(
        vec![Param::required("a"), Param::optional("b", Expr::binary(BinOp::Add, Expr::variable("a"), Expr::Literal(f.unitless(1.0))))],
        None,
    );
    let def = user_fn("next", params, vec![Stmt::Return(Expr::variable("b"))]);
    let mut interp = Interpreter::new(&s);
    interp.define_function(def, &env);
    let v = interp.eval(&Expr::call("next", vec![Arg::positional(Expr::Literal(f.unitless(4.0)))]), &env, &mut f).unwrap();
    assert_eq!(v.to_string(), "5");
}

#[test]
fn user_functions_close_over_their_scope() {
    let s = session();
    let mut f = ValueFactory::new();
    let defining = Env::root();
    defining.define("base", f.number(10.0, Unit::new("px")));
    let def = user_fn(
        "offset",
        params(&mut f, "$by"),
        vec![Stmt::Return(Expr::binary(BinOp::Add, Expr::variable("base"), Expr::variable("by")))],
    );
    let mut interp = Interpreter::new(&s);
    interp.define_function(def, &defining);

    // Call from a nested scope that shadows $base; the closure still wins.
    let caller = defining.child();
    caller.define("base", f.unitless(1000.0));
    let args = Args::positional(vec![f.number(5.0, Unit::new("px"))]);
    let v = s.call("offset", &args, &caller, &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "15px");
}

#[test]
fn user_functions_shadow_builtins() {
    let s = session();
    let mut f = ValueFactory::new();
    let env = Env::root();
    let def = user_fn("percentage", params(&mut f, "$x"), vec![Stmt::Return(Expr::Literal(f.unitless(42.0)))]);
    let mut interp = Interpreter::new(&s);
    interp.define_function(def, &env);

    let args = Args::positional(vec![f.unitless(0.5)]);
    let v = s.call("percentage", &args, &env, &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "42");
    let v = s.call("percentage", &args, &Env::root(), &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "50%");
}

#[test]
fn user_functions_call_builtins() {
    let s = session();
    let mut f = ValueFactory::new();
    let env = Env::root();
    let body = vec![Stmt::Return(Expr::call(
        "nth",
        vec![Arg::positional(Expr::variable("list")), Arg::positional(Expr::Literal(f.unitless(-1.0)))],
    ))];
    let def = user_fn("last", params(&mut f, "$list"), body);
    let mut interp = Interpreter::new(&s);
    interp.define_function(def, &env);

    let items = vec![f.unitless(1.0), f.unitless(2.0), f.unitless(3.0)];
    let l = f.list(items, sass_functions::Separator::Comma);
    let v = s.call("last", &Args::positional(vec![l]), &env, &mut f, &mut interp, None).unwrap();
    assert_eq!(v.to_string(), "3");
}

#[test]
fn dropped_defining_scope() {
    let s = session();
    let mut f = ValueFactory::new();
    let defining = Env::root();
    let def = user_fn("orphan", ParamList::default(), vec![Stmt::Return(Expr::Literal(f.null()))]);
    let caller = Env::root();
    caller.define_function(Function::user_defined(def, &defining));
    drop(defining);

    let err = s.call("orphan", &Args::new(), &caller, &mut f, &mut Interpreter::new(&s), None).unwrap_err();
    assert_eq!(err.code, ErrorCode::UndefinedFunction);
}

// ─── Locations ───────────────────────────────────────────────────────────────

#[test]
fn results_and_errors_carry_the_call_site() {
    let s = session();
    let mut f = ValueFactory::new();
    let loc = Location::new("styles/main.scss", 42);

    let args = Args::positional(vec![f.unitless(0.5)]);
    let v = s.call_builtin("percentage", &args, &mut f, Some(&loc)).unwrap();
    assert_eq!(v.location(), Some(&loc));

    let args = Args::positional(vec![f.quoted("x")]);
    let err = s.call_builtin("percentage", &args, &mut f, Some(&loc)).unwrap_err();
    assert_eq!(err.location, Some(loc.clone()));
    assert_eq!(err.to_string(), "[F001] styles/main.scss:42: percentage: $value: `\"x\"` is not a number");

    let err = s.call_builtin("rgb", &Args::new(), &mut f, Some(&loc)).unwrap_err();
    assert_eq!(err.location, Some(loc));
}

#[test]
fn calls_without_a_location() {
    let s = session();
    let mut f = ValueFactory::new();
    let args = Args::positional(vec![f.unitless(0.5)]);
    let v = s.call_builtin("percentage", &args, &mut f, None).unwrap();
    assert!(v.location().is_none());

    let args = Args::positional(vec![f.quoted("x")]);
    let err = s.call_builtin("percentage", &args, &mut f, None).unwrap_err();
    assert!(err.location.is_none());
    assert_eq!(err.to_string(), "[F001] percentage: $value: `\"x\"` is not a number");
}

#[test]
fn errors_inside_user_functions_keep_the_innermost_site() {
    let s = session();
    let mut f = ValueFactory::new();
    let env = Env::root();
    let inner = Location::new("_helpers.scss", 7);
    let outer = Location::new("main.scss", 3);
    let body = vec![Stmt::Return(Expr::Call {
        name: "percentage".into(),
        args: vec![Arg::positional(Expr::variable("x"))],
        location: Some(inner.clone()),
    })];
    let def = user_fn("broken", params(&mut f, "$x"), body);
    let mut interp = Interpreter::new(&s);
    interp.define_function(def, &env);

    let args = Args::positional(vec![f.number(1.0, Unit::new("px"))]);
    let err = s.call("broken", &args, &env, &mut f, &mut interp, Some(&outer)).unwrap_err();
    assert_eq!(err.code, ErrorCode::Unit);
    assert_eq!(err.location, Some(inner));
}
