pub mod error;
pub mod syntax;
pub mod types;
pub mod runtime;
pub mod functions;

pub use error::{Error, ErrorCode, Location, Result};
pub use functions::{CallFrame, Function, Primitive, Registry};
pub use runtime::Evaluator;
pub use runtime::env::{Args, Env};
pub use runtime::factory::ValueFactory;
pub use runtime::interpreter::Interpreter;
pub use runtime::value::{Separator, Value, ValueKind};
pub use types::color::Color;
pub use types::unit::{Number, Unit};

use std::sync::Once;

/// Decimal places used when numbers are printed and no `Options` are at hand.
pub const DEFAULT_PRECISION: usize = 5;

// ─── Options ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Decimal places kept when a number is rendered (`quote`, diagnostics).
    pub precision: usize,
    /// Nested user-defined calls allowed before `StackOverflow`.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { precision: DEFAULT_PRECISION, max_depth: 256 }
    }
}

impl Options {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// The builtin registry plus options. Built once, then shared by reference
/// with every call.
#[derive(Debug)]
pub struct Session {
    registry: Registry,
    options: Options,
}

impl Session {
    /// A session over every builtin.
    pub fn new(options: Options) -> Result<Self> {
        Ok(Self { registry: Registry::standard()?, options })
    }

    pub fn with_registry(registry: Registry, options: Options) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry { &self.registry }

    pub fn options(&self) -> &Options { &self.options }

    /// Call `name` from `env` with evaluated arguments.
    pub fn call(
        &self,
        name: &str,
        args: &Args,
        env: &Env,
        factory: &mut ValueFactory,
        evaluator: &mut dyn Evaluator,
        location: Option<&Location>,
    ) -> Result<Value> {
        functions::dispatch::call(self, name, args, env, factory, evaluator, location)
    }

    /// Call a builtin from an empty scope, with the reference interpreter
    /// standing in for any non-literal defaults.
    pub fn call_builtin(
        &self,
        name: &str,
        args: &Args,
        factory: &mut ValueFactory,
        location: Option<&Location>,
    ) -> Result<Value> {
        let mut interp = Interpreter::new(self);
        self.call(name, args, &Env::root(), factory, &mut interp, location)
    }
}

// ─── Tracing ──────────────────────────────────────────────────────────────────

static TRACING_INIT: Once = Once::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG`. Does nothing when
/// `RUST_LOG` is unset, and only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        assert!(TRACING_INIT.is_completed());

        // Logging after setup must not disturb calls.
        let s = Session::new(Options::default()).unwrap();
        let mut f = ValueFactory::new();
        let v = s.call_builtin("percentage", &Args::positional(vec![f.unitless(0.25)]), &mut f, None).unwrap();
        assert_eq!(v.to_string(), "25%");
    }
}
