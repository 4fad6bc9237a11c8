//! What a primitive sees while it runs: its bound arguments, the caller's
//! scope, the value factory and the call site.

use crate::error::{Error, Location, Result};
use crate::runtime::env::Env;
use crate::runtime::factory::ValueFactory;
use crate::runtime::value::Value;
use crate::types::color::Color;
use crate::types::unit::{format_number, Number};
use crate::Options;

pub struct CallFrame<'a> {
    pub name: &'a str,
    /// Scope holding exactly the bound parameters.
    pub args: &'a Env,
    pub caller: &'a Env,
    pub factory: &'a mut ValueFactory,
    pub location: Option<&'a Location>,
    pub options: &'a Options,
}

impl CallFrame<'_> {
    /// The value bound to `param` (without `$`).
    pub fn arg(&self, param: &str) -> Result<Value> {
        self.args.get_local(param)
            .ok_or_else(|| Error::argument_count(format!("missing argument ${param}")))
    }

    pub fn number(&self, param: &str) -> Result<Number> {
        self.arg(param)?.as_number().cloned().map_err(|e| e.context(format!("${param}")))
    }

    pub fn color(&self, param: &str) -> Result<Color> {
        self.arg(param)?.as_color().map_err(|e| e.context(format!("${param}")))
    }

    /// String content and quotedness.
    pub fn string(&self, param: &str) -> Result<(String, bool)> {
        let value = self.arg(param)?;
        let (content, quoted) = value.as_string().map_err(|e| e.context(format!("${param}")))?;
        Ok((content.to_string(), quoted))
    }

    /// `None` when the argument is `null`.
    pub fn optional_number(&self, param: &str) -> Result<Option<Number>> {
        let value = self.arg(param)?;
        if value.is_null() {
            return Ok(None);
        }
        value.as_number().cloned().map(Some).map_err(|e| e.context(format!("${param}")))
    }

    /// Magnitude of a number argument that must lie in `[lo, hi]`.
    pub fn ranged(&self, param: &str, lo: f64, hi: f64) -> Result<f64> {
        let n = self.number(param)?;
        check_range(param, &n, lo, hi)
    }

    /// Render a value with the configured precision.
    pub fn inspect(&self, value: &Value) -> String {
        value.inspect(self.options.precision)
    }
}

pub(crate) fn check_range(param: &str, n: &Number, lo: f64, hi: f64) -> Result<f64> {
    if n.value < lo || n.value > hi || n.value.is_nan() {
        let unit = n.unit.to_string();
        return Err(Error::argument_range(format!(
            "${param}: {n} must be between {}{unit} and {}{unit}",
            format_number(lo, 5), format_number(hi, 5)
        )));
    }
    Ok(n.value)
}
