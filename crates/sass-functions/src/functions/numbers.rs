use crate::error::{Error, Result};
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::Value;
use crate::types::unit::Unit;

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("percentage", "$value", percentage)?;
    r.register("round", "$value", round)?;
    r.register("ceil", "$value", ceil)?;
    r.register("floor", "$value", floor)?;
    r.register("abs", "$value", abs)?;
    Ok(())
}

fn percentage(frame: &mut CallFrame<'_>) -> Result<Value> {
    let n = frame.number("value")?;
    if !n.is_unitless() {
        return Err(Error::unit(format!("$value: `{n}` must be unitless")));
    }
    Ok(frame.factory.number(n.value * 100.0, Unit::percent()))
}

/// Apply `f` to the magnitude, keeping the unit.
fn magnitude(frame: &mut CallFrame<'_>, f: fn(f64) -> f64) -> Result<Value> {
    let n = frame.number("value")?;
    Ok(frame.factory.from_number(n.map(f)))
}

fn round(frame: &mut CallFrame<'_>) -> Result<Value> { magnitude(frame, f64::round) }

fn ceil(frame: &mut CallFrame<'_>) -> Result<Value> { magnitude(frame, f64::ceil) }

fn floor(frame: &mut CallFrame<'_>) -> Result<Value> { magnitude(frame, f64::floor) }

fn abs(frame: &mut CallFrame<'_>) -> Result<Value> { magnitude(frame, f64::abs) }
