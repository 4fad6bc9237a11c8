use crate::error::Result;
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::Value;

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("not", "$value", not)?;
    r.register("if", "$condition, $if-true, $if-false", if_)?;
    Ok(())
}

fn not(frame: &mut CallFrame<'_>) -> Result<Value> {
    let truthy = frame.arg("value")?.is_truthy();
    Ok(frame.factory.boolean(!truthy))
}

/// Both branches are already evaluated; this only selects one.
fn if_(frame: &mut CallFrame<'_>) -> Result<Value> {
    if frame.arg("condition")?.is_truthy() {
        frame.arg("if-true")
    } else {
        frame.arg("if-false")
    }
}
