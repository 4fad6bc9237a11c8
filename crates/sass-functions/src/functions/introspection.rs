use crate::error::Result;
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::Value;

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("type-of", "$value", type_of)?;
    r.register("unit", "$number", unit)?;
    r.register("unitless", "$number", unitless)?;
    r.register("comparable", "$number-1, $number-2", comparable)?;
    Ok(())
}

fn type_of(frame: &mut CallFrame<'_>) -> Result<Value> {
    let name = frame.arg("value")?.type_name();
    Ok(frame.factory.unquoted(name))
}

fn unit(frame: &mut CallFrame<'_>) -> Result<Value> {
    let unit = frame.number("number")?.unit.to_string();
    Ok(frame.factory.quoted(unit))
}

fn unitless(frame: &mut CallFrame<'_>) -> Result<Value> {
    let bare = frame.number("number")?.is_unitless();
    Ok(frame.factory.boolean(bare))
}

fn comparable(frame: &mut CallFrame<'_>) -> Result<Value> {
    let a = frame.arg("number-1")?;
    let b = frame.arg("number-2")?;
    Ok(frame.factory.boolean(a.is_comparable(&b)))
}
