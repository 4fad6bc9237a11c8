use crate::error::Result;
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::Value;

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("alpha", "$color", alpha)?;
    r.register("opacity", "$color", alpha)?;
    r.register("opacify", "$color, $amount", opacify)?;
    r.register("fade-in", "$color, $amount", opacify)?;
    r.register("transparentize", "$color, $amount", transparentize)?;
    r.register("fade-out", "$color, $amount", transparentize)?;
    Ok(())
}

fn alpha(frame: &mut CallFrame<'_>) -> Result<Value> {
    let a = frame.color("color")?.alpha();
    Ok(frame.factory.unitless(a))
}

fn opacify(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let amount = frame.ranged("amount", 0.0, 1.0)?;
    Ok(frame.factory.color(color.with_alpha(color.alpha() + amount)))
}

fn transparentize(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let amount = frame.ranged("amount", 0.0, 1.0)?;
    Ok(frame.factory.color(color.with_alpha(color.alpha() - amount)))
}
