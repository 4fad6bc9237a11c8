use crate::error::Result;
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::{Value, ValueKind};

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("unquote", "$string", unquote)?;
    r.register("quote", "$string", quote)?;
    Ok(())
}

/// Strings lose their quotes; anything else comes back unchanged.
fn unquote(frame: &mut CallFrame<'_>) -> Result<Value> {
    let value = frame.arg("string")?;
    match value.kind() {
        ValueKind::String { content, quoted: true } => {
            let content = content.clone();
            Ok(frame.factory.unquoted(content))
        }
        _ => Ok(value),
    }
}

/// Strings gain quotes; other values are quoted as they would be printed.
fn quote(frame: &mut CallFrame<'_>) -> Result<Value> {
    let value = frame.arg("string")?;
    match value.kind() {
        ValueKind::String { quoted: true, .. } => Ok(value),
        ValueKind::String { content, quoted: false } => {
            let content = content.clone();
            Ok(frame.factory.quoted(content))
        }
        _ => {
            let text = frame.inspect(&value);
            Ok(frame.factory.quoted(text))
        }
    }
}
