//! List builtins. Every value is a list here: a bare value is a one-element
//! space list.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::{Separator, Value, ValueKind};

pub(super) fn register(r: &mut Registry) -> Result<()> {
    r.register("length", "$list", length)?;
    r.register("nth", "$list, $n", nth)?;
    r.register("join", "$list-1, $list-2, $separator: auto", join)?;
    r.register("append", "$list, $val, $separator: auto", append)?;
    r.register("compact", "$values...", compact)?;
    Ok(())
}

/// Read `$separator`: `comma`, `space`, or `auto` (`None`).
fn separator_arg(frame: &CallFrame<'_>) -> Result<Option<Separator>> {
    let (name, _) = frame.string("separator")?;
    match name.as_str() {
        "comma" => Ok(Some(Separator::Comma)),
        "space" => Ok(Some(Separator::Space)),
        "auto" => Ok(None),
        other => Err(Error::argument_range(format!(
            "$separator: must be `space`, `comma` or `auto`, got `{other}`"
        ))),
    }
}

/// Explicit choice, else the first list's when it has items, else the
/// second's.
fn pick_separator(explicit: Option<Separator>, first: &Value, second: &Value) -> Separator {
    explicit.unwrap_or_else(|| {
        if first.list_items().is_empty() { second.separator() } else { first.separator() }
    })
}

fn length(frame: &mut CallFrame<'_>) -> Result<Value> {
    let len = frame.arg("list")?.list_items().len();
    Ok(frame.factory.unitless(len as f64))
}

fn nth(frame: &mut CallFrame<'_>) -> Result<Value> {
    let list = frame.arg("list")?;
    let n = frame.number("n")?;
    let items = list.list_items();

    let index = n.value.round();
    if !n.is_integer() || index == 0.0 {
        return Err(Error::argument_range(format!("$n: `{n}` must be a non-zero integer")));
    }
    let len = items.len();
    // Bounds are checked before any integer cast so huge indices cannot wrap.
    if index.abs() > len as f64 {
        return Err(Error::argument_range(format!(
            "$n: index {n} is out of bounds for a list of length {len}"
        )));
    }
    let offset = index.abs() as usize;
    let position = if index > 0.0 { offset - 1 } else { len - offset };
    Ok(items[position].clone())
}

fn join(frame: &mut CallFrame<'_>) -> Result<Value> {
    let first = frame.arg("list-1")?;
    let second = frame.arg("list-2")?;
    let separator = pick_separator(separator_arg(frame)?, &first, &second);

    // Joining with nothing reuses the first list's children.
    if let ValueKind::List { items, .. } = first.kind() {
        if second.list_items().is_empty() {
            return Ok(frame.factory.shared_list(Rc::clone(items), separator));
        }
    }

    let items: Vec<Value> = first.list_items().iter()
        .chain(second.list_items())
        .cloned()
        .collect();
    Ok(frame.factory.list(items, separator))
}

fn append(frame: &mut CallFrame<'_>) -> Result<Value> {
    let list = frame.arg("list")?;
    let val = frame.arg("val")?;
    let separator = pick_separator(separator_arg(frame)?, &list, &val);

    let mut items = list.list_items().to_vec();
    items.push(val);
    Ok(frame.factory.list(items, separator))
}

/// Drop `false` and `null`. A single list argument is compacted itself.
fn compact(frame: &mut CallFrame<'_>) -> Result<Value> {
    let values = frame.arg("values")?;
    let mut source = values.list_items();
    if let [only] = source {
        if matches!(only.kind(), ValueKind::List { .. }) {
            source = only.list_items();
        }
    }
    let kept: Vec<Value> = source.iter().filter(|v| v.is_truthy()).cloned().collect();
    Ok(frame.factory.list(kept, Separator::Space))
}
