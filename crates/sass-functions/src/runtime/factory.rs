//! The only constructor surface for `Value`.
//!
//! Every value produced here is well-formed for its kind (colors are clamped
//! by `Color` itself) and is stamped with the factory's current location, so
//! results of a call carry the call site.

use std::rc::Rc;

use crate::error::Location;
use crate::runtime::value::{Separator, Value, ValueKind};
use crate::types::color::Color;
use crate::types::unit::{Number, Unit};

#[derive(Debug, Default)]
pub struct ValueFactory {
    location: Option<Location>,
    allocated: usize,
}

impl ValueFactory {
    pub fn new() -> Self { Self::default() }

    /// Replace the location stamped on new values, returning the previous one.
    pub fn set_location(&mut self, location: Option<Location>) -> Option<Location> {
        std::mem::replace(&mut self.location, location)
    }

    pub fn location(&self) -> Option<&Location> { self.location.as_ref() }

    /// Number of values built so far.
    pub fn allocated(&self) -> usize { self.allocated }

    fn make(&mut self, kind: ValueKind) -> Value {
        self.allocated += 1;
        Value::new(kind, self.location.clone())
    }

    // ─── Scalars ──────────────────────────────────────────────────────────────

    pub fn number(&mut self, value: f64, unit: Unit) -> Value {
        self.make(ValueKind::Number(Number::new(value, unit)))
    }

    pub fn unitless(&mut self, value: f64) -> Value {
        self.number(value, Unit::none())
    }

    pub fn from_number(&mut self, number: Number) -> Value {
        self.make(ValueKind::Number(number))
    }

    pub fn color(&mut self, color: Color) -> Value {
        self.make(ValueKind::Color(color))
    }

    pub fn rgba(&mut self, r: f64, g: f64, b: f64, a: f64) -> Value {
        self.color(Color::rgba(r, g, b, a))
    }

    pub fn string(&mut self, content: impl Into<Rc<str>>, quoted: bool) -> Value {
        self.make(ValueKind::String { content: content.into(), quoted })
    }

    pub fn quoted(&mut self, content: impl Into<Rc<str>>) -> Value {
        self.string(content, true)
    }

    pub fn unquoted(&mut self, content: impl Into<Rc<str>>) -> Value {
        self.string(content, false)
    }

    pub fn boolean(&mut self, value: bool) -> Value {
        self.make(ValueKind::Bool(value))
    }

    pub fn null(&mut self) -> Value {
        self.make(ValueKind::Null)
    }

    // ─── Lists ────────────────────────────────────────────────────────────────

    pub fn list(&mut self, items: Vec<Value>, separator: Separator) -> Value {
        self.make(ValueKind::List { items: items.into(), separator })
    }

    /// A list over children that are already shared with another list.
    pub fn shared_list(&mut self, items: Rc<[Value]>, separator: Separator) -> Value {
        self.make(ValueKind::List { items, separator })
    }
}
