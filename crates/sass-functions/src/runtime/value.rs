//! The runtime value model shared by every primitive.
//!
//! Values are immutable once built. List children live behind an `Rc<[Value]>`
//! so rebuilding a list (join, append) shares the children instead of copying
//! them. A `Value` can only be created through `ValueFactory`.

use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Location, Result};
use crate::types::color::Color;
use crate::types::unit::{format_number, Number};

// ─── Separator ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Separator {
    Comma,
    #[default]
    Space,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Comma => "comma",
            Separator::Space => "space",
        }
    }

    fn joiner(&self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Space => " ",
        }
    }
}

// ─── Value ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum ValueKind {
    Number(Number),
    Color(Color),
    String { content: Rc<str>, quoted: bool },
    Bool(bool),
    List { items: Rc<[Value]>, separator: Separator },
    Null,
}

#[derive(Debug, Clone)]
pub struct Value {
    kind: ValueKind,
    location: Option<Location>,
}

impl Value {
    pub(crate) fn new(kind: ValueKind, location: Option<Location>) -> Self {
        Self { kind, location }
    }

    pub fn kind(&self) -> &ValueKind { &self.kind }

    /// Where the value was produced, when known.
    pub fn location(&self) -> Option<&Location> { self.location.as_ref() }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            ValueKind::Number(_)     => "number",
            ValueKind::Color(_)      => "color",
            ValueKind::String { .. } => "string",
            ValueKind::Bool(_)       => "bool",
            ValueKind::List { .. }   => "list",
            ValueKind::Null          => "null",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self.kind, ValueKind::Null) }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self.kind, ValueKind::Null | ValueKind::Bool(false))
    }

    // ─── Typed views ──────────────────────────────────────────────────────────

    fn mismatch(&self, expected: &str) -> Error {
        Error::type_mismatch(format!("`{self}` is not a {expected}"))
    }

    pub fn as_number(&self) -> Result<&Number> {
        match &self.kind {
            ValueKind::Number(n) => Ok(n),
            _ => Err(self.mismatch("number")),
        }
    }

    pub fn as_color(&self) -> Result<Color> {
        match &self.kind {
            ValueKind::Color(c) => Ok(*c),
            _ => Err(self.mismatch("color")),
        }
    }

    /// String content and whether it was quoted.
    pub fn as_string(&self) -> Result<(&str, bool)> {
        match &self.kind {
            ValueKind::String { content, quoted } => Ok((&**content, *quoted)),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match &self.kind {
            ValueKind::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("bool")),
        }
    }

    pub fn as_list(&self) -> Result<(&Rc<[Value]>, Separator)> {
        match &self.kind {
            ValueKind::List { items, separator } => Ok((items, *separator)),
            _ => Err(self.mismatch("list")),
        }
    }

    // ─── List view ────────────────────────────────────────────────────────────

    /// Children of a list; any other value is a one-element list of itself.
    pub fn list_items(&self) -> &[Value] {
        match &self.kind {
            ValueKind::List { items, .. } => &items[..],
            _ => std::slice::from_ref(self),
        }
    }

    /// Separator of a list; non-lists report the default.
    pub fn separator(&self) -> Separator {
        match &self.kind {
            ValueKind::List { separator, .. } => *separator,
            _ => Separator::default(),
        }
    }

    // ─── Relations ────────────────────────────────────────────────────────────

    /// Numbers with compatible units, or two colors.
    pub fn is_comparable(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a.unit.compatible(&b.unit),
            (ValueKind::Color(_), ValueKind::Color(_)) => true,
            _ => false,
        }
    }

    /// Render the value the way diagnostics and `quote` show it.
    pub fn inspect(&self, precision: usize) -> String {
        match &self.kind {
            ValueKind::Number(n) => format!("{}{}", format_number(n.value, precision), n.unit),
            ValueKind::Color(c) => c.to_string(),
            ValueKind::String { content, quoted: true } => {
                format!("\"{}\"", content.replace('\\', "\\\\").replace('"', "\\\""))
            }
            ValueKind::String { content, quoted: false } => content.to_string(),
            ValueKind::Bool(b) => b.to_string(),
            ValueKind::Null => "null".into(),
            ValueKind::List { items, separator } => {
                if items.is_empty() {
                    return "()".into();
                }
                items.iter()
                    .map(|v| v.inspect(precision))
                    .collect::<Vec<_>>()
                    .join(separator.joiner())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(a), ValueKind::Number(b)) => a.same_as(b),
            (ValueKind::Color(a), ValueKind::Color(b)) => a == b,
            (ValueKind::String { content: a, .. }, ValueKind::String { content: b, .. }) => a == b,
            (ValueKind::Bool(a), ValueKind::Bool(b)) => a == b,
            (ValueKind::Null, ValueKind::Null) => true,
            (
                ValueKind::List { items: a, separator: sa },
                ValueKind::List { items: b, separator: sb },
            ) => a.len() == b.len() && (sa == sb || a.len() <= 1) && a.iter().zip(b.iter()).all(|(x, y)| x == y),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect(crate::DEFAULT_PRECISION))
    }
}
