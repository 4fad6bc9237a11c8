//! Numbers with symbolic units.
//!
//! A unit is a product of numerator names over a product of denominator
//! names (`px*em/s`). Multiplication and division combine and cancel units;
//! addition, subtraction, modulo and ordering require identical units or a
//! unitless side.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

// ─── Unit ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Unit {
    numer: Vec<String>,
    denom: Vec<String>,
}

impl Unit {
    pub fn none() -> Self { Self::default() }

    pub fn percent() -> Self { Self::new("%") }

    pub fn deg() -> Self { Self::new("deg") }

    /// Parse `px`, `px*em`, `px/s`, `/s` or the empty string.
    pub fn new(text: &str) -> Self {
        let (numer, denom) = match text.split_once('/') {
            Some((n, d)) => (n, d),
            None => (text, ""),
        };
        let split = |s: &str| -> Vec<String> {
            s.split('*').map(str::trim).filter(|p| !p.is_empty() && *p != "1").map(String::from).collect()
        };
        let mut unit = Self { numer: split(numer), denom: split(denom) };
        unit.cancel();
        unit
    }

    pub fn is_none(&self) -> bool { self.numer.is_empty() && self.denom.is_empty() }

    pub fn is(&self, name: &str) -> bool {
        self.denom.is_empty() && self.numer.len() == 1 && self.numer[0] == name
    }

    /// Equal units, or at least one side unitless.
    pub fn compatible(&self, other: &Unit) -> bool {
        self.is_none() || other.is_none() || self == other
    }

    pub fn mul(&self, other: &Unit) -> Unit {
        let mut numer = self.numer.clone();
        numer.extend(other.numer.iter().cloned());
        let mut denom = self.denom.clone();
        denom.extend(other.denom.iter().cloned());
        let mut unit = Unit { numer, denom };
        unit.cancel();
        unit
    }

    pub fn div(&self, other: &Unit) -> Unit {
        self.mul(&other.inverse())
    }

    fn inverse(&self) -> Unit {
        Unit { numer: self.denom.clone(), denom: self.numer.clone() }
    }

    fn cancel(&mut self) {
        let mut i = 0;
        while i < self.numer.len() {
            if let Some(j) = self.denom.iter().position(|d| *d == self.numer[i]) {
                self.denom.remove(j);
                self.numer.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.numer.join("*"))?;
        if !self.denom.is_empty() {
            write!(f, "/{}", self.denom.join("*"))?;
        }
        Ok(())
    }
}

// ─── Number ───────────────────────────────────────────────────────────────────

/// Values closer than this compare equal.
pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub value: f64,
    pub unit: Unit,
}

impl Number {
    pub fn new(value: f64, unit: Unit) -> Self { Self { value, unit } }

    pub fn unitless(value: f64) -> Self { Self { value, unit: Unit::none() } }

    pub fn is_unitless(&self) -> bool { self.unit.is_none() }

    pub fn is_integer(&self) -> bool { (self.value - self.value.round()).abs() < EPSILON }

    /// Same magnitude with a new unit; used by `round`, `abs` and friends.
    pub fn map(&self, f: impl FnOnce(f64) -> f64) -> Number {
        Number { value: f(self.value), unit: self.unit.clone() }
    }

    /// Unit of an additive result: the non-empty side wins.
    fn additive_unit(&self, other: &Number, op: &str) -> Result<Unit> {
        if !self.unit.compatible(&other.unit) {
            return Err(Error::unit(format!(
                "incompatible units `{}` and `{}` for `{op}`", self.unit, other.unit
            )));
        }
        Ok(if self.unit.is_none() { other.unit.clone() } else { self.unit.clone() })
    }

    pub fn add(&self, other: &Number) -> Result<Number> {
        let unit = self.additive_unit(other, "+")?;
        Ok(Number::new(self.value + other.value, unit))
    }

    pub fn sub(&self, other: &Number) -> Result<Number> {
        let unit = self.additive_unit(other, "-")?;
        Ok(Number::new(self.value - other.value, unit))
    }

    pub fn rem(&self, other: &Number) -> Result<Number> {
        let unit = self.additive_unit(other, "%")?;
        Ok(Number::new(self.value % other.value, unit))
    }

    pub fn mul(&self, other: &Number) -> Number {
        Number::new(self.value * other.value, self.unit.mul(&other.unit))
    }

    pub fn div(&self, other: &Number) -> Number {
        Number::new(self.value / other.value, self.unit.div(&other.unit))
    }

    pub fn compare(&self, other: &Number) -> Result<Ordering> {
        self.additive_unit(other, "comparison")?;
        if fuzzy_eq(self.value, other.value) {
            return Ok(Ordering::Equal);
        }
        self.value.partial_cmp(&other.value)
            .ok_or_else(|| Error::argument_range("cannot compare NaN"))
    }

    /// Numeric equality: compatible units and magnitudes within `EPSILON`.
    pub fn same_as(&self, other: &Number) -> bool {
        self.unit.compatible(&other.unit) && fuzzy_eq(self.value, other.value)
    }
}

pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Round to `precision` decimal places and drop trailing zeros.
pub fn format_number(value: f64, precision: usize) -> String {
    let factor = 10f64.powi(precision.min(16) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        return "0".into();
    }
    format!("{rounded}")
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_number(self.value, crate::DEFAULT_PRECISION), self.unit)
    }
}
