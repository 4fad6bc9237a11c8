//! Canonical RGBA storage plus the cylindrical HSL transforms.

use std::fmt;

use crate::types::unit::{format_number, fuzzy_eq};

/// RGB channels in [0, 255] and alpha in [0, 1]. Clamped on construction,
/// so a `Color` is always well-formed.
#[derive(Debug, Clone, Copy)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

/// Hue in [0, 360), saturation and lightness in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Color {
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r: channel(r), g: channel(g), b: channel(b), a: clamp(a, 0.0, 1.0) }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Self { Self::rgba(r, g, b, 1.0) }

    pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self::rgba(r, g, b, a)
    }

    pub fn from_hsl(hsl: Hsl, a: f64) -> Self { Self::hsla(hsl.h, hsl.s, hsl.l, a) }

    pub fn red(&self) -> f64 { self.r }
    pub fn green(&self) -> f64 { self.g }
    pub fn blue(&self) -> f64 { self.b }
    pub fn alpha(&self) -> f64 { self.a }

    pub fn to_hsl(&self) -> Hsl {
        let (h, s, l) = rgb_to_hsl(self.r, self.g, self.b);
        Hsl { h, s, l }
    }

    pub fn with_alpha(&self, a: f64) -> Self { Self::rgba(self.r, self.g, self.b, a) }

    /// Apply `f` in HSL space, keeping alpha.
    pub fn map_hsl(&self, f: impl FnOnce(Hsl) -> Hsl) -> Self {
        Self::from_hsl(f(self.to_hsl()), self.a)
    }

    /// Channels rounded to integers, as they would be emitted.
    pub fn rounded(&self) -> (u8, u8, u8) {
        (self.r.round() as u8, self.g.round() as u8, self.b.round() as u8)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rounded() == other.rounded() && fuzzy_eq(self.a, other.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rounded();
        if fuzzy_eq(self.a, 1.0) {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {})", format_number(self.a, crate::DEFAULT_PRECISION))
        }
    }
}

// ─── Conversions ──────────────────────────────────────────────────────────────

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

fn channel(v: f64) -> f64 { clamp(v, 0.0, 255.0) }

/// Wrap any angle into [0, 360).
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 { 0.0 } else { h }
}

/// RGB in [0, 255] to (hue degrees, saturation %, lightness %).
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let (r, g, b) = (r / 255.0, g / 255.0, b / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, l * 100.0);
    }

    let s = if l > 0.5 { delta / (2.0 - max - min) } else { delta / (max + min) };
    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (normalize_hue(h * 60.0), s * 100.0, l * 100.0)
}

/// (hue degrees, saturation %, lightness %) to RGB in [0, 255]. Hue wraps,
/// saturation and lightness are clamped.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = normalize_hue(h) / 360.0;
    let s = clamp(s, 0.0, 100.0) / 100.0;
    let l = clamp(l, 0.0, 100.0) / 100.0;

    let m2 = if l <= 0.5 { l * (s + 1.0) } else { l + s - l * s };
    let m1 = l * 2.0 - m2;

    (
        hue_to_rgb(m1, m2, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(m1, m2, h) * 255.0,
        hue_to_rgb(m1, m2, h - 1.0 / 3.0) * 255.0,
    )
}

fn hue_to_rgb(m1: f64, m2: f64, mut h: f64) -> f64 {
    if h < 0.0 { h += 1.0; }
    if h > 1.0 { h -= 1.0; }
    if h * 6.0 < 1.0 { m1 + (m2 - m1) * h * 6.0 }
    else if h * 2.0 < 1.0 { m2 }
    else if h * 3.0 < 2.0 { m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0 }
    else { m1 }
}
