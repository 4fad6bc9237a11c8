//! RGB, HSL and whole-color builtins.

use crate::error::{Error, Result};
use crate::functions::frame::check_range;
use crate::functions::{CallFrame, Registry};
use crate::runtime::value::Value;
use crate::types::color::{Color, Hsl};
use crate::types::unit::{Number, Unit};

pub(super) fn register(r: &mut Registry) -> Result<()> {
    // RGB
    r.register("rgb", "$red, $green, $blue", rgb)?;
    r.register("rgba", "$red, $green, $blue, $alpha", rgba_channels)?;
    r.register("rgba", "$color, $alpha", rgba_color)?;
    r.register("red", "$color", red)?;
    r.register("green", "$color", green)?;
    r.register("blue", "$color", blue)?;
    r.register("mix", "$color-1, $color-2, $weight: 50%", mix)?;

    // HSL
    r.register("hsl", "$hue, $saturation, $lightness", hsl)?;
    r.register("hsla", "$hue, $saturation, $lightness, $alpha", hsla)?;
    r.register("hue", "$color", hue)?;
    r.register("saturation", "$color", saturation)?;
    r.register("lightness", "$color", lightness)?;
    r.register("adjust-hue", "$color, $degrees", adjust_hue)?;
    r.register("lighten", "$color, $amount", lighten)?;
    r.register("darken", "$color, $amount", darken)?;
    r.register("saturate", "$color, $amount", saturate)?;
    r.register("desaturate", "$color, $amount", desaturate)?;
    r.register("grayscale", "$color", grayscale)?;
    r.register("complement", "$color", complement)?;
    r.register("invert", "$color, $weight: 100%", invert)?;

    // Components
    const COMPONENTS: &str = "$color, $red: null, $green: null, $blue: null, \
        $hue: null, $saturation: null, $lightness: null, $alpha: null";
    r.register("adjust-color", COMPONENTS, adjust_color)?;
    r.register("change-color", COMPONENTS, change_color)?;
    Ok(())
}

// ─── Argument helpers ─────────────────────────────────────────────────────────

/// An RGB channel: unitless in [0, 255] or a percentage of 255.
fn channel(frame: &CallFrame<'_>, param: &str) -> Result<f64> {
    let n = frame.number(param)?;
    if n.unit.is("%") {
        Ok(n.value * 255.0 / 100.0)
    } else if n.is_unitless() {
        Ok(n.value)
    } else {
        Err(Error::unit(format!("${param}: `{n}` must be unitless or a percentage")))
    }
}

/// Alpha: unitless in [0, 1] or a percentage.
fn alpha_channel(frame: &CallFrame<'_>, param: &str) -> Result<f64> {
    let n = frame.number(param)?;
    if n.unit.is("%") {
        Ok(n.value / 100.0)
    } else if n.is_unitless() {
        Ok(n.value)
    } else {
        Err(Error::unit(format!("${param}: `{n}` must be unitless or a percentage")))
    }
}

fn color_value(frame: &mut CallFrame<'_>, color: Color) -> Result<Value> {
    Ok(frame.factory.color(color))
}

/// Weighted average of two colors; `p` is the share of `c1` in [0, 1].
pub(crate) fn mix_colors(c1: Color, c2: Color, p: f64) -> Color {
    let w = 2.0 * p - 1.0;
    let a = c1.alpha() - c2.alpha();
    let w1 = (if w * a == -1.0 { w } else { (w + a) / (1.0 + w * a) } + 1.0) / 2.0;
    let w2 = 1.0 - w1;
    Color::rgba(
        c1.red() * w1 + c2.red() * w2,
        c1.green() * w1 + c2.green() * w2,
        c1.blue() * w1 + c2.blue() * w2,
        c1.alpha() * p + c2.alpha() * (1.0 - p),
    )
}

// ─── RGB ──────────────────────────────────────────────────────────────────────

fn rgb(frame: &mut CallFrame<'_>) -> Result<Value> {
    let (r, g, b) = (channel(frame, "red")?, channel(frame, "green")?, channel(frame, "blue")?);
    color_value(frame, Color::rgb(r, g, b))
}

fn rgba_channels(frame: &mut CallFrame<'_>) -> Result<Value> {
    let (r, g, b) = (channel(frame, "red")?, channel(frame, "green")?, channel(frame, "blue")?);
    let a = alpha_channel(frame, "alpha")?;
    color_value(frame, Color::rgba(r, g, b, a))
}

fn rgba_color(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let a = alpha_channel(frame, "alpha")?;
    color_value(frame, color.with_alpha(a))
}

fn red(frame: &mut CallFrame<'_>) -> Result<Value> {
    let c = frame.color("color")?;
    Ok(frame.factory.unitless(c.red().round()))
}

fn green(frame: &mut CallFrame<'_>) -> Result<Value> {
    let c = frame.color("color")?;
    Ok(frame.factory.unitless(c.green().round()))
}

fn blue(frame: &mut CallFrame<'_>) -> Result<Value> {
    let c = frame.color("color")?;
    Ok(frame.factory.unitless(c.blue().round()))
}

fn mix(frame: &mut CallFrame<'_>) -> Result<Value> {
    let c1 = frame.color("color-1")?;
    let c2 = frame.color("color-2")?;
    let weight = frame.ranged("weight", 0.0, 100.0)?;
    color_value(frame, mix_colors(c1, c2, weight / 100.0))
}

// ─── HSL ──────────────────────────────────────────────────────────────────────

fn hsl(frame: &mut CallFrame<'_>) -> Result<Value> {
    let h = frame.number("hue")?.value;
    let s = frame.number("saturation")?.value;
    let l = frame.number("lightness")?.value;
    color_value(frame, Color::hsla(h, s, l, 1.0))
}

fn hsla(frame: &mut CallFrame<'_>) -> Result<Value> {
    let h = frame.number("hue")?.value;
    let s = frame.number("saturation")?.value;
    let l = frame.number("lightness")?.value;
    let a = alpha_channel(frame, "alpha")?;
    color_value(frame, Color::hsla(h, s, l, a))
}

fn hue(frame: &mut CallFrame<'_>) -> Result<Value> {
    let h = frame.color("color")?.to_hsl().h;
    Ok(frame.factory.number(h, Unit::deg()))
}

fn saturation(frame: &mut CallFrame<'_>) -> Result<Value> {
    let s = frame.color("color")?.to_hsl().s;
    Ok(frame.factory.number(s, Unit::percent()))
}

fn lightness(frame: &mut CallFrame<'_>) -> Result<Value> {
    let l = frame.color("color")?.to_hsl().l;
    Ok(frame.factory.number(l, Unit::percent()))
}

fn adjust_hue(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let degrees = frame.number("degrees")?.value;
    color_value(frame, color.map_hsl(|hsl| Hsl { h: hsl.h + degrees, ..hsl }))
}

/// Shift one HSL component by a `$amount` in [0, 100], clamping the result.
fn shift(frame: &mut CallFrame<'_>, apply: impl FnOnce(Hsl, f64) -> Hsl) -> Result<Value> {
    let color = frame.color("color")?;
    let amount = frame.ranged("amount", 0.0, 100.0)?;
    color_value(frame, color.map_hsl(|hsl| apply(hsl, amount)))
}

fn percent(v: f64) -> f64 { v.clamp(0.0, 100.0) }

fn lighten(frame: &mut CallFrame<'_>) -> Result<Value> {
    shift(frame, |hsl, amount| Hsl { l: percent(hsl.l + amount), ..hsl })
}

fn darken(frame: &mut CallFrame<'_>) -> Result<Value> {
    shift(frame, |hsl, amount| Hsl { l: percent(hsl.l - amount), ..hsl })
}

fn saturate(frame: &mut CallFrame<'_>) -> Result<Value> {
    shift(frame, |hsl, amount| Hsl { s: percent(hsl.s + amount), ..hsl })
}

fn desaturate(frame: &mut CallFrame<'_>) -> Result<Value> {
    shift(frame, |hsl, amount| Hsl { s: percent(hsl.s - amount), ..hsl })
}

fn grayscale(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    color_value(frame, color.map_hsl(|hsl| Hsl { s: 0.0, ..hsl }))
}

fn complement(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    color_value(frame, color.map_hsl(|hsl| Hsl { h: hsl.h + 180.0, ..hsl }))
}

fn invert(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let weight = frame.ranged("weight", 0.0, 100.0)?;
    let inverse = Color::rgba(
        255.0 - color.red(),
        255.0 - color.green(),
        255.0 - color.blue(),
        color.alpha(),
    );
    color_value(frame, mix_colors(inverse, color, weight / 100.0))
}

// ─── adjust-color / change-color ──────────────────────────────────────────────

/// The optional component arguments of `adjust-color` and `change-color`.
struct Components {
    red: Option<Number>,
    green: Option<Number>,
    blue: Option<Number>,
    hue: Option<Number>,
    saturation: Option<Number>,
    lightness: Option<Number>,
    alpha: Option<Number>,
}

impl Components {
    fn read(frame: &CallFrame<'_>) -> Result<Self> {
        let c = Self {
            red: frame.optional_number("red")?,
            green: frame.optional_number("green")?,
            blue: frame.optional_number("blue")?,
            hue: frame.optional_number("hue")?,
            saturation: frame.optional_number("saturation")?,
            lightness: frame.optional_number("lightness")?,
            alpha: frame.optional_number("alpha")?,
        };
        let rgb = c.red.is_some() || c.green.is_some() || c.blue.is_some();
        let hsl = c.hue.is_some() || c.saturation.is_some() || c.lightness.is_some();
        if rgb && hsl {
            return Err(Error::argument_range("cannot specify both RGB and HSL values"));
        }
        Ok(c)
    }

    fn is_rgb(&self) -> bool {
        self.red.is_some() || self.green.is_some() || self.blue.is_some()
    }

    fn is_hsl(&self) -> bool {
        self.hue.is_some() || self.saturation.is_some() || self.lightness.is_some()
    }
}

/// The checked magnitude of an optional component, or `None`.
fn component(param: &str, n: &Option<Number>, lo: f64, hi: f64) -> Result<Option<f64>> {
    n.as_ref().map(|n| check_range(param, n, lo, hi)).transpose()
}

fn adjust_color(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let c = Components::read(frame)?;
    let delta = |param, n: &Option<Number>, bound: f64| {
        component(param, n, -bound, bound).map(|v| v.unwrap_or(0.0))
    };

    let alpha = color.alpha() + delta("alpha", &c.alpha, 1.0)?;
    let adjusted = if c.is_rgb() {
        Color::rgba(
            color.red() + delta("red", &c.red, 255.0)?,
            color.green() + delta("green", &c.green, 255.0)?,
            color.blue() + delta("blue", &c.blue, 255.0)?,
            alpha,
        )
    } else if c.is_hsl() {
        let hsl = color.to_hsl();
        let h = hsl.h + c.hue.as_ref().map_or(0.0, |n| n.value);
        let s = percent(hsl.s + delta("saturation", &c.saturation, 100.0)?);
        let l = percent(hsl.l + delta("lightness", &c.lightness, 100.0)?);
        Color::hsla(h, s, l, alpha)
    } else {
        color.with_alpha(alpha)
    };
    color_value(frame, adjusted)
}

fn change_color(frame: &mut CallFrame<'_>) -> Result<Value> {
    let color = frame.color("color")?;
    let c = Components::read(frame)?;

    let alpha = component("alpha", &c.alpha, 0.0, 1.0)?.unwrap_or(color.alpha());
    let changed = if c.is_rgb() {
        Color::rgba(
            component("red", &c.red, 0.0, 255.0)?.unwrap_or(color.red()),
            component("green", &c.green, 0.0, 255.0)?.unwrap_or(color.green()),
            component("blue", &c.blue, 0.0, 255.0)?.unwrap_or(color.blue()),
            alpha,
        )
    } else if c.is_hsl() {
        let hsl = color.to_hsl();
        Color::hsla(
            c.hue.as_ref().map_or(hsl.h, |n| n.value),
            component("saturation", &c.saturation, 0.0, 100.0)?.unwrap_or(hsl.s),
            component("lightness", &c.lightness, 0.0, 100.0)?.unwrap_or(hsl.l),
            alpha,
        )
    } else {
        color.with_alpha(alpha)
    };
    color_value(frame, changed)
}
