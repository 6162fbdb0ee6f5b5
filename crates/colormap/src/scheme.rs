//! Palettes and multi-stop interpolation.
//!
//! A palette is a list of colors spread evenly over [0, 1], written the way
//! visualization parameters usually are: CSS color names or `#rrggbb`.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS color name or a `#rrggbb` / `rrggbb` hex string.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if let Some(color) = named(spec) {
            return Some(color);
        }
        let hex = spec.strip_prefix('#').unwrap_or(spec);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// CSS basic color keywords.
fn named(name: &str) -> Option<Rgb> {
    let color = match name.to_ascii_lowercase().as_str() {
        "white" => Rgb::new(255, 255, 255),
        "black" => Rgb::new(0, 0, 0),
        "green" => Rgb::new(0, 128, 0),
        "lime" => Rgb::new(0, 255, 0),
        "red" => Rgb::new(255, 0, 0),
        "blue" => Rgb::new(0, 0, 255),
        "yellow" => Rgb::new(255, 255, 0),
        "orange" => Rgb::new(255, 165, 0),
        "brown" => Rgb::new(165, 42, 42),
        "gray" | "grey" => Rgb::new(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

/// Palette of suitability maps: unsuitable to suitable.
pub const SUITABILITY_PALETTE: [&str; 2] = ["white", "green"];

/// Error for an unrecognised palette entry
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised palette color '{0}'")]
pub struct PaletteError(pub String);

/// Evenly spaced color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<ColorStop>,
}

impl Palette {
    /// Build a ramp from color specs, first at 0 and last at 1.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self, PaletteError> {
        let colors = specs
            .iter()
            .map(|s| Rgb::parse(s.as_ref()).ok_or_else(|| PaletteError(s.as_ref().to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        if colors.is_empty() {
            return Err(PaletteError(String::new()));
        }
        Ok(Self::from_colors(&colors))
    }

    /// Build a ramp from colors, evenly spaced.
    pub fn from_colors(colors: &[Rgb]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| ColorStop {
                t: i as f64 / last,
                color,
            })
            .collect();
        Self { stops }
    }

    /// Color stops of this palette
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at normalized position `t` ∈ [0, 1] (clamped).
    pub fn evaluate(&self, t: f64) -> Rgb {
        multi_stop(&self.stops, t)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rgb::new(0, 0, 0),
    };
    if t <= first.t || t.is_nan() {
        return first.color;
    }
    if t >= last.t {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.t {
            let ratio = (t - lo.t) / (hi.t - lo.t);
            return lerp_color(lo.color, hi.color, ratio);
        }
    }
    last.color
}
