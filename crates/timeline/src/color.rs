//! Group color resolution.
//!
//! Every group gets a stable hue derived from its id, so the same job or
//! tool keeps its color across reloads. Overrides can pin a hue or supply
//! explicit CSS colors. Saturation, lightness and alpha are fixed; only the
//! hue varies between groups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::config::GanttConfig;

/// Saturation shared by all derived colors, in percent.
const SATURATION: f64 = 85.0;

/// Lightness of the translucent bar fill, in percent.
const FILL_LIGHTNESS: f64 = 55.0;

/// Lightness of the border and accent, in percent.
const BORDER_LIGHTNESS: f64 = 42.0;

const FILL_ALPHA: f64 = 0.22;
const BORDER_ALPHA: f64 = 0.85;
const ACCENT_ALPHA: f64 = 0.95;

/// Per-group color override.
///
/// Supplying both `fill` and `border` uses them verbatim. Otherwise `hue`,
/// when set, replaces the hashed hue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOverride {
    #[serde(default, alias = "bg", skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(default, alias = "dot", skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
}

impl ColorOverride {
    /// Override that pins only the hue.
    pub fn hue(hue: f64) -> Self {
        Self {
            hue: Some(hue),
            ..Self::default()
        }
    }

    /// Override with explicit fill and border colors.
    pub fn explicit(fill: impl Into<String>, border: impl Into<String>) -> Self {
        Self {
            fill: Some(fill.into()),
            border: Some(border.into()),
            ..Self::default()
        }
    }

    /// Set the accent color.
    pub fn with_accent(mut self, accent: impl Into<String>) -> Self {
        self.accent = Some(accent.into());
        self
    }
}

/// An HSL color with alpha. Saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    /// Create a new color.
    pub fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Convert to opaque sRGB, ignoring alpha.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_channel(l);
            return (v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// A display color: either derived from a hue or passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Hsla(Hsla),
    /// A CSS color string from an override, used as given.
    Css(String),
}

impl Color {
    /// Best-effort conversion to opaque sRGB.
    ///
    /// CSS strings are understood in `#rgb` and `#rrggbb` form only.
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Hsla(hsla) => Some(hsla.to_rgb()),
            Color::Css(css) => parse_hex(css),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hsla(hsla) => hsla.fmt(f),
            Color::Css(css) => f.write_str(css),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_hex(css: &str) -> Option<(u8, u8, u8)> {
    let hex = css.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

/// The resolved colors for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupColor {
    /// Bar background.
    pub fill_color: Color,
    /// Bar outline.
    pub border_color: Color,
    /// Group header dot.
    pub accent_color: Color,
    /// Final hue in `[0, 360)`.
    pub hue: f64,
}

/// Stable hue for a group id.
///
/// Rolling hash with base 31 over UTF-16 code units in wrapping 32-bit
/// unsigned arithmetic, reduced modulo 360.
pub fn hash_hue(group_id: &str) -> f64 {
    let hash = group_id
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)));
    f64::from(hash % 360)
}

/// Resolve the display colors for `group_id`.
pub fn resolve_color(
    group_id: &str,
    overrides: &BTreeMap<String, ColorOverride>,
    hue_offset: f64,
) -> GroupColor {
    let over = overrides.get(group_id);
    let base_hue = over
        .and_then(|o| o.hue)
        .unwrap_or_else(|| hash_hue(group_id));
    let hue = normalize_hue(base_hue + hue_offset);

    if let Some(ColorOverride {
        fill: Some(fill),
        border: Some(border),
        accent,
        ..
    }) = over
    {
        return GroupColor {
            fill_color: Color::Css(fill.clone()),
            border_color: Color::Css(border.clone()),
            accent_color: Color::Css(accent.clone().unwrap_or_else(|| border.clone())),
            hue,
        };
    }

    GroupColor {
        fill_color: Color::Hsla(Hsla::new(hue, SATURATION, FILL_LIGHTNESS, FILL_ALPHA)),
        border_color: Color::Hsla(Hsla::new(hue, SATURATION, BORDER_LIGHTNESS, BORDER_ALPHA)),
        accent_color: Color::Hsla(Hsla::new(hue, SATURATION, BORDER_LIGHTNESS, ACCENT_ALPHA)),
        hue,
    }
}

fn normalize_hue(hue: f64) -> f64 {
    let hue = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if hue >= 360.0 { 0.0 } else { hue }
}

/// Overrides and hue offset bundled for repeated lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    overrides: BTreeMap<String, ColorOverride>,
    hue_offset: f64,
}

impl Palette {
    /// Create a palette.
    pub fn new(overrides: BTreeMap<String, ColorOverride>, hue_offset: f64) -> Self {
        Self {
            overrides,
            hue_offset,
        }
    }

    /// Build a palette from the color settings of `config`.
    pub fn from_config(config: &GanttConfig) -> Self {
        Self::new(config.group_colors.clone(), config.hue_offset)
    }

    /// Resolve the colors for one group.
    pub fn resolve(&self, group_id: &str) -> GroupColor {
        resolve_color(group_id, &self.overrides, self.hue_offset)
    }
}
