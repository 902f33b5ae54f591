//! HSL conversion and lightness adjustment.
//!
//! Tints and shades are produced by converting to HSL, moving only the
//! lightness component, and converting back. Hue and saturation survive the
//! round trip, so a green accent stays green whether it is darkened for a
//! hover state or lightened for a background wash.
//!
//! All components are normalised: hue is a fraction of a turn in `[0, 1)`,
//! saturation and lightness are in `[0, 1]`.

use crate::color::Color;

// ─── Hsl ───────────────────────────────────────────────────────────────────

/// A color in hue/saturation/lightness form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue as a fraction of a full turn, `0.0..1.0`.
    pub h: f64,
    /// Saturation, `0.0..=1.0`. Zero for grays.
    pub s: f64,
    /// Lightness, `0.0..=1.0`.
    pub l: f64,
}

impl Hsl {
    /// Converts an sRGB color using the max/min channel construction.
    pub fn from_color(color: Color) -> Self {
        let (r, g, b) = normalized(color);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Self { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        Self { h, s, l }
    }

    /// Hue in degrees, `0.0..360.0`.
    pub fn hue_degrees(&self) -> f64 {
        self.h * 360.0
    }

    /// Returns a copy with lightness moved by `delta` and clamped to `[0, 1]`.
    ///
    /// A NaN `delta` leaves lightness unchanged.
    pub fn with_lightness_shift(self, delta: f64) -> Self {
        if delta.is_nan() {
            return self;
        }
        Self {
            l: (self.l + delta).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Converts back to an sRGB color, rounding each channel to the nearest
    /// 8-bit value.
    pub fn to_color(&self) -> Color {
        let (r, g, b) = if self.s == 0.0 {
            (self.l, self.l, self.l)
        } else {
            let q = if self.l < 0.5 {
                self.l * (1.0 + self.s)
            } else {
                self.l + self.s - self.l * self.s
            };
            let p = 2.0 * self.l - q;
            (
                hue_to_channel(p, q, self.h + 1.0 / 3.0),
                hue_to_channel(p, q, self.h),
                hue_to_channel(p, q, self.h - 1.0 / 3.0),
            )
        };

        Color::from_rgb(to_byte(r), to_byte(g), to_byte(b))
    }
}

// ─── Adjustment ────────────────────────────────────────────────────────────

/// Shifts the lightness of `color` by `percent` points and returns the result.
///
/// `percent` is nominally `-100.0..=100.0`; larger magnitudes, infinities
/// included, pin lightness at black or white. NaN is treated as no shift,
/// so the result is the color's own HSL round trip. The function is pure
/// and total over valid colors.
///
/// ```rust
/// use hueshift_color::{adjust, Color};
///
/// let accent = Color::parse("#10b981").unwrap();
/// assert_eq!(adjust(accent, -15.0).to_string(), "#0a7350");
/// assert_eq!(adjust(accent, 35.0).to_string(), "#87f5d0");
/// assert_eq!(adjust(accent, 100.0), Color::WHITE);
/// ```
pub fn adjust(color: Color, percent: f64) -> Color {
    Hsl::from_color(color)
        .with_lightness_shift(percent / 100.0)
        .to_color()
}

fn normalized(color: Color) -> (f64, f64, f64) {
    let (r, g, b) = color.rgb();
    (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

/// Evaluates one RGB channel of the HSL → RGB piecewise function at hue `t`.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
