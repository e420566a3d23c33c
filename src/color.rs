//! Color model and WCAG luminance math.
//!
//! Colors are hue/saturation/lightness triples carried as `"H S% L%"`
//! strings throughout the token pipeline (the same shorthand CSS custom
//! properties use). This module parses and serializes that form, converts
//! to linear RGB, and computes relative luminance and contrast ratios per
//! the WCAG formula.
//!
//! ## Malformed input
//!
//! `Hsl::parse` never fails: malformed components become NaN and propagate
//! through the luminance math, where every comparison against them is
//! false. Contrast repair then degrades to returning its input unchanged.
//! Token strings coming from configuration are checked up front with
//! [`Hsl::parse_strict`] instead, so a broken config fails at load time
//! rather than silently producing an unreadable theme.

use anyhow::{Context, Result, bail};
use std::fmt;

/// A hue/saturation/lightness color.
///
/// Hue is in degrees `[0, 360)`, saturation and lightness are fractions in
/// `[0, 1]`. Components may be NaN when constructed from malformed input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

/// Clamp that lets NaN pass through instead of collapsing it to a bound.
fn clamp_preserving_nan(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    value.clamp(min, max)
}

/// Format a component the way token strings carry them: integral values
/// without a decimal point, fractional values as-is.
fn format_component(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Parse a `"H S% L%"` string, producing NaN components on malformed
    /// input rather than failing.
    pub fn parse(value: &str) -> Self {
        let mut parts = value.split_whitespace();
        let hue = parts
            .next()
            .and_then(|p| p.parse::<f64>().ok())
            .unwrap_or(f64::NAN);
        let saturation = parts
            .next()
            .and_then(|p| p.trim_end_matches('%').parse::<f64>().ok())
            .map(|p| p / 100.0)
            .unwrap_or(f64::NAN);
        let lightness = parts
            .next()
            .and_then(|p| p.trim_end_matches('%').parse::<f64>().ok())
            .map(|p| p / 100.0)
            .unwrap_or(f64::NAN);
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Parse a `"H S% L%"` string, rejecting anything malformed.
    ///
    /// Used at configuration-load time so broken token overrides surface
    /// as configuration errors instead of NaN-poisoned contrast math.
    pub fn parse_strict(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 3 {
            bail!("expected \"H S% L%\", got '{value}'");
        }
        let hue: f64 = parts[0]
            .parse()
            .with_context(|| format!("invalid hue in '{value}'"))?;
        let saturation: f64 = parts[1]
            .trim_end_matches('%')
            .parse()
            .with_context(|| format!("invalid saturation in '{value}'"))?;
        let lightness: f64 = parts[2]
            .trim_end_matches('%')
            .parse()
            .with_context(|| format!("invalid lightness in '{value}'"))?;
        if !(0.0..=100.0).contains(&saturation) || !(0.0..=100.0).contains(&lightness) {
            bail!("saturation and lightness must be 0-100% in '{value}'");
        }
        Ok(Self {
            hue,
            saturation: saturation / 100.0,
            lightness: lightness / 100.0,
        })
    }

    /// Convert to linear RGB channels in `[0, 1]` via the standard
    /// chroma/sector formulation.
    pub fn to_rgb(&self) -> (f64, f64, f64) {
        let h = self.hue;
        let s = self.saturation;
        let l = self.lightness;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        // Six 60-degree sectors; NaN hue falls through to the last arm,
        // which matches the NaN-propagation contract since c and x are
        // already NaN by then.
        let (r, g, b) = if (0.0..60.0).contains(&h) {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        (r + m, g + m, b + m)
    }

    /// WCAG relative luminance: gamma-expand each sRGB channel, then apply
    /// the fixed luminance weights.
    pub fn relative_luminance(&self) -> f64 {
        fn linearize(channel: f64) -> f64 {
            if channel <= 0.03928 {
                channel / 12.92
            } else {
                ((channel + 0.055) / 1.055).powf(2.4)
            }
        }
        let (r, g, b) = self.to_rgb();
        0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
    }

    /// Return a copy with lightness shifted by `delta` percentage points,
    /// clamped to `[0, 100]`. Hue and saturation are untouched.
    pub fn with_lightness_delta(&self, delta: f64) -> Self {
        let shifted = clamp_preserving_nan(self.lightness * 100.0 + delta, 0.0, 100.0);
        Self {
            hue: self.hue,
            saturation: self.saturation,
            lightness: shifted / 100.0,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}% {}%",
            format_component(self.hue),
            format_component(self.saturation * 100.0),
            format_component(self.lightness * 100.0)
        )
    }
}

/// WCAG contrast ratio between two colors.
///
/// Symmetric in its arguments and always at least 1. NaN luminance from a
/// malformed color yields NaN, so every threshold comparison against the
/// result is false.
pub fn contrast_ratio(a: &Hsl, b: &Hsl) -> f64 {
    let lum_a = a.relative_luminance();
    let lum_b = b.relative_luminance();
    let lighter = lum_a.max(lum_b);
    let darker = lum_a.min(lum_b);
    (lighter + 0.05) / (darker + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_token_string() {
        let color = Hsl::parse("210 40% 96%");
        assert_eq!(color.hue, 210.0);
        assert!((color.saturation - 0.4).abs() < 1e-9);
        assert!((color.lightness - 0.96).abs() < 1e-9);
    }

    #[test]
    fn display_round_trips_canonical_form() {
        for value in ["210 40% 96%", "0 0% 100%", "27 60% 96%"] {
            assert_eq!(Hsl::parse(value).to_string(), value);
        }
    }

    #[test]
    fn malformed_input_yields_nan_not_panic() {
        let color = Hsl::parse("not a color");
        assert!(color.hue.is_nan());
        assert!(color.relative_luminance().is_nan());
    }

    #[test]
    fn parse_strict_rejects_malformed_tokens() {
        assert!(Hsl::parse_strict("210 40% 96%").is_ok());
        assert!(Hsl::parse_strict("oops").is_err());
        assert!(Hsl::parse_strict("210 140% 96%").is_err());
        assert!(Hsl::parse_strict("210 40%").is_err());
    }

    #[test]
    fn contrast_of_identical_colors_is_one() {
        let color = Hsl::parse("220 65% 45%");
        assert!((contrast_ratio(&color, &color) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn black_on_white_hits_maximum_ratio() {
        let white = Hsl::parse("0 0% 100%");
        let black = Hsl::parse("0 0% 0%");
        assert!((contrast_ratio(&white, &black) - 21.0).abs() < 0.01);
    }

    #[test]
    fn white_against_near_white_is_barely_above_one() {
        let white = Hsl::parse("0 0% 100%");
        let near_white = Hsl::parse("0 0% 90%");
        let ratio = contrast_ratio(&white, &near_white);
        assert!(ratio > 1.0 && ratio < 1.3, "ratio was {ratio}");
    }

    #[test]
    fn lightness_delta_clamps_at_bounds() {
        let color = Hsl::parse("0 0% 99%");
        assert!((color.with_lightness_delta(5.0).lightness - 1.0).abs() < 1e-9);
        let dark = Hsl::parse("0 0% 1%");
        assert!((dark.with_lightness_delta(-5.0).lightness - 0.0).abs() < 1e-9);
    }

    #[test]
    fn lightness_delta_preserves_nan() {
        let broken = Hsl::parse("garbage");
        assert!(broken.with_lightness_delta(2.0).lightness.is_nan());
    }

    #[test]
    fn pure_hues_convert_through_all_sectors() {
        for (hue, expected) in [
            (0.0, (1.0, 0.0, 0.0)),
            (120.0, (0.0, 1.0, 0.0)),
            (240.0, (0.0, 0.0, 1.0)),
        ] {
            let (r, g, b) = Hsl::new(hue, 1.0, 0.5).to_rgb();
            assert!((r - expected.0).abs() < 1e-9);
            assert!((g - expected.1).abs() < 1e-9);
            assert!((b - expected.2).abs() < 1e-9);
        }
    }
}
