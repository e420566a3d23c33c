//! Configuration validation.
//!
//! Everything that would otherwise fail silently at runtime is checked
//! here instead: schedule time strings must parse, token override strings
//! must be well-formed colors (a malformed token would propagate as NaN
//! through the contrast math and soft-fail repair), and numeric thresholds
//! must sit in sensible ranges.

use anyhow::{Context, Result, bail};

use super::Config;
use crate::color::Hsl;
use crate::schedule::Schedule;

/// Validate a configuration, producing a helpful error for the first
/// problem found.
pub fn validate_config(config: &Config) -> Result<()> {
    // A broken schedule cannot safely degrade; fail at configuration time
    Schedule::normalize(&config.schedule_overrides())
        .context("Invalid schedule window")?;

    if let Some(tokens) = &config.tokens {
        for (phase, overrides) in [
            ("dawn", &tokens.dawn),
            ("day", &tokens.day),
            ("dusk", &tokens.dusk),
            ("night", &tokens.night),
        ] {
            if let Some(overrides) = overrides {
                for value in overrides.values() {
                    Hsl::parse_strict(value)
                        .with_context(|| format!("Invalid color token for phase '{phase}'"))?;
                }
            }
        }
    }

    if let Some(accessibility) = &config.accessibility {
        if let Some(ratio) = accessibility.minimum_ratio
            && !(1.0..=21.0).contains(&ratio)
        {
            bail!("minimum_ratio must be between 1 and 21, got {ratio}");
        }
        if let Some(ratio) = accessibility.large_text_ratio
            && !(1.0..=21.0).contains(&ratio)
        {
            bail!("large_text_ratio must be between 1 and 21, got {ratio}");
        }
        if let Some(iterations) = accessibility.max_iterations
            && iterations == 0
        {
            bail!("max_iterations must be at least 1");
        }
    }

    if let Some(sun) = &config.sun {
        for (name, value) in [
            ("dawn_offset_minutes_before", sun.dawn_offset_minutes_before),
            ("dawn_offset_minutes_after", sun.dawn_offset_minutes_after),
            ("dusk_offset_minutes_before", sun.dusk_offset_minutes_before),
            ("dusk_offset_minutes_after", sun.dusk_offset_minutes_after),
        ] {
            if !(0..=720).contains(&value) {
                bail!("{name} must be between 0 and 720 minutes, got {value}");
            }
        }
    }

    if let Some(bias) = &config.color_scheme_bias {
        for (name, value) in [("dark", bias.dark), ("light", bias.light)] {
            if !value.is_finite() || value.abs() > 100.0 {
                bail!("color_scheme_bias.{name} must be between -100 and 100, got {value}");
            }
        }
    }

    Ok(())
}
