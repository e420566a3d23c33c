//! Configuration system for circadia with validation.
//!
//! Handles TOML-based configuration, default value merging, and
//! validation. Every field is optional; an empty file (or no file at all)
//! yields the built-in defaults.
//!
//! ## Configuration Structure
//!
//! ```toml
//! mode = "auto"            # Scheduling strategy: "auto", "time", "sun", "manual"
//! persist = true           # Persist mode and phase override across sessions
//! storage_key = "cui-preferences"
//!
//! [schedule.dawn]
//! start = "05:30"          # Window boundaries (HH:MM), may wrap midnight
//! end = "08:30"
//!
//! [tokens.night]
//! background = "230 22% 10%"   # Per-phase token overrides ("H S% L%")
//!
//! [sun]
//! dawn_offset_minutes_before = 45
//! dawn_offset_minutes_after = 45
//! dusk_offset_minutes_before = 45
//! dusk_offset_minutes_after = 45
//!
//! [accessibility]
//! minimum_ratio = 4.5      # WCAG contrast floor (1-21)
//! max_iterations = 24
//!
//! [system]
//! respect_color_scheme = true
//! respect_contrast_preference = true
//! respect_reduced_motion = true
//!
//! [color_scheme_bias]
//! dark = -8.0              # Lightness shift when the system prefers dark
//! light = 8.0
//!
//! [transition]
//! enabled = false
//! duration_ms = 200
//! ```
//!
//! ## Validation and Error Handling
//!
//! Malformed schedule times and malformed token color strings are fatal at
//! load time: a broken schedule cannot safely degrade, and a broken token
//! would otherwise poison the contrast math as NaN. Range checks cover
//! contrast ratios, iteration budgets, and sun offsets.

pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::prefs::{AccessibilityOverrides, ScheduleMode, SystemOptions};
use crate::schedule::{Phase, ScheduleOverrides};
use crate::sun::SunOffsets;
use crate::tokens::{ColorSchemeBias, PhaseTokenOverrides};

pub use validation::validate_config;

/// Transition-duration hint passed to the presentation collaborator.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransitionOptions {
    pub enabled: bool,
    pub duration_ms: u64,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_TRANSITION_ENABLED,
            duration_ms: DEFAULT_TRANSITION_DURATION_MS,
        }
    }
}

/// Complete configuration surface. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Default scheduling mode when no user choice is persisted
    pub mode: Option<ScheduleMode>,
    /// Phase to present before the first evaluation completes
    pub initial_phase: Option<Phase>,
    /// Persist mode/override changes (default true)
    pub persist: Option<bool>,
    /// Key under which state is persisted
    pub storage_key: Option<String>,
    /// Time-based schedule window overrides
    pub schedule: Option<ScheduleOverrides>,
    /// Per-phase color token overrides
    pub tokens: Option<PhaseTokenOverrides>,
    /// Offsets around sunrise/sunset for sun-based scheduling
    pub sun: Option<SunOffsets>,
    /// Accessibility threshold overrides
    pub accessibility: Option<AccessibilityOverrides>,
    /// System-preference opt-outs
    pub system: Option<SystemOptions>,
    /// Lightness bias magnitudes for dark/light preference
    pub color_scheme_bias: Option<ColorSchemeBias>,
    /// Transition hint for the presentation layer
    pub transition: Option<TransitionOptions>,
}

impl Config {
    pub fn persist_enabled(&self) -> bool {
        self.persist.unwrap_or(true)
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn schedule_overrides(&self) -> ScheduleOverrides {
        self.schedule.clone().unwrap_or_default()
    }

    pub fn token_overrides(&self) -> PhaseTokenOverrides {
        self.tokens.clone().unwrap_or_default()
    }

    pub fn sun_offsets(&self) -> SunOffsets {
        self.sun.unwrap_or_default()
    }

    pub fn accessibility_overrides(&self) -> AccessibilityOverrides {
        self.accessibility.clone().unwrap_or_default()
    }

    pub fn system_options(&self) -> SystemOptions {
        self.system.unwrap_or_default()
    }

    pub fn color_scheme_bias(&self) -> ColorSchemeBias {
        self.color_scheme_bias.unwrap_or_default()
    }

    pub fn transition_options(&self) -> TransitionOptions {
        self.transition.unwrap_or_default()
    }
}

/// Default configuration file path:
/// `$XDG_CONFIG_HOME/circadia/circadia.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine a configuration directory")?;
    Ok(base.join("circadia").join(CONFIG_FILE_NAME))
}

/// Load and validate configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config at {}", path.display()))?;
    validate_config(&config)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

/// Load configuration from the default location, falling back to built-in
/// defaults when no file exists.
pub fn load() -> Result<Config> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }
    load_from_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.persist_enabled());
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn full_config_round_trips_through_toml() {
        let config: Config = toml::from_str(
            r#"
            mode = "sun"
            initial_phase = "dusk"
            persist = false
            storage_key = "my-app"

            [schedule.dawn]
            start = "05:00"
            end = "08:00"

            [tokens.night]
            background = "230 22% 6%"

            [sun]
            dawn_offset_minutes_before = 30

            [accessibility]
            minimum_ratio = 7.0

            [system]
            respect_color_scheme = false

            [color_scheme_bias]
            dark = -12.0

            [transition]
            enabled = true
            duration_ms = 350
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Some(ScheduleMode::Sun));
        assert_eq!(config.initial_phase, Some(Phase::Dusk));
        assert!(!config.persist_enabled());
        assert_eq!(config.storage_key(), "my-app");
        assert_eq!(config.sun_offsets().dawn_offset_minutes_before, 30);
        assert_eq!(config.sun_offsets().dawn_offset_minutes_after, 45);
        assert_eq!(config.accessibility_overrides().minimum_ratio, Some(7.0));
        assert!(!config.system_options().respect_color_scheme);
        assert_eq!(config.color_scheme_bias().dark, -12.0);
        assert_eq!(config.color_scheme_bias().light, 8.0);
        assert!(config.transition_options().enabled);
        assert_eq!(config.transition_options().duration_ms, 350);
        validate_config(&config).unwrap();
    }

    #[test]
    fn load_from_path_rejects_malformed_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circadia.toml");
        std::fs::write(&path, "[schedule.dawn]\nstart = \"early\"\n").unwrap();
        assert!(load_from_path(&path).is_err());
    }
}
