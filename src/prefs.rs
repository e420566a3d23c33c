//! System preference snapshots and preference resolution.
//!
//! The environment owns three independent preference channels: color
//! scheme (dark/light), contrast (more/less), and reduced motion. This
//! module defines the snapshot types, the collaborator trait that supplies
//! live snapshots and change notifications, and the resolution logic that
//! merges defaults, configuration overrides, and the live contrast signal
//! into effective accessibility options.
//!
//! A missing preference capability never errors: [`NoPreferenceSource`]
//! degrades to a constant no-preference snapshot with a no-op
//! subscription.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Effective scheduling strategy after resolving user and config intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    Time,
    Sun,
    Manual,
    Auto,
}

impl ScheduleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleMode::Time => "time",
            ScheduleMode::Sun => "sun",
            ScheduleMode::Manual => "manual",
            ScheduleMode::Auto => "auto",
        }
    }
}

impl std::fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSchemePreference {
    Dark,
    Light,
    #[default]
    NoPreference,
}

/// System contrast preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContrastPreference {
    More,
    Less,
    #[default]
    NoPreference,
}

/// Live snapshot of the environment's preference channels.
///
/// Owned by the environment; this system only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemPreferences {
    pub color_scheme: ColorSchemePreference,
    pub contrast: ContrastPreference,
    pub reduced_motion: bool,
}

/// Handle for an active preference subscription.
///
/// Dropping the handle unsubscribes. A no-op handle stands in when the
/// underlying capability is absent.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn noop() -> Self {
        Self { cancel: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Collaborator supplying live system preferences.
///
/// A subscription may fire zero or more times; implementations without a
/// change channel simply return a no-op handle.
pub trait SystemPreferenceSource: Send {
    fn snapshot(&self) -> SystemPreferences;

    fn subscribe(&self, on_change: Box<dyn Fn(SystemPreferences) + Send>) -> Subscription {
        let _ = on_change;
        Subscription::noop()
    }
}

/// Degraded source for environments without a preference capability:
/// constant no-preference snapshot, no-op subscription.
#[derive(Debug, Default)]
pub struct NoPreferenceSource;

impl SystemPreferenceSource for NoPreferenceSource {
    fn snapshot(&self) -> SystemPreferences {
        SystemPreferences::default()
    }
}

/// Effective accessibility options for one resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessibilityOptions {
    pub enforce_contrast: bool,
    pub minimum_ratio: f64,
    pub large_text_ratio: f64,
    pub prefer_preserve_hue: bool,
    pub max_iterations: u32,
}

impl Default for AccessibilityOptions {
    fn default() -> Self {
        Self {
            enforce_contrast: true,
            minimum_ratio: DEFAULT_MINIMUM_RATIO,
            large_text_ratio: DEFAULT_LARGE_TEXT_RATIO,
            prefer_preserve_hue: true,
            max_iterations: DEFAULT_MAX_CONTRAST_ITERATIONS,
        }
    }
}

/// Accessibility overrides from configuration; unset fields keep defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AccessibilityOverrides {
    pub enforce_contrast: Option<bool>,
    pub minimum_ratio: Option<f64>,
    pub large_text_ratio: Option<f64>,
    pub prefer_preserve_hue: Option<bool>,
    pub max_iterations: Option<u32>,
}

/// System-preference opt-outs from configuration. All channels are
/// respected unless explicitly disabled.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemOptions {
    pub respect_color_scheme: bool,
    pub respect_contrast_preference: bool,
    pub respect_reduced_motion: bool,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            respect_color_scheme: true,
            respect_contrast_preference: true,
            respect_reduced_motion: true,
        }
    }
}

/// Resolve the user-facing scheduling mode: explicit user mode wins, then
/// the configured default, then auto.
pub fn resolve_mode(user: Option<ScheduleMode>, configured: Option<ScheduleMode>) -> ScheduleMode {
    user.or(configured).unwrap_or(ScheduleMode::Auto)
}

/// Merge default accessibility options with config overrides, then apply
/// the live contrast preference.
///
/// The "more" signal raises the minimum ratio to at least 7 and the "less"
/// signal lowers it to at most 3. Both are floor/ceiling operations, never
/// overwrites: a configured ratio of 8 survives "more" and a configured 2
/// survives "less". The channel is skipped entirely when opted out.
pub fn resolve_accessibility(
    system: &SystemPreferences,
    overrides: &AccessibilityOverrides,
    options: &SystemOptions,
) -> AccessibilityOptions {
    let defaults = AccessibilityOptions::default();
    let mut resolved = AccessibilityOptions {
        enforce_contrast: overrides.enforce_contrast.unwrap_or(defaults.enforce_contrast),
        minimum_ratio: overrides.minimum_ratio.unwrap_or(defaults.minimum_ratio),
        large_text_ratio: overrides.large_text_ratio.unwrap_or(defaults.large_text_ratio),
        prefer_preserve_hue: overrides
            .prefer_preserve_hue
            .unwrap_or(defaults.prefer_preserve_hue),
        max_iterations: overrides.max_iterations.unwrap_or(defaults.max_iterations),
    };

    if options.respect_contrast_preference {
        match system.contrast {
            ContrastPreference::More => {
                resolved.minimum_ratio = resolved.minimum_ratio.max(CONTRAST_MORE_FLOOR);
            }
            ContrastPreference::Less => {
                resolved.minimum_ratio = resolved.minimum_ratio.min(CONTRAST_LESS_CEILING);
            }
            ContrastPreference::NoPreference => {}
        }
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_contrast(contrast: ContrastPreference) -> SystemPreferences {
        SystemPreferences {
            contrast,
            ..Default::default()
        }
    }

    #[test]
    fn mode_resolution_precedence() {
        assert_eq!(
            resolve_mode(Some(ScheduleMode::Manual), Some(ScheduleMode::Sun)),
            ScheduleMode::Manual
        );
        assert_eq!(
            resolve_mode(None, Some(ScheduleMode::Sun)),
            ScheduleMode::Sun
        );
        assert_eq!(resolve_mode(None, None), ScheduleMode::Auto);
    }

    #[test]
    fn more_contrast_raises_ratio_to_floor() {
        let resolved = resolve_accessibility(
            &with_contrast(ContrastPreference::More),
            &AccessibilityOverrides::default(),
            &SystemOptions::default(),
        );
        assert_eq!(resolved.minimum_ratio, 7.0);
    }

    #[test]
    fn more_contrast_never_lowers_a_higher_config_ratio() {
        let overrides = AccessibilityOverrides {
            minimum_ratio: Some(8.0),
            ..Default::default()
        };
        let resolved = resolve_accessibility(
            &with_contrast(ContrastPreference::More),
            &overrides,
            &SystemOptions::default(),
        );
        assert_eq!(resolved.minimum_ratio, 8.0);
    }

    #[test]
    fn less_contrast_never_raises_a_lower_config_ratio() {
        let overrides = AccessibilityOverrides {
            minimum_ratio: Some(2.0),
            ..Default::default()
        };
        let resolved = resolve_accessibility(
            &with_contrast(ContrastPreference::Less),
            &overrides,
            &SystemOptions::default(),
        );
        assert_eq!(resolved.minimum_ratio, 2.0);
    }

    #[test]
    fn less_contrast_caps_default_ratio() {
        let resolved = resolve_accessibility(
            &with_contrast(ContrastPreference::Less),
            &AccessibilityOverrides::default(),
            &SystemOptions::default(),
        );
        assert_eq!(resolved.minimum_ratio, 3.0);
    }

    #[test]
    fn contrast_channel_opt_out_keeps_config_ratio() {
        let options = SystemOptions {
            respect_contrast_preference: false,
            ..Default::default()
        };
        let resolved = resolve_accessibility(
            &with_contrast(ContrastPreference::More),
            &AccessibilityOverrides::default(),
            &options,
        );
        assert_eq!(resolved.minimum_ratio, DEFAULT_MINIMUM_RATIO);
    }

    #[test]
    fn no_preference_source_degrades_cleanly() {
        let source = NoPreferenceSource;
        assert_eq!(source.snapshot(), SystemPreferences::default());
        // No-op subscription neither fires nor blocks teardown
        let sub = source.subscribe(Box::new(|_| panic!("must never fire")));
        drop(sub);
    }
}
