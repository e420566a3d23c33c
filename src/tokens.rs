//! Per-phase color token sets.
//!
//! Each phase maps to twelve semantic color slots. A token set is built
//! from the built-in defaults for its phase, merged with per-field
//! configuration overrides, then adjusted non-destructively by
//! color-scheme bias and contrast repair downstream. Every adjustment
//! produces a new set; nothing mutates in place.

use serde::Deserialize;

use crate::color::Hsl;
use crate::constants::{DEFAULT_DARK_BIAS, DEFAULT_LIGHT_BIAS};
use crate::prefs::ColorSchemePreference;
use crate::schedule::Phase;

/// The twelve semantic color slots themed per phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenSet {
    pub background: Hsl,
    pub foreground: Hsl,
    pub muted: Hsl,
    pub muted_foreground: Hsl,
    pub card: Hsl,
    pub card_foreground: Hsl,
    pub border: Hsl,
    pub ring: Hsl,
    pub accent: Hsl,
    pub accent_foreground: Hsl,
    pub destructive: Hsl,
    pub destructive_foreground: Hsl,
}

/// Per-slot overrides from configuration, as raw `"H S% L%"` strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TokenOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub muted: Option<String>,
    pub muted_foreground: Option<String>,
    pub card: Option<String>,
    pub card_foreground: Option<String>,
    pub border: Option<String>,
    pub ring: Option<String>,
    pub accent: Option<String>,
    pub accent_foreground: Option<String>,
    pub destructive: Option<String>,
    pub destructive_foreground: Option<String>,
}

impl TokenOverrides {
    /// All override strings present on this set, for validation.
    pub fn values(&self) -> impl Iterator<Item = &String> {
        [
            &self.background,
            &self.foreground,
            &self.muted,
            &self.muted_foreground,
            &self.card,
            &self.card_foreground,
            &self.border,
            &self.ring,
            &self.accent,
            &self.accent_foreground,
            &self.destructive,
            &self.destructive_foreground,
        ]
        .into_iter()
        .flatten()
    }
}

/// Per-phase token overrides from configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PhaseTokenOverrides {
    pub dawn: Option<TokenOverrides>,
    pub day: Option<TokenOverrides>,
    pub dusk: Option<TokenOverrides>,
    pub night: Option<TokenOverrides>,
}

impl PhaseTokenOverrides {
    pub fn for_phase(&self, phase: Phase) -> Option<&TokenOverrides> {
        match phase {
            Phase::Dawn => self.dawn.as_ref(),
            Phase::Day => self.day.as_ref(),
            Phase::Dusk => self.dusk.as_ref(),
            Phase::Night => self.night.as_ref(),
        }
    }
}

/// Lightness offsets applied when the system signals a color-scheme
/// preference, in percentage points.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorSchemeBias {
    pub dark: f64,
    pub light: f64,
}

impl Default for ColorSchemeBias {
    fn default() -> Self {
        Self {
            dark: DEFAULT_DARK_BIAS,
            light: DEFAULT_LIGHT_BIAS,
        }
    }
}

impl TokenSet {
    /// Built-in defaults for a phase.
    pub fn defaults(phase: Phase) -> Self {
        let parse = Hsl::parse;
        match phase {
            Phase::Dawn => Self {
                background: parse("27 60% 96%"),
                foreground: parse("24 18% 18%"),
                muted: parse("27 40% 90%"),
                muted_foreground: parse("24 14% 35%"),
                card: parse("0 0% 100%"),
                card_foreground: parse("24 18% 18%"),
                border: parse("24 22% 84%"),
                ring: parse("20 65% 45%"),
                accent: parse("20 80% 92%"),
                accent_foreground: parse("20 40% 30%"),
                destructive: parse("0 74% 55%"),
                destructive_foreground: parse("0 0% 100%"),
            },
            Phase::Day => Self {
                background: parse("0 0% 100%"),
                foreground: parse("222 28% 14%"),
                muted: parse("210 20% 96%"),
                muted_foreground: parse("215 16% 35%"),
                card: parse("0 0% 100%"),
                card_foreground: parse("222 28% 14%"),
                border: parse("214 20% 90%"),
                ring: parse("220 65% 45%"),
                accent: parse("220 90% 95%"),
                accent_foreground: parse("220 45% 30%"),
                destructive: parse("0 72% 55%"),
                destructive_foreground: parse("0 0% 100%"),
            },
            Phase::Dusk => Self {
                background: parse("240 24% 14%"),
                foreground: parse("30 40% 95%"),
                muted: parse("245 20% 22%"),
                muted_foreground: parse("30 20% 80%"),
                card: parse("240 22% 16%"),
                card_foreground: parse("30 40% 95%"),
                border: parse("245 16% 30%"),
                ring: parse("32 70% 60%"),
                accent: parse("32 55% 25%"),
                accent_foreground: parse("32 70% 85%"),
                destructive: parse("0 70% 55%"),
                destructive_foreground: parse("0 0% 100%"),
            },
            Phase::Night => Self {
                background: parse("230 22% 10%"),
                foreground: parse("210 40% 96%"),
                muted: parse("230 18% 16%"),
                muted_foreground: parse("210 20% 80%"),
                card: parse("230 20% 12%"),
                card_foreground: parse("210 40% 96%"),
                border: parse("230 16% 24%"),
                ring: parse("210 80% 60%"),
                accent: parse("210 35% 20%"),
                accent_foreground: parse("210 50% 90%"),
                destructive: parse("0 65% 55%"),
                destructive_foreground: parse("0 0% 100%"),
            },
        }
    }

    /// Defaults for `phase` with any configured per-field overrides
    /// applied on top.
    pub fn resolve(phase: Phase, overrides: &PhaseTokenOverrides) -> Self {
        let mut tokens = Self::defaults(phase);
        if let Some(over) = overrides.for_phase(phase) {
            let apply = |slot: &mut Hsl, value: &Option<String>| {
                if let Some(value) = value {
                    *slot = Hsl::parse(value);
                }
            };
            apply(&mut tokens.background, &over.background);
            apply(&mut tokens.foreground, &over.foreground);
            apply(&mut tokens.muted, &over.muted);
            apply(&mut tokens.muted_foreground, &over.muted_foreground);
            apply(&mut tokens.card, &over.card);
            apply(&mut tokens.card_foreground, &over.card_foreground);
            apply(&mut tokens.border, &over.border);
            apply(&mut tokens.ring, &over.ring);
            apply(&mut tokens.accent, &over.accent);
            apply(&mut tokens.accent_foreground, &over.accent_foreground);
            apply(&mut tokens.destructive, &over.destructive);
            apply(
                &mut tokens.destructive_foreground,
                &over.destructive_foreground,
            );
        }
        tokens
    }

    /// Shift every slot's lightness by the bias matching the system
    /// color-scheme preference. "No preference" returns the set unchanged.
    pub fn with_color_scheme_bias(
        &self,
        prefers: ColorSchemePreference,
        bias: &ColorSchemeBias,
    ) -> Self {
        let delta = match prefers {
            ColorSchemePreference::Dark => bias.dark,
            ColorSchemePreference::Light => bias.light,
            ColorSchemePreference::NoPreference => return *self,
        };
        self.map(|slot| slot.with_lightness_delta(delta))
    }

    /// Apply `f` to every slot, producing a new set.
    pub fn map(&self, f: impl Fn(&Hsl) -> Hsl) -> Self {
        Self {
            background: f(&self.background),
            foreground: f(&self.foreground),
            muted: f(&self.muted),
            muted_foreground: f(&self.muted_foreground),
            card: f(&self.card),
            card_foreground: f(&self.card_foreground),
            border: f(&self.border),
            ring: f(&self.ring),
            accent: f(&self.accent),
            accent_foreground: f(&self.accent_foreground),
            destructive: f(&self.destructive),
            destructive_foreground: f(&self.destructive_foreground),
        }
    }

    /// Flatten to CSS-custom-property keys for the presentation
    /// collaborator, in slot order.
    pub fn css_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--cui-bg", self.background.to_string()),
            ("--cui-fg", self.foreground.to_string()),
            ("--cui-muted", self.muted.to_string()),
            ("--cui-muted-fg", self.muted_foreground.to_string()),
            ("--cui-card", self.card.to_string()),
            ("--cui-card-fg", self.card_foreground.to_string()),
            ("--cui-border", self.border.to_string()),
            ("--cui-ring", self.ring.to_string()),
            ("--cui-accent", self.accent.to_string()),
            ("--cui-accent-fg", self.accent_foreground.to_string()),
            ("--cui-destructive", self.destructive.to_string()),
            ("--cui-destructive-fg", self.destructive_foreground.to_string()),
        ]
    }
}
