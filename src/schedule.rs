//! Time-based phase scheduling.
//!
//! This module owns the core state machine over wall-clock minutes: a
//! four-window schedule (dawn, day, dusk, night) expressed as
//! minute-of-day offsets, possibly wrapping midnight, plus the lookup that
//! decides which phase is active and when the next transition occurs.
//!
//! ## Evaluation order
//!
//! Phases are always evaluated in the fixed order dawn, day, dusk, night;
//! the first window containing the query minute wins and night is the
//! fallback when none match. Overlapping windows are resolved by that
//! order alone.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// One of the four theming phases. Exactly one is active at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl Phase {
    /// Fixed evaluation order used for window containment tie-breaking.
    pub const ORDER: [Phase; 4] = [Phase::Dawn, Phase::Day, Phase::Dusk, Phase::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Dawn => "dawn",
            Phase::Day => "day",
            Phase::Dusk => "dusk",
            Phase::Night => "night",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Self> {
        match value {
            "dawn" => Some(Phase::Dawn),
            "day" => Some(Phase::Day),
            "dusk" => Some(Phase::Dusk),
            "night" => Some(Phase::Night),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A minute-of-day window `[start, end)`, possibly wrapping midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Containment test over minute-of-day values.
    ///
    /// `start == end` is the degenerate always-active window. A window
    /// with `start > end` wraps midnight and matches on either side of it.
    pub fn contains(&self, minute: u32) -> bool {
        if self.start == self.end {
            return true;
        }
        if self.start < self.end {
            minute >= self.start && minute < self.end
        } else {
            minute >= self.start || minute < self.end
        }
    }
}

/// Per-phase window overrides as `"HH:MM"` strings, merged over the
/// built-in default schedule field by field.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WindowOverride {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Partial schedule override from configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ScheduleOverrides {
    pub dawn: Option<WindowOverride>,
    pub day: Option<WindowOverride>,
    pub dusk: Option<WindowOverride>,
    pub night: Option<WindowOverride>,
}

/// A fully resolved four-window schedule in minute-of-day offsets.
///
/// A correctly configured schedule tiles the day without gaps; night is
/// the effective catch-all either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub dawn: Window,
    pub day: Window,
    pub dusk: Window,
    pub night: Window,
}

impl Default for Schedule {
    fn default() -> Self {
        // The built-in boundaries are compile-time constants, so parsing
        // cannot fail here.
        Self::normalize(&ScheduleOverrides::default())
            .expect("built-in default schedule must parse")
    }
}

impl Schedule {
    /// Merge partial `"HH:MM"` overrides over the built-in defaults and
    /// convert every boundary to minutes.
    ///
    /// A malformed time string is fatal: a broken schedule cannot safely
    /// degrade, so the error surfaces at configuration time.
    pub fn normalize(overrides: &ScheduleOverrides) -> Result<Self> {
        let window = |defaults: (&str, &str), over: &Option<WindowOverride>| -> Result<Window> {
            let start = over
                .as_ref()
                .and_then(|o| o.start.as_deref())
                .unwrap_or(defaults.0);
            let end = over
                .as_ref()
                .and_then(|o| o.end.as_deref())
                .unwrap_or(defaults.1);
            Ok(Window::new(
                parse_time_to_minutes(start)?,
                parse_time_to_minutes(end)?,
            ))
        };

        Ok(Self {
            dawn: window((DEFAULT_DAWN_START, DEFAULT_DAWN_END), &overrides.dawn)?,
            day: window((DEFAULT_DAY_START, DEFAULT_DAY_END), &overrides.day)?,
            dusk: window((DEFAULT_DUSK_START, DEFAULT_DUSK_END), &overrides.dusk)?,
            night: window((DEFAULT_NIGHT_START, DEFAULT_NIGHT_END), &overrides.night)?,
        })
    }

    pub fn window(&self, phase: Phase) -> Window {
        match phase {
            Phase::Dawn => self.dawn,
            Phase::Day => self.day,
            Phase::Dusk => self.dusk,
            Phase::Night => self.night,
        }
    }

    /// Active phase for a minute-of-day value.
    ///
    /// First containing window in the fixed phase order wins; night is the
    /// fallback when no window matches.
    pub fn phase_at(&self, minute: u32) -> Phase {
        for phase in Phase::ORDER {
            if self.window(phase).contains(minute) {
                return phase;
            }
        }
        Phase::Night
    }

    /// Instant of the next phase transition after `date`.
    ///
    /// The delta to the current window's end gets a full day added when it
    /// is zero or negative, covering both the midnight wrap and the exact
    /// boundary instant (which rolls forward a full cycle rather than
    /// firing immediately). Seconds and sub-seconds of the input carry
    /// through unchanged; the result is minute-granular by design.
    pub fn next_transition(&self, date: DateTime<Local>) -> DateTime<Local> {
        let minute = minute_of_day(&date);
        let current = self.phase_at(minute);
        let end = self.window(current).end;
        let mut delta = end as i64 - minute as i64;
        if delta <= 0 {
            delta += MINUTES_PER_DAY as i64;
        }
        date + Duration::minutes(delta)
    }
}

/// Parse `"HH:MM"` into a minute-of-day offset.
///
/// Hours wrap modulo 24 before the total wraps modulo 1440. Non-numeric
/// components are an error.
pub fn parse_time_to_minutes(value: &str) -> Result<u32> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 2 {
        bail!("Invalid time format: {value}");
    }
    let hours: u32 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid time format: {value}"))?;
    let minutes: u32 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid time format: {value}"))?;
    Ok(((hours % 24) * 60 + minutes) % MINUTES_PER_DAY)
}

/// Minute-of-day for a local timestamp.
pub fn minute_of_day(date: &DateTime<Local>) -> u32 {
    date.hour() * 60 + date.minute()
}
