//! Sun-based schedule derivation.
//!
//! Given sunrise and sunset instants from a caller-supplied provider, this
//! module derives an equivalent four-window schedule by applying symmetric
//! offsets around each solar event: dawn brackets sunrise, dusk brackets
//! sunset, day spans dawn's end to dusk's start, and night spans dusk's
//! end to dawn's start.
//!
//! Derivation is a pure function of its inputs, so repeated calls with the
//! same sunrise/sunset/offsets yield identical window boundaries. The
//! session derives the schedule once per evaluation cycle and reuses it
//! for both the phase lookup and the next-transition computation.

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::constants::*;
use crate::schedule::{Phase, Schedule, Window, minute_of_day};

/// Sunrise and sunset instants for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Local>,
    pub sunset: DateTime<Local>,
}

/// Caller-supplied source of sunrise/sunset data.
///
/// Returning `None` means sun-based scheduling is unavailable for that
/// cycle and the session falls back to time-based scheduling.
pub type SunTimesProvider = Box<dyn Fn(DateTime<Local>) -> Option<SunTimes> + Send>;

/// Symmetric offsets, in minutes, applied around each solar event.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunOffsets {
    pub dawn_offset_minutes_before: i32,
    pub dawn_offset_minutes_after: i32,
    pub dusk_offset_minutes_before: i32,
    pub dusk_offset_minutes_after: i32,
}

impl Default for SunOffsets {
    fn default() -> Self {
        Self {
            dawn_offset_minutes_before: DEFAULT_DAWN_OFFSET_BEFORE,
            dawn_offset_minutes_after: DEFAULT_DAWN_OFFSET_AFTER,
            dusk_offset_minutes_before: DEFAULT_DUSK_OFFSET_BEFORE,
            dusk_offset_minutes_after: DEFAULT_DUSK_OFFSET_AFTER,
        }
    }
}

/// True mathematical modulo into `[0, 1440)`: negative values gain a full
/// day first, so offsets that push a boundary past midnight stay
/// well-formed wrap-around windows.
fn normalize_minutes(value: i64) -> u32 {
    (((value % MINUTES_PER_DAY as i64) + MINUTES_PER_DAY as i64) % MINUTES_PER_DAY as i64) as u32
}

/// Derive a four-window schedule from sunrise/sunset instants.
///
/// The derived windows always partition the day: `day` starts where `dawn`
/// ends and `night` runs from `dusk`'s end back around to `dawn`'s start.
pub fn derive_sun_schedule(sun: &SunTimes, offsets: &SunOffsets) -> Schedule {
    let sunrise = minute_of_day(&sun.sunrise) as i64;
    let sunset = minute_of_day(&sun.sunset) as i64;

    let dawn_start = normalize_minutes(sunrise - offsets.dawn_offset_minutes_before as i64);
    let dawn_end = normalize_minutes(sunrise + offsets.dawn_offset_minutes_after as i64);
    let dusk_start = normalize_minutes(sunset - offsets.dusk_offset_minutes_before as i64);
    let dusk_end = normalize_minutes(sunset + offsets.dusk_offset_minutes_after as i64);

    Schedule {
        dawn: Window::new(dawn_start, dawn_end),
        day: Window::new(dawn_end, dusk_start),
        dusk: Window::new(dusk_start, dusk_end),
        night: Window::new(dusk_end, dawn_start),
    }
}

/// Active phase for `date` under a sun-derived schedule.
///
/// Applies the same window-containment test as time-based scheduling.
pub fn phase_from_sun_times(date: DateTime<Local>, sun: &SunTimes, offsets: &SunOffsets) -> Phase {
    derive_sun_schedule(sun, offsets).phase_at(minute_of_day(&date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 21, h, m, 0).unwrap()
    }

    fn summer_sun() -> SunTimes {
        SunTimes {
            sunrise: local(5, 50),
            sunset: local(21, 10),
        }
    }

    #[test]
    fn derived_windows_share_boundaries() {
        let schedule = derive_sun_schedule(&summer_sun(), &SunOffsets::default());
        assert_eq!(schedule.dawn.end, schedule.day.start);
        assert_eq!(schedule.day.end, schedule.dusk.start);
        assert_eq!(schedule.dusk.end, schedule.night.start);
        assert_eq!(schedule.night.end, schedule.dawn.start);
    }

    #[test]
    fn default_offsets_bracket_the_solar_events() {
        let schedule = derive_sun_schedule(&summer_sun(), &SunOffsets::default());
        // 05:50 sunrise with 45-minute offsets: dawn 05:05 - 06:35
        assert_eq!(schedule.dawn, Window::new(5 * 60 + 5, 6 * 60 + 35));
        // 21:10 sunset: dusk 20:25 - 21:55
        assert_eq!(schedule.dusk, Window::new(20 * 60 + 25, 21 * 60 + 55));
    }

    #[test]
    fn derivation_is_idempotent() {
        let offsets = SunOffsets::default();
        let first = derive_sun_schedule(&summer_sun(), &offsets);
        let second = derive_sun_schedule(&summer_sun(), &offsets);
        assert_eq!(first, second);
    }

    #[test]
    fn offsets_straddling_midnight_stay_well_formed() {
        // A polar-ish sunset at 23:50 with a 45-minute after-offset pushes
        // dusk's end past midnight; the night window must wrap cleanly.
        let sun = SunTimes {
            sunrise: local(0, 20),
            sunset: local(23, 50),
        };
        let schedule = derive_sun_schedule(&sun, &SunOffsets::default());
        assert_eq!(schedule.dusk.end, 35); // 00:35 next day
        assert_eq!(schedule.night, Window::new(35, 23 * 60 + 35));
        assert!(schedule.dusk.contains(5)); // 00:05 is still dusk
    }

    #[test]
    fn phase_lookup_matches_derived_schedule() {
        let sun = summer_sun();
        let offsets = SunOffsets::default();
        assert_eq!(phase_from_sun_times(local(5, 30), &sun, &offsets), Phase::Dawn);
        assert_eq!(phase_from_sun_times(local(13, 0), &sun, &offsets), Phase::Day);
        assert_eq!(phase_from_sun_times(local(21, 0), &sun, &offsets), Phase::Dusk);
        assert_eq!(phase_from_sun_times(local(3, 0), &sun, &offsets), Phase::Night);
    }
}
