use chrono::{DateTime, Local, TimeZone};
use proptest::prelude::*;

use circadia::schedule::{Phase, Schedule, ScheduleOverrides, WindowOverride};
use circadia::sun::{SunOffsets, SunTimes, derive_sun_schedule};

/// Generate arbitrary minute-of-day values
fn minute_strategy() -> impl Strategy<Value = u32> {
    0u32..1440
}

/// Generate valid sun offsets (0-720 minutes, the configurable range)
fn offsets_strategy() -> impl Strategy<Value = SunOffsets> {
    (0i32..=720, 0i32..=720, 0i32..=720, 0i32..=720).prop_map(
        |(dawn_before, dawn_after, dusk_before, dusk_after)| SunOffsets {
            dawn_offset_minutes_before: dawn_before,
            dawn_offset_minutes_after: dawn_after,
            dusk_offset_minutes_before: dusk_before,
            dusk_offset_minutes_after: dusk_after,
        },
    )
}

fn at_minute(minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 21, minute / 60, minute % 60, 0)
        .unwrap()
}

fn sun_times(sunrise: u32, sunset: u32) -> SunTimes {
    SunTimes {
        sunrise: at_minute(sunrise),
        sunset: at_minute(sunset),
    }
}

proptest! {
    /// The derived schedule is a pure function of its inputs: repeated
    /// derivation yields byte-identical window boundaries.
    #[test]
    fn derivation_is_idempotent(
        sunrise in minute_strategy(),
        sunset in minute_strategy(),
        offsets in offsets_strategy()
    ) {
        let sun = sun_times(sunrise, sunset);
        prop_assert_eq!(
            derive_sun_schedule(&sun, &offsets),
            derive_sun_schedule(&sun, &offsets)
        );
    }

    /// Derived windows always chain: day starts where dawn ends, night
    /// runs from dusk's end back to dawn's start.
    #[test]
    fn derived_windows_chain(
        sunrise in minute_strategy(),
        sunset in minute_strategy(),
        offsets in offsets_strategy()
    ) {
        let schedule = derive_sun_schedule(&sun_times(sunrise, sunset), &offsets);
        prop_assert_eq!(schedule.dawn.end, schedule.day.start);
        prop_assert_eq!(schedule.day.end, schedule.dusk.start);
        prop_assert_eq!(schedule.dusk.end, schedule.night.start);
        prop_assert_eq!(schedule.night.end, schedule.dawn.start);
    }

    /// The four derived windows partition the day with no gap: every
    /// minute resolves to a phase whose window actually contains it.
    #[test]
    fn derived_schedule_has_no_gaps(
        sunrise in minute_strategy(),
        sunset in minute_strategy(),
        offsets in offsets_strategy(),
        minute in minute_strategy()
    ) {
        let schedule = derive_sun_schedule(&sun_times(sunrise, sunset), &offsets);
        let phase = schedule.phase_at(minute);
        prop_assert!(
            schedule.window(phase).contains(minute),
            "minute {} resolved to {} whose window {:?} does not contain it",
            minute, phase, schedule.window(phase)
        );
    }

    /// All boundaries stay in [0, 1440) even when offsets push a solar
    /// event across midnight.
    #[test]
    fn boundaries_stay_normalized(
        sunrise in minute_strategy(),
        sunset in minute_strategy(),
        offsets in offsets_strategy()
    ) {
        let schedule = derive_sun_schedule(&sun_times(sunrise, sunset), &offsets);
        for phase in Phase::ORDER {
            let window = schedule.window(phase);
            prop_assert!(window.start < 1440);
            prop_assert!(window.end < 1440);
        }
    }
}

/// Generate valid HH:MM strings
fn time_string_strategy() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}"))
}

proptest! {
    /// Any well-formed override schedule still resolves every minute to
    /// exactly one phase, and night catches whatever no window covers.
    #[test]
    fn overridden_schedule_always_resolves(
        dawn_start in time_string_strategy(),
        dawn_end in time_string_strategy(),
        day_end in time_string_strategy(),
        minute in minute_strategy()
    ) {
        let overrides = ScheduleOverrides {
            dawn: Some(WindowOverride {
                start: Some(dawn_start),
                end: Some(dawn_end.clone()),
            }),
            day: Some(WindowOverride {
                start: Some(dawn_end),
                end: Some(day_end),
            }),
            ..Default::default()
        };
        let schedule = Schedule::normalize(&overrides).unwrap();
        let phase = schedule.phase_at(minute);
        // Either the phase's own window contains the minute, or night
        // applied as the fallback
        prop_assert!(
            schedule.window(phase).contains(minute) || phase == Phase::Night
        );
    }
}
