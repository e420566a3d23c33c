//! Application-wide constants and default values.
//!
//! Collects the built-in schedule boundaries, sun offsets, accessibility
//! thresholds, and bias magnitudes in one place so the defaults used by
//! configuration merging, validation, and the session loop stay in sync.

/// Minutes in a full day; every window boundary lives in `[0, 1440)`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// Default time-based schedule boundaries (HH:MM)
pub const DEFAULT_DAWN_START: &str = "05:30";
pub const DEFAULT_DAWN_END: &str = "08:30";
pub const DEFAULT_DAY_START: &str = "08:30";
pub const DEFAULT_DAY_END: &str = "17:30";
pub const DEFAULT_DUSK_START: &str = "17:30";
pub const DEFAULT_DUSK_END: &str = "21:30";
pub const DEFAULT_NIGHT_START: &str = "21:30";
pub const DEFAULT_NIGHT_END: &str = "05:30";

// Default symmetric offsets around solar events, in minutes
pub const DEFAULT_DAWN_OFFSET_BEFORE: i32 = 45;
pub const DEFAULT_DAWN_OFFSET_AFTER: i32 = 45;
pub const DEFAULT_DUSK_OFFSET_BEFORE: i32 = 45;
pub const DEFAULT_DUSK_OFFSET_AFTER: i32 = 45;

// Default accessibility thresholds
pub const DEFAULT_MINIMUM_RATIO: f64 = 4.5;
pub const DEFAULT_LARGE_TEXT_RATIO: f64 = 3.0;
pub const DEFAULT_MAX_CONTRAST_ITERATIONS: u32 = 24;

/// Minimum ratio floor applied when the system signals "more contrast".
pub const CONTRAST_MORE_FLOOR: f64 = 7.0;
/// Minimum ratio ceiling applied when the system signals "less contrast".
pub const CONTRAST_LESS_CEILING: f64 = 3.0;

/// Lightness step, in percentage points, per contrast repair iteration.
pub const CONTRAST_REPAIR_STEP: f64 = 2.0;

// Default color-scheme bias magnitudes (lightness percentage points)
pub const DEFAULT_DARK_BIAS: f64 = -8.0;
pub const DEFAULT_LIGHT_BIAS: f64 = 8.0;

// Default transition hint
pub const DEFAULT_TRANSITION_ENABLED: bool = false;
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 200;

/// Safety margin added past a transition boundary before the timer fires,
/// so coarse timer granularity cannot wake the loop fractionally early.
pub const TRANSITION_TIMER_MARGIN_MS: u64 = 500;

/// Default key under which mode and phase override are persisted.
pub const DEFAULT_STORAGE_KEY: &str = "cui-preferences";

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "circadia.toml";
