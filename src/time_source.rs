//! Time source abstraction.
//!
//! The session never reads the system clock directly; it asks an injected
//! `TimeSource`. Production uses [`RealTimeSource`]; tests drive the clock
//! with [`FixedTimeSource`] so phase resolution and transition scheduling
//! are deterministic.

use chrono::{DateTime, Local};
use std::time::Duration;

/// Trait for abstracting time operations.
pub trait TimeSource: Send + Sync {
    /// Get the current local time.
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or simulate it).
    fn sleep(&self, duration: Duration);
}

/// Real-time implementation that uses the actual system clock.
#[derive(Debug, Default)]
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic time source that reports a fixed instant, advancing only
/// when told to (sleeps advance it by the slept duration). Used by tests
/// and by `get --at` for evaluating the theme at an arbitrary time.
#[derive(Debug)]
pub struct FixedTimeSource {
    now: std::sync::Mutex<DateTime<Local>>,
}

impl FixedTimeSource {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += duration;
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap_or_default();
    }
}
