//! # Circadia Library
//!
//! Internal library for the circadia binary and embedding applications.
//!
//! Circadia computes a time-of-day UI theme: it resolves which of four
//! phases (dawn, day, dusk, night) is active for a given wall-clock time
//! or sunrise/sunset pair, maps the phase to a set of color tokens,
//! adjusts those tokens for system preferences and WCAG contrast, and
//! schedules the next phase transition.
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Entry Point**: `Session` owns a live theme session with its timer
//!   deadline, collaborators, and current resolved state
//! - **Core Logic**: `schedule`, `sun`, `color`, `contrast`, `tokens`, and
//!   `prefs` are pure, synchronous modules with no I/O
//! - **Collaborators**: `storage` (persisted mode/override), `presenter`
//!   (applies CSS variables), `prefs::SystemPreferenceSource` (live system
//!   preference snapshots)
//! - **Configuration**: `config` module for TOML-based settings with
//!   validation
//! - **Infrastructure**: logging and an injectable time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod color;
pub mod commands;
pub mod config;
pub mod constants;
pub mod contrast;
pub mod prefs;
pub mod presenter;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod sun;
pub mod time_source;
pub mod tokens;

// Re-export for binary and embedders
pub use schedule::Phase;
pub use session::{ResolvedState, ScheduleMode, Session};
