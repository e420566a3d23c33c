//! Presentation collaborator.
//!
//! The session hands each resolved theme to a presenter: a phase tag plus
//! a flat map of CSS-custom-property-style keys to color values, with an
//! optional transition-duration hint. What the presenter does with them
//! (writes to a DOM root, a terminal, a stylesheet) is outside core scope.

use std::time::Duration;

use crate::schedule::Phase;

/// Receives resolved themes from the session.
pub trait Presenter: Send {
    /// Apply a resolved theme to the presentation root.
    ///
    /// `transition` is `None` when transitions are disabled or suppressed
    /// by a reduced-motion preference.
    fn apply(&mut self, phase: Phase, css_vars: &[(&'static str, String)], transition: Option<Duration>);
}

/// Presenter that discards everything. Useful for headless evaluation.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn apply(&mut self, _phase: Phase, _css_vars: &[(&'static str, String)], _transition: Option<Duration>) {}
}

/// Presenter that logs each applied theme, used by the CLI `run` command.
#[derive(Debug, Default)]
pub struct StdoutPresenter;

impl Presenter for StdoutPresenter {
    fn apply(&mut self, phase: Phase, css_vars: &[(&'static str, String)], transition: Option<Duration>) {
        log_block_start!("Applying {phase} theme");
        if let Some(duration) = transition {
            log_indented!("transition: {}ms", duration.as_millis());
        }
        for (key, value) in css_vars {
            log_indented!("{key}: {value}");
        }
    }
}
