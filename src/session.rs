//! Live theme session.
//!
//! A [`Session`] is an explicit object owning everything a live,
//! re-evaluating theme needs: its collaborators (store, preference source,
//! presenter, sun-times provider, time source), its current resolved
//! state, and its wake deadline. Construct one per mount, start it, and
//! drop it to tear everything down; there is no ambient global state.
//!
//! ## Evaluation cycle
//!
//! Each cycle is one synchronous pass: resolve the effective mode (auto
//! resolves to sun when the provider has data, otherwise time; that policy
//! is decided fresh every cycle because sun-data availability can change),
//! derive or normalize the schedule once, look up the phase, resolve
//! tokens, apply color-scheme bias, repair contrast, hand the result to
//! the presenter, and compute the next transition instant. The loop is
//! single-threaded; a pass fully completes, including scheduling of the
//! next wake, before another can be triggered. The pending deadline is
//! replaced wholesale each pass, so a superseded configuration can never
//! fire a stale re-evaluation.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::{Config, validate_config};
use crate::constants::TRANSITION_TIMER_MARGIN_MS;
use crate::contrast::ensure_contrast;
use crate::prefs::{
    Subscription, SystemPreferenceSource, SystemPreferences, resolve_accessibility, resolve_mode,
};
use crate::presenter::{NullPresenter, Presenter};
use crate::schedule::{Phase, Schedule, minute_of_day};
use crate::storage::{FileStore, NoopStore, PersistedState, StateStore};
use crate::sun::{SunTimes, SunTimesProvider, derive_sun_schedule};
use crate::time_source::{RealTimeSource, TimeSource};
use crate::tokens::TokenSet;

pub use crate::prefs::ScheduleMode;

/// The session's current resolved state, replaced wholesale each pass.
#[derive(Debug, Clone)]
pub struct ResolvedState {
    /// Active phase
    pub phase: Phase,
    /// User-facing mode (what the user or config asked for)
    pub mode: ScheduleMode,
    /// Effective scheduling strategy after auto/sun fallback
    pub resolved_mode: ScheduleMode,
    /// Fully adjusted token set handed to the presenter
    pub tokens: TokenSet,
    /// Next transition instant; `None` in manual mode
    pub next_change_at: Option<DateTime<Local>>,
}

enum Event {
    PreferencesChanged(SystemPreferences),
    Shutdown,
}

/// Handle for stopping a running session loop from another thread.
#[derive(Clone)]
pub struct SessionHandle {
    tx: Sender<Event>,
}

impl SessionHandle {
    pub fn stop(&self) {
        let _ = self.tx.send(Event::Shutdown);
    }
}

/// Builder for a [`Session`]; unset collaborators get working defaults.
pub struct SessionBuilder {
    config: Config,
    store: Option<Box<dyn StateStore>>,
    prefs_source: Option<Box<dyn SystemPreferenceSource>>,
    presenter: Option<Box<dyn Presenter>>,
    sun_provider: Option<SunTimesProvider>,
    time: Option<Arc<dyn TimeSource>>,
}

impl SessionBuilder {
    pub fn with_store(mut self, store: impl StateStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn with_preference_source(
        mut self,
        source: impl SystemPreferenceSource + 'static,
    ) -> Self {
        self.prefs_source = Some(Box::new(source));
        self
    }

    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    pub fn with_sun_times_provider(
        mut self,
        provider: impl Fn(DateTime<Local>) -> Option<SunTimes> + Send + 'static,
    ) -> Self {
        self.sun_provider = Some(Box::new(provider));
        self
    }

    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = Some(time);
        self
    }

    /// Validate the configuration and assemble the session.
    pub fn build(self) -> Result<Session> {
        validate_config(&self.config)?;
        // Normalized once here; the time-based schedule cannot change
        // during a session's lifetime. Sun-derived schedules are computed
        // fresh each cycle instead.
        let time_schedule = Schedule::normalize(&self.config.schedule_overrides())?;

        let store: Box<dyn StateStore> = match self.store {
            Some(store) => store,
            // Storage being unavailable degrades to "no persisted state"
            None if self.config.persist_enabled() => match FileStore::new() {
                Ok(store) => Box::new(store),
                Err(_) => Box::new(NoopStore),
            },
            None => Box::new(NoopStore),
        };

        let (events_tx, events_rx) = channel();

        Ok(Session {
            config: self.config,
            time_schedule,
            store,
            prefs_source: self
                .prefs_source
                .unwrap_or_else(|| Box::new(crate::prefs::NoPreferenceSource)),
            presenter: self.presenter.unwrap_or_else(|| Box::new(NullPresenter)),
            sun_provider: self.sun_provider,
            time: self.time.unwrap_or_else(|| Arc::new(RealTimeSource)),
            events_tx,
            events_rx,
            subscription: None,
            system_prefs: SystemPreferences::default(),
            user_mode: None,
            phase_override: None,
            state: None,
            started: false,
            stop_requested: false,
        })
    }
}

/// A live theme session. See the module docs for the evaluation cycle.
pub struct Session {
    config: Config,
    time_schedule: Schedule,
    store: Box<dyn StateStore>,
    prefs_source: Box<dyn SystemPreferenceSource>,
    presenter: Box<dyn Presenter>,
    sun_provider: Option<SunTimesProvider>,
    time: Arc<dyn TimeSource>,
    events_tx: Sender<Event>,
    events_rx: Receiver<Event>,
    subscription: Option<Subscription>,
    system_prefs: SystemPreferences,
    user_mode: Option<ScheduleMode>,
    phase_override: Option<Phase>,
    state: Option<ResolvedState>,
    started: bool,
    stop_requested: bool,
}

impl Session {
    pub fn builder(config: Config) -> SessionBuilder {
        SessionBuilder {
            config,
            store: None,
            prefs_source: None,
            presenter: None,
            sun_provider: None,
            time: None,
        }
    }

    /// Seed persisted state, subscribe to preference changes, and run the
    /// first evaluation pass.
    pub fn start(&mut self) -> &ResolvedState {
        if self.started {
            return self.tick();
        }

        // Read-once seed; any storage failure means "no persisted state"
        if self.config.persist_enabled() {
            match self.store.load(self.config.storage_key()) {
                Ok(Some(persisted)) => {
                    self.user_mode = persisted.mode;
                    self.phase_override = persisted.phase;
                }
                Ok(None) => {}
                Err(e) => {
                    log_debug!("Ignoring unreadable persisted state: {e:#}");
                }
            }
        }

        self.system_prefs = self.prefs_source.snapshot();
        let tx = self.events_tx.clone();
        self.subscription = Some(self.prefs_source.subscribe(Box::new(move |prefs| {
            let _ = tx.send(Event::PreferencesChanged(prefs));
        })));

        self.started = true;

        // Paint the configured initial phase before the first full
        // evaluation so a slow provider cannot leave the wrong theme up
        if let Some(phase) = self.config.initial_phase {
            let tokens = self.adjusted_tokens(phase);
            self.presenter
                .apply(phase, &tokens.css_vars(), self.transition_hint());
        }

        self.tick()
    }

    /// Run one synchronous evaluation pass and return the new state.
    pub fn tick(&mut self) -> &ResolvedState {
        self.assert_active("tick");
        self.drain_events();

        let now = self.time.now();
        let user_mode = resolve_mode(self.user_mode, self.config.mode);

        // Auto and sun both need provider data; either falls back to
        // time-based scheduling for this cycle when it is missing. Decided
        // fresh every pass, never cached.
        let (resolved_mode, sun_times) = match user_mode {
            ScheduleMode::Auto | ScheduleMode::Sun => match self.query_sun(now) {
                Some(sun) => (ScheduleMode::Sun, Some(sun)),
                None => (ScheduleMode::Time, None),
            },
            other => (other, None),
        };

        // One schedule per cycle, shared by the phase lookup and the
        // next-transition computation
        let schedule = match sun_times {
            Some(sun) => derive_sun_schedule(&sun, &self.config.sun_offsets()),
            None => self.time_schedule,
        };

        let phase = if resolved_mode == ScheduleMode::Manual {
            self.phase_override
                .unwrap_or_else(|| schedule.phase_at(minute_of_day(&now)))
        } else {
            schedule.phase_at(minute_of_day(&now))
        };

        let next_change_at = (resolved_mode != ScheduleMode::Manual)
            .then(|| schedule.next_transition(now));

        let tokens = self.adjusted_tokens(phase);

        let phase_changed = self.state.as_ref().map(|s| s.phase) != Some(phase);
        if phase_changed {
            log_block_start!("Entering {phase} phase ({resolved_mode} scheduling)");
            if let Some(at) = next_change_at {
                log_indented!("next transition at {}", at.format("%H:%M"));
            }
        }

        self.presenter
            .apply(phase, &tokens.css_vars(), self.transition_hint());

        self.state = Some(ResolvedState {
            phase,
            mode: user_mode,
            resolved_mode,
            tokens,
            next_change_at,
        });
        self.state.as_ref().expect("state was just set")
    }

    /// Drive the session until the handle requests shutdown.
    ///
    /// Wakes at the previously computed transition instant plus a fixed
    /// safety margin, or immediately on a preference-change event.
    pub fn run(&mut self) {
        if !self.started {
            self.start();
        }
        loop {
            match self.events_rx.recv_timeout(self.wake_timeout()) {
                Ok(Event::PreferencesChanged(prefs)) => {
                    self.system_prefs = prefs;
                    self.tick();
                }
                Ok(Event::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.tick();
                }
            }
            if self.stop_requested {
                break;
            }
        }
    }

    /// Handle for stopping [`run`](Self::run) from another thread.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Latest resolved state, if the session has started.
    pub fn current(&self) -> Option<&ResolvedState> {
        self.state.as_ref()
    }

    /// Switch the scheduling mode.
    ///
    /// Entering manual mode without an existing override pins the current
    /// phase. Panics when called before [`start`](Self::start); using
    /// mutators outside an active session is a wiring bug.
    pub fn set_mode(&mut self, mode: ScheduleMode) -> &ResolvedState {
        self.assert_active("set_mode");
        self.user_mode = Some(mode);
        if mode == ScheduleMode::Manual && self.phase_override.is_none() {
            self.phase_override = self.state.as_ref().map(|s| s.phase);
        }
        self.persist();
        self.tick()
    }

    /// Pin a phase and switch to manual mode.
    ///
    /// Panics when called before [`start`](Self::start).
    pub fn set_phase_override(&mut self, phase: Phase) -> &ResolvedState {
        self.assert_active("set_phase_override");
        self.phase_override = Some(phase);
        self.user_mode = Some(ScheduleMode::Manual);
        self.persist();
        self.tick()
    }

    /// Drop any phase override and fall back to the configured mode.
    ///
    /// Panics when called before [`start`](Self::start).
    pub fn clear_override(&mut self) -> &ResolvedState {
        self.assert_active("clear_override");
        self.phase_override = None;
        self.user_mode = None;
        self.persist();
        self.tick()
    }

    fn assert_active(&self, operation: &str) {
        assert!(
            self.started,
            "{operation} requires an active session; call Session::start first"
        );
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                Event::PreferencesChanged(prefs) => self.system_prefs = prefs,
                Event::Shutdown => self.stop_requested = true,
            }
        }
    }

    fn query_sun(&self, now: DateTime<Local>) -> Option<SunTimes> {
        self.sun_provider.as_ref().and_then(|provider| provider(now))
    }

    /// Token pipeline for one phase: defaults + overrides, then
    /// color-scheme bias, then contrast repair.
    fn adjusted_tokens(&self, phase: Phase) -> TokenSet {
        let system_options = self.config.system_options();
        let mut tokens = TokenSet::resolve(phase, &self.config.token_overrides());
        if system_options.respect_color_scheme {
            tokens = tokens.with_color_scheme_bias(
                self.system_prefs.color_scheme,
                &self.config.color_scheme_bias(),
            );
        }
        let accessibility = resolve_accessibility(
            &self.system_prefs,
            &self.config.accessibility_overrides(),
            &system_options,
        );
        if accessibility.enforce_contrast {
            tokens = ensure_contrast(&tokens, &accessibility);
        }
        tokens
    }

    fn transition_hint(&self) -> Option<StdDuration> {
        let transition = self.config.transition_options();
        if !transition.enabled {
            return None;
        }
        let suppressed =
            self.system_prefs.reduced_motion && self.config.system_options().respect_reduced_motion;
        (!suppressed).then(|| StdDuration::from_millis(transition.duration_ms))
    }

    fn persist(&self) {
        if !self.config.persist_enabled() {
            return;
        }
        let state = PersistedState {
            mode: self.user_mode,
            phase: self.phase_override,
        };
        // Write failures are swallowed; persistence is best-effort
        if let Err(e) = self.store.save(self.config.storage_key(), &state) {
            log_debug!("Failed to persist state: {e:#}");
        }
    }

    fn wake_timeout(&self) -> StdDuration {
        let next = self.state.as_ref().and_then(|s| s.next_change_at);
        match next {
            Some(at) => {
                let until = (at - self.time.now()).to_std().unwrap_or_default();
                until + StdDuration::from_millis(TRANSITION_TIMER_MARGIN_MS)
            }
            // Manual mode schedules no transition; wake occasionally so a
            // changed sun provider still gets picked up eventually
            None => StdDuration::from_secs(3600),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("started", &self.started)
            .field("user_mode", &self.user_mode)
            .field("phase_override", &self.phase_override)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
