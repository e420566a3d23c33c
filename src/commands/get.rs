//! Get command implementation for reading the resolved theme.
//!
//! Evaluates the theme for the current time (or an explicit `--at HH:MM`)
//! and prints it in human-readable or JSON form. The command is
//! read-only: it seeds from persisted state but never writes it.

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime, TimeZone};
use serde_json::json;
use std::sync::Arc;

use crate::logger::Log;
use crate::presenter::NullPresenter;
use crate::session::Session;
use crate::time_source::{FixedTimeSource, RealTimeSource, TimeSource};

/// Handle the get command.
pub fn handle_get_command(config_path: Option<&str>, at: Option<&str>, json: bool) -> Result<()> {
    // Keep stdout clean when it carries machine-readable output
    if json {
        Log::set_enabled(false);
    }

    let config = super::load_config(config_path)?;

    let time: Arc<dyn TimeSource> = match at {
        Some(at) => {
            let time = NaiveTime::parse_from_str(at, "%H:%M")
                .with_context(|| format!("Invalid --at time '{at}', expected HH:MM"))?;
            let date = Local::now().date_naive().and_time(time);
            let instant = Local
                .from_local_datetime(&date)
                .single()
                .with_context(|| format!("Ambiguous local time '{at}'"))?;
            Arc::new(FixedTimeSource::new(instant))
        }
        None => Arc::new(RealTimeSource),
    };

    // The default file store is only read here: get never mutates mode or
    // override, so nothing writes back
    let mut session = Session::builder(config)
        .with_presenter(NullPresenter)
        .with_time_source(time)
        .build()?;
    let state = session.start().clone();

    if json {
        let vars: serde_json::Map<String, serde_json::Value> = state
            .tokens
            .css_vars()
            .into_iter()
            .map(|(key, value)| (key.to_string(), json!(value)))
            .collect();
        let output = json!({
            "phase": state.phase.as_str(),
            "mode": state.mode.as_str(),
            "resolved_mode": state.resolved_mode.as_str(),
            "next_change_at": state.next_change_at.map(|at| at.to_rfc3339()),
            "tokens": vars,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    log_version!();
    log_block_start!("Resolved theme");
    log_indented!("phase: {}", state.phase);
    log_indented!("mode: {} (resolved: {})", state.mode, state.resolved_mode);
    match state.next_change_at {
        Some(at) => log_indented!("next transition: {}", at.format("%Y-%m-%d %H:%M")),
        None => log_indented!("next transition: none (manual mode)"),
    }
    log_block_start!("Tokens");
    for (key, value) in state.tokens.css_vars() {
        log_indented!("{key}: {value}");
    }
    log_end!();

    Ok(())
}
