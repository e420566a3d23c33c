//! Run command implementation: a live session on the terminal.
//!
//! Starts a session with the stdout presenter and drives it until the
//! process is interrupted. Each phase transition and preference change
//! logs the newly applied theme.

use anyhow::Result;

use crate::presenter::StdoutPresenter;
use crate::session::Session;

/// Handle the run command.
pub fn handle_run_command(config_path: Option<&str>) -> Result<()> {
    log_version!();

    let config = super::load_config(config_path)?;
    let mut session = Session::builder(config)
        .with_presenter(StdoutPresenter)
        .build()?;

    session.run();
    log_end!();
    Ok(())
}
