//! CLI dispatch for circadia.

use circadia::args::{CliAction, ParsedArgs, show_help};
use circadia::commands;

fn main() {
    let parsed = ParsedArgs::parse(std::env::args().skip(1));

    let result = match parsed.action {
        CliAction::GetCommand {
            config_path,
            at,
            json,
        } => commands::get::handle_get_command(config_path.as_deref(), at.as_deref(), json),
        CliAction::RunCommand { config_path } => {
            commands::run::handle_run_command(config_path.as_deref())
        }
        CliAction::ShowHelp => {
            show_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            println!("circadia v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            show_help();
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        circadia::log_error!("{e:#}");
        std::process::exit(1);
    }
}
