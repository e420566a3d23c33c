//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a
//! clean interface for the main dispatch logic. It supports the standard
//! help and version flags while gracefully handling unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print the resolved theme for now (or for `--at HH:MM`)
    GetCommand {
        config_path: Option<String>,
        at: Option<String>,
        json: bool,
    },
    /// Run a live session, logging each applied theme
    RunCommand { config_path: Option<String> },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
#[derive(Debug)]
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse arguments (excluding the program name).
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let args: Vec<String> = args.into_iter().collect();

        let action = match args.first().map(String::as_str) {
            None => CliAction::ShowHelp,
            Some("-h" | "--help" | "help") => CliAction::ShowHelp,
            Some("-V" | "--version" | "version") => CliAction::ShowVersion,
            Some("get") => parse_get(&args[1..]),
            Some("run") => parse_run(&args[1..]),
            Some(_) => CliAction::ShowHelpDueToError,
        };

        Self { action }
    }
}

fn parse_get(args: &[String]) -> CliAction {
    let mut config_path = None;
    let mut at = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(value) => config_path = Some(value.clone()),
                None => return CliAction::ShowHelpDueToError,
            },
            "--at" => match iter.next() {
                Some(value) => at = Some(value.clone()),
                None => return CliAction::ShowHelpDueToError,
            },
            "--json" => json = true,
            _ => return CliAction::ShowHelpDueToError,
        }
    }

    CliAction::GetCommand {
        config_path,
        at,
        json,
    }
}

fn parse_run(args: &[String]) -> CliAction {
    let mut config_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(value) => config_path = Some(value.clone()),
                None => return CliAction::ShowHelpDueToError,
            },
            _ => return CliAction::ShowHelpDueToError,
        }
    }

    CliAction::RunCommand { config_path }
}

/// Display help information.
pub fn show_help() {
    println!("circadia v{}", env!("CARGO_PKG_VERSION"));
    println!("Time-of-day UI theming engine");
    println!();
    println!("Usage: circadia <command> [options]");
    println!();
    println!("Commands:");
    println!("  get            Print the resolved theme");
    println!("      --at HH:MM     Evaluate at a specific time of day");
    println!("      --json         Machine-readable output");
    println!("      --config PATH  Use an explicit config file");
    println!("  run            Run a live session until interrupted");
    println!("      --config PATH  Use an explicit config file");
    println!("  help           Show this help");
    println!("  version        Show version");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        ParsedArgs::parse(args.iter().map(|s| s.to_string())).action
    }

    #[test]
    fn parses_get_with_options() {
        assert_eq!(
            parse(&["get", "--at", "06:15", "--json"]),
            CliAction::GetCommand {
                config_path: None,
                at: Some("06:15".into()),
                json: true,
            }
        );
    }

    #[test]
    fn parses_run_with_config() {
        assert_eq!(
            parse(&["run", "--config", "/tmp/c.toml"]),
            CliAction::RunCommand {
                config_path: Some("/tmp/c.toml".into()),
            }
        );
    }

    #[test]
    fn unknown_arguments_fall_back_to_help() {
        assert_eq!(parse(&["frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["get", "--at"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse(&[]), CliAction::ShowHelp);
    }
}
