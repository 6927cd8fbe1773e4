//! Command-line interface for recordbook.
//!
//! This module provides the CLI structure and the text rendering used by
//! the `recbook` binary.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, OutputFormat, ShellCommand};

/// recbook - Keep a searchable, paginated book of keyword records
///
/// Records live in memory for the length of a session; add, edit, delete,
/// search, and page through them from an interactive shell.
#[derive(Debug, Parser)]
#[command(name = "recbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive session
    Shell(ShellCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Log verbosity chosen by `-q` and `-v`; `-q` wins.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn shell_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Shell(ShellCommand {
                seed: None,
                format: OutputFormat::Table,
            }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "recbook");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(shell_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(shell_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(shell_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(shell_cli(2, false).verbosity(), Verbosity::Trace);
        assert_eq!(shell_cli(3, true).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_shell() {
        let cli = Cli::try_parse_from(["recbook", "shell"]).unwrap();
        match cli.command {
            Command::Shell(cmd) => {
                assert!(cmd.seed.is_none());
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            Command::Config(_) => panic!("expected shell"),
        }
    }

    #[test]
    fn test_parse_shell_with_seed_and_format() {
        let cli =
            Cli::try_parse_from(["recbook", "shell", "--seed", "records.json", "-f", "json"])
                .unwrap();
        match cli.command {
            Command::Shell(cmd) => {
                assert_eq!(cmd.seed, Some(PathBuf::from("records.json")));
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            Command::Config(_) => panic!("expected shell"),
        }
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["recbook", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["recbook", "-c", "/custom/config.toml", "shell"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["recbook", "-vv", "shell"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["recbook", "-q", "shell"]).unwrap();
        assert!(cli.quiet);
    }
}
