//! `recbook` - CLI for recordbook
//!
//! This binary runs the interactive record shell and inspects the
//! configuration it uses.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::{Context, Result};
use clap::Parser;

use recordbook::cli::{Cli, Command, ConfigCommand, ShellCommand};
use recordbook::shell::{load_seed, Shell, ShellSettings};
use recordbook::{init_logging, Config, Controller};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        Command::Shell(shell_cmd) => {
            let config = Config::load_from(cli.config).context("loading configuration")?;
            handle_shell(&config, &shell_cmd)
        }
        // Validation reports its own load errors.
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn handle_shell(config: &Config, cmd: &ShellCommand) -> Result<()> {
    let mut controller = Controller::new(config);

    if let Some(path) = &cmd.seed {
        let drafts = load_seed(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let added = controller
            .load_drafts(drafts)
            .with_context(|| format!("loading records from {}", path.display()))?;
        tracing::info!(added, "Seeded store");
    }

    let settings = ShellSettings {
        format: cmd.format,
        timestamp_format: config.view.timestamp_format.clone(),
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(controller, stdin.lock(), stdout.lock(), settings);
    shell.run().context("shell session failed")?;
    Ok(())
}

fn handle_config(config_path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path).context("loading configuration")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[View]");
                println!("  Page size:          {}", config.view.page_size);
                println!("  Search scope:       {:?}", config.view.search_scope);
                println!("  Timestamp format:   {}", config.view.timestamp_format);
                println!();
                println!("[Validation]");
                println!(
                    "  Min keyword:        {}",
                    config.validation.min_keyword_length
                );
                println!(
                    "  Min description:    {}",
                    config.validation.min_description_length
                );
                println!();
                println!("[Notices]");
                println!("  Enabled:            {}", config.notices.enabled);
                println!("  Auto dismiss (ms):  {}", config.notices.auto_dismiss_ms);
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => anyhow::bail!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
