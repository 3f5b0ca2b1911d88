//! agentscope CLI Binary
//!
//! Validates and inspects global and project agent configurations. Exits
//! with status 1 when a command fails or finds invalid agent files.

use agentscope::error::ApiError;
use agentscope::logging::{init_logging, resolve_log_file_path, LogOutput, LoggingConfig};
use agentscope::tooling::cli::{command_name, load_config, map_error, Cli, RunContext, ScopeOverrides};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(Some(&logging_for(&cli))) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            tracing::info!(
                command = command_name(&cli.command),
                "Invalid agent files found"
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(command = command_name(&cli.command), "{}", e);
            eprintln!("{}", map_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// Execute the command and print its output; `Ok(false)` means the command
/// completed but reported invalid agents.
fn run(cli: &Cli) -> Result<bool, ApiError> {
    let context = RunContext::new(
        cli.workspace.clone(),
        cli.config.clone(),
        ScopeOverrides::from(cli),
    )?;
    let output = context.execute(&cli.command)?;
    println!("{}", output.text);
    Ok(output.success)
}

/// Logging settings: the `[logging]` config section with CLI flags on top.
///
/// A configuration that fails to load falls back to defaults here; the
/// command itself reports the error once logging is up.
fn logging_for(cli: &Cli) -> LoggingConfig {
    let mut logging = load_config(&cli.workspace, cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();

    logging.enabled &= !cli.quiet;
    if cli.verbose {
        logging.level = "debug".to_string();
        // Verbose output stays visible when the config logs to a file.
        if logging.output == LogOutput::File {
            logging.output = LogOutput::FileAndStderr;
        }
    }
    if let Some(level) = &cli.log_level {
        logging.level.clone_from(level);
    }
    logging.format = cli.log_format.unwrap_or(logging.format);
    logging.output = cli.log_output.unwrap_or(logging.output);

    if logging.enabled && logging.output.uses_file() {
        logging.file = resolve_log_file_path(
            cli.log_file.clone(),
            logging.file.take(),
            Some(cli.workspace.as_path()),
        )
        .ok();
    } else if cli.log_file.is_some() {
        logging.file = cli.log_file.clone();
    }

    logging
}
