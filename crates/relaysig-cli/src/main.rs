//! Relay signal normalization CLI.

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use relaysig_cli::config::{AppConfig, ConfigOverrides};
use relaysig_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_alias, run_catalog, run_comtrade, run_validate, run_xrio};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("error: failed to initialize logging: {error:#}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Comtrade(args) => run_comtrade(args, cli.json),
        Command::Xrio(args) => run_xrio(args, cli.json),
        Command::Validate(args) => run_validate(args, &settings_from_cli(cli)?, cli.json),
        Command::Alias(command) => run_alias(command, &settings_from_cli(cli)?, cli.json),
        Command::Catalog(command) => run_catalog(command, &settings_from_cli(cli)?, cli.json),
    }
}

/// Settings file values with command-line overrides applied.
fn settings_from_cli(cli: &Cli) -> Result<AppConfig> {
    let limit = match &cli.command {
        Command::Validate(args) => args.limit,
        _ => None,
    };
    let overrides = ConfigOverrides {
        store_path: cli.store.clone(),
        catalog_path: cli.catalog.clone(),
        suggestion_limit: limit,
    };
    Ok(AppConfig::discover(cli.config.as_deref(), Path::new("."))?.with_overrides(&overrides))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
