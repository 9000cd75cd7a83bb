mod cli;
mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use shiftboard_logging::{board_info, level_for_verbosity};

use cli::Cli;
use platform::app::Session;
use platform::config::{self, DEFAULT_CONFIG_PATH};
use platform::logging::{self, LogDestination};
use platform::{commands, render};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let (mut config, config_source) = config::load(&config_path)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let destination = if config.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, level_for_verbosity(cli.verbose));
    board_info!("Loaded config from {config_source}");
    board_info!("Using API at {}", config.base_url);

    let mut session = Session::start(&config).context("failed to start the API engine")?;
    let result = commands::run(cli.command, &mut session);

    let notices = session.take_notices();
    for notice in &notices {
        eprintln!("{}", render::notice(notice));
    }
    println!("{}", result?);

    Ok(if commands::any_failed(&notices) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
