#![warn(clippy::all, clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use dwimsh::{
    CommandIndex, Config, Dispatcher, SimilarityEngine,
    cli::Cli,
    dispatch::BuiltinHost,
    display::TerminalHost,
    shell::{EditorInput, Session},
};
use log::info;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    #[cfg(unix)]
    dwimsh::shell::install_signal_handlers()?;

    let index = CommandIndex::from_env(config.max_commands);
    if index.is_truncated() {
        info!(
            "Indexed {} commands, stopped at the limit of {}",
            index.len(),
            index.capacity()
        );
    } else {
        info!("Indexed {} commands", index.len());
    }

    let mut host = TerminalHost::new(io::stdout(), config.history_size);
    if config.show_banner {
        host.banner()?;
    }

    let mut input = EditorInput::new(&index, config.history_size, config.history_path())
        .context("Failed to start the line editor")?;
    for line in input.recalled() {
        host.remember(&line);
    }

    let session = Session::new(
        Dispatcher::new(&index),
        SimilarityEngine::from_config(&config),
    );
    session
        .run(&mut input, &mut host, &mut io::stdout())
        .context("Shell terminated unexpectedly")?;

    Ok(())
}
