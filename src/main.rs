use std::io;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    api::cli::Cli,
    config::{config::Config, store::OutputStore},
    downloader::YtDlp,
    history_repository::HistoryRepository,
    menu::Menu,
};

mod api;
mod config;
mod downloader;
mod errors;
mod history_repository;
mod link;
mod menu;
mod tools;
mod types;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<()> {
    let cli = Cli {};
    let program = cli.run();

    init_tracing(program.verbose);

    let config = Config::new_from_file(program.config)?;
    let extractor = tools::ensure_extractor(config.get_extractor())?;
    info!(path = %extractor.path.display(), version = %extractor.version, "using extractor");

    let history = if config.history_enabled() {
        open_history(&config)
    } else {
        None
    };

    let store = OutputStore::new(config.get_output_dir()?);
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut menu = Menu::new(
        stdin.lock(),
        stdout.lock(),
        YtDlp::new(extractor.path, config.get_user_agent()),
        store,
    )
    .with_history(history)
    .with_quality(config.get_quality())
    .with_stealth(config.stealth())
    .with_open_folder(config.open_folder());

    menu.run()?;
    info!(output_dir = %menu.output_dir().display(), "session ended");

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_history(config: &Config) -> Option<HistoryRepository> {
    let opened = config
        .get_history_path()
        .and_then(HistoryRepository::new);

    match opened {
        Ok(repository) => Some(repository),
        Err(e) => {
            warn!(error = %e, "download history unavailable");
            None
        }
    }
}
