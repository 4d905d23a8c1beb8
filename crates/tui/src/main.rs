mod options;
mod renderer;
mod terminal;

use std::rc::Rc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use vantage_core::{ClassifierConfig, DeviceObserver, ManualEvents, ManualScheduler};

use crate::options::Command;
use crate::terminal::TerminalProvider;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = match options::parse(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            eprintln!("{}", options::USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}\n\n{}", options::USAGE);
            std::process::exit(2);
        }
    };

    let config = match &options.config {
        Some(path) => ClassifierConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    tracing::info!(?config, cell = ?options.cell, "starting");

    let events = ManualEvents::new();
    let clock = ManualScheduler::new();
    let observer = DeviceObserver::new(
        TerminalProvider::new(options.cell),
        events.clone(),
        Rc::new(clock.clone()),
        config,
    );

    renderer::run_tui(&observer, &events, &clock)
}
