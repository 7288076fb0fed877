// Main entry point for specrelay

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use specrelay::cli::Cli;
use specrelay::config::Config;
use specrelay::replay::{Fixture, Replay};
use specrelay::time::{Clock, ManualClock, SystemClock};
use specrelay::transport::WriterSink;
use specrelay::EventReporter;

use std::rc::Rc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "specrelay=debug,warn"
    } else {
        "specrelay=warn,error"
    };

    // Logs go to stderr; stdout carries only the event stream
    tracing_subscriber::fmt()
        .event_format(specrelay::logging::CustomFormatter)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    info!("Starting specrelay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::load().unwrap_or_default(),
    };
    cli.apply_overrides(&mut config);

    let fixture = Fixture::load(&cli.fixture)
        .with_context(|| format!("Failed to load fixture: {}", cli.fixture.display()))?;
    let replay = Replay::from_fixture(&fixture).context("Failed to build run from fixture")?;

    let clock = Rc::new(ManualClock::new(SystemClock.now()));
    let mut reporter = EventReporter::from_config_with_clock(
        &config,
        Some(Box::new(WriterSink::stdout())),
        Rc::clone(&clock),
    );
    replay.drive(&mut reporter, &clock);

    info!(
        specs = replay.run.specs().len(),
        recorded = reporter.results().len(),
        "Replay complete"
    );

    Ok(())
}
