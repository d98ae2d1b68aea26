use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use term_snake::config::{Args, Settings};
use term_snake::game::{self, Outcome};
use term_snake::term::{with_session, TermManager};

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let settings = Settings::from(&args);
    let mut term = TermManager::new().context("reading terminal size")?;

    // The terminal is back to normal by the time this returns
    let res = with_session(&mut term, |term| game::play(term, &settings));

    match &res {
        Ok(Outcome::Quit) => info!("bye"),
        Ok(Outcome::Crashed { length }) => info!(length, "game over"),
        Err(err) => error!(%err, "game aborted"),
    }

    res.map(|_| ()).context("game aborted")
}

fn init_logging(args: &Args) -> Result<()> {
    // stdout belongs to the game, only log when there's a file to log to
    let path = match &args.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
