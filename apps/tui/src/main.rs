//! CV Wizard TUI: interactive terminal front end for the résumé wizard.
//!
//! Walks the six wizard steps, runs backend calls in the background and
//! writes its log to a file so the terminal stays clean. Built with
//! `ratatui` + `crossterm`.

mod app;
mod screens;
mod widgets;

use std::fs::OpenOptions;
use std::sync::Mutex;

use color_eyre::eyre::Result;
use cvwizard_shared::{config_dir, load_config};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = load_config()?;
    init_tracing()?;
    app::run(config)
}

/// Log to `~/.cvwizard/tui.log`; stdout belongs to the terminal UI.
fn init_tracing() -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tui.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cvwizard=info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
