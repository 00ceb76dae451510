//! cvwizard CLI: scripted access to the résumé backend.
//!
//! Loads résumé drafts into the wizard's form model and runs submit,
//! summary, job search, apply and download against the backend.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
