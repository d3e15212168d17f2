use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use verse_terminal::app::{self, Exit};
use verse_terminal::config::{Cli, Settings};

// The terminal belongs to the UI while the session runs, so logs go to a file.
fn init_logging(settings: &Settings) -> Result<()> {
    let file = File::create(&settings.log_file)
        .with_context(|| format!("creating log file {}", settings.log_file.display()))?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(settings.log_level, config, file).context("installing logger")?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let settings = Settings::resolve(Cli::parse())?;
    init_logging(&settings)?;
    log::info!("starting with source {}", settings.source);

    match app::run(settings).await? {
        Exit::Quit => {}
        Exit::Navigate(target) => println!("{target}"),
    }
    Ok(())
}
