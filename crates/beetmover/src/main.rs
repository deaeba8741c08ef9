use std::process::ExitCode;

use anyhow::Result;
use beetmover::cli::{App, execute};
use beetmover::logging::init_logging;
use clap::Parser;
use tracing::error;

fn main() -> ExitCode {
    let app = App::parse();
    match run(&app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(failure) = err.downcast_ref::<beetmover::Error>() {
                error!(category = ?failure.category(), "{failure}");
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(app: &App) -> Result<()> {
    let config = app.load_config()?;
    init_logging(&config.logging)?;
    let output = execute(&app.cmd, &config)?;
    println!("{output}");
    Ok(())
}
