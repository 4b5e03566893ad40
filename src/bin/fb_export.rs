//! Converts the Facebook export under `facebook_data/` into CSV files under `data/`.
//!
//! Takes no arguments. Log verbosity follows `RUST_LOG` (default `info`).

use std::process::ExitCode;

use fb_export::{run, Options};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    match run(&Options::default()) {
        Ok(paths) => {
            tracing::info!(files = paths.len(), "export complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fb-export: {err}");
            ExitCode::FAILURE
        }
    }
}
