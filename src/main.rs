mod cli;
mod config;
mod export;
mod identity;
mod model;
mod storage;
mod suggest;
mod triage;

use std::process;

use tracing_subscriber::EnvFilter;

use config::Config;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("ELDERCONNECT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
