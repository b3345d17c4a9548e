//! Polarity CLI binary.

use std::process;

use clap::Parser;
use polarity::cli::{PolarityArgs, execute_command};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = PolarityArgs::parse();

    // RUST_LOG wins over the verbosity flags.
    let level = args.log_filter();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("polarity={level},tower_http={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
