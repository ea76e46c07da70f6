//! tome - Markdown processor.
//!
//! Converts markdown to HTML, XHTML or vBulletin markup:
//!
//! ```text
//! tome [options] [inputfile [outputfile]]
//! ```

mod error;
mod options;
mod output;
mod pipeline;

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use options::Cli;
use output::Output;

fn main() {
    let cli = Cli::parse_from(options::normalize_args(std::env::args_os()));
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let result = pipeline::run(
        &cli.render.format,
        &cli.settings(),
        &cli.files,
        io::stdin().lock(),
        io::stdout().lock(),
    );

    if let Err(err) = result {
        tracing::debug!(error = ?err, "Conversion failed");
        output.error(&format!("Error: {err}"));
        if err.shows_usage() {
            output.info(&Cli::command().render_usage().to_string());
        }
        std::process::exit(1);
    }
}
