#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod convert;
mod telemetry;

use std::{io, process};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_CLI: &str = "blob2json_cli";
pub const TRACING_TARGET_CONFIG: &str = "blob2json_cli::config";
pub const TRACING_TARGET_CONVERT: &str = "blob2json_cli::convert";

fn main() {
    let Err(error) = run() else {
        process::exit(0);
    };

    tracing::debug!(
        target: TRACING_TARGET_CLI,
        error = ?error,
        "blob2json terminated with error"
    );

    eprintln!("Error: {error:#}");
    process::exit(1);
}

/// Main application entry point.
fn run() -> anyhow::Result<()> {
    let cli = Cli::init()?;

    telemetry::init_tracing()?;
    cli.log();

    convert::convert(&cli, io::stdout().lock())
}
