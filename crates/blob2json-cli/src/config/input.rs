//! Input source configuration.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Where the blob body is read from.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct InputArgs {
    /// Read the blob body from this file instead of standard input.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    /// Opens the configured source.
    ///
    /// The returned reader owns the file handle, which is closed when the
    /// reader is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be opened.
    pub fn open(&self) -> anyhow::Result<Box<dyn Read>> {
        let Some(path) = &self.input else {
            return Ok(Box::new(io::stdin().lock()));
        };

        let file = File::open(path)
            .with_context(|| format!("unable to open input file {}", path.display()))?;
        Ok(Box::new(file))
    }

    /// Logs input configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            input = %self.describe(),
            "input configuration"
        );
    }

    fn describe(&self) -> String {
        self.input
            .as_ref()
            .map_or_else(|| "<stdin>".to_owned(), |path| path.display().to_string())
    }
}
