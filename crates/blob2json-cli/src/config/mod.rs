//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── envelope: EnvelopeArgs  # Name, content type/encoding, metadata, limits
//! └── input: InputArgs        # Optional input file (stdin otherwise)
//! ```
//!
//! Most options can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # Wrap a file read from stdin
//! blob2json --name blob.dat --metadata source=upload < blob.dat
//!
//! # Or via environment variables
//! BLOB2JSON_NAME=blob.dat BLOB2JSON_MAX_BYTES=4096 blob2json < blob.dat
//! ```

mod envelope;
mod error;
mod input;

use std::ffi::OsString;
use std::process;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
pub use envelope::EnvelopeArgs;
pub use error::ConfigError;
pub use input::InputArgs;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
///
/// Combines all configuration groups for the blob2json adapter:
/// - [`EnvelopeArgs`]: What goes into the envelope
/// - [`InputArgs`]: Where the blob body comes from
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "blob2json")]
#[command(about = "Wrap a byte stream in a self-describing JSON envelope")]
#[command(version)]
pub struct Cli {
    /// Envelope description and read limits.
    #[clap(flatten)]
    pub envelope: EnvelopeArgs,

    /// Input source.
    #[clap(flatten)]
    pub input: InputArgs,
}

impl Cli {
    /// Parses the process arguments.
    ///
    /// `--help` and `--version` print and exit with status 0; any other
    /// parse failure is returned so the caller can exit with status 1.
    pub fn init() -> Result<Self, ConfigError> {
        Self::from_args(std::env::args_os())
    }

    /// Parses the given arguments, the first being the binary name.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e)
                if matches!(
                    e.kind(),
                    ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
                ) =>
            {
                e.exit()
            }
            Err(e) => Err(ConfigError::Arguments(e)),
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "Build information"
        );
    }

    /// Logs configuration at debug level.
    pub fn log(&self) {
        Self::log_build_info();
        self.envelope.log();
        self.input.log();
    }
}
