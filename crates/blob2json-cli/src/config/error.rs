//! Configuration errors.

use thiserror::Error;

/// Errors raised while turning command-line flags into a builder configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Arguments could not be parsed.
    #[error("invalid command-line arguments")]
    Arguments(#[from] clap::Error),

    /// `--name` was not given or was empty.
    #[error("--name is required")]
    MissingName,

    /// A `--metadata` value was not of the form `key=value`.
    #[error("invalid --metadata value")]
    InvalidMetadata(#[source] blob2json_core::Error),

    /// `--last-modified` was not a valid RFC 3339 timestamp.
    #[error("unable to parse last-modified time")]
    InvalidLastModified(#[source] blob2json_core::Error),
}
