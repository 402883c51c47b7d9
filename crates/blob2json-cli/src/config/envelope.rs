//! Envelope configuration.

use blob2json_core::types::{LastModified, Metadata, MetadataEntry};
use blob2json_core::{BuilderConfig, DEFAULT_CONTENT_TYPE, DEFAULT_MAX_BYTES};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::TRACING_TARGET_CONFIG;

/// Envelope configuration.
///
/// Describes the blob being wrapped: its name, content type and encoding,
/// metadata, and how many bytes of input to read.
///
/// # Environment Variables
///
/// - `BLOB2JSON_NAME` - Blob name (required)
/// - `BLOB2JSON_CONTENT_TYPE` - Content type (default: application/octet-stream)
/// - `BLOB2JSON_CONTENT_ENCODING` - Content encoding (default: empty)
/// - `BLOB2JSON_LAST_MODIFIED` - Last-modified time in RFC 3339 format
/// - `BLOB2JSON_MAX_BYTES` - Maximum number of bytes to read (default: 1048576)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct EnvelopeArgs {
    /// The name of the blob (e.g. 'blob.dat').
    #[arg(long, env = "BLOB2JSON_NAME")]
    pub name: Option<String>,

    /// The content type of the blob.
    #[arg(long, env = "BLOB2JSON_CONTENT_TYPE", default_value = DEFAULT_CONTENT_TYPE)]
    pub content_type: String,

    /// The content encoding of the blob.
    #[arg(long, env = "BLOB2JSON_CONTENT_ENCODING", default_value = "")]
    #[serde(default)]
    pub content_encoding: String,

    /// The last modified time in RFC 3339 format.
    #[arg(long, env = "BLOB2JSON_LAST_MODIFIED", value_name = "RFC3339")]
    pub last_modified: Option<String>,

    /// The maximum number of bytes to read from the input.
    ///
    /// Input past this limit is silently dropped.
    #[arg(long, env = "BLOB2JSON_MAX_BYTES", default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,

    /// Metadata as key=value pairs (can be specified multiple times).
    #[arg(long = "metadata", value_name = "KEY=VALUE")]
    #[serde(default)]
    pub metadata: Vec<String>,

    /// Add a `truncated` field reporting whether input was left unread.
    ///
    /// Reads one byte past the limit when the limit is reached.
    #[arg(long)]
    #[serde(default)]
    pub report_truncation: bool,
}

impl EnvelopeArgs {
    /// Returns the blob name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingName`] if the name is absent or empty.
    pub fn name(&self) -> Result<&str, ConfigError> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingName)
    }

    /// Parses the `--metadata` pairs, later keys overwriting earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMetadata`] for a pair without `=`.
    pub fn metadata(&self) -> Result<Metadata, ConfigError> {
        self.metadata
            .iter()
            .map(|pair| pair.parse::<MetadataEntry>())
            .collect::<Result<Metadata, _>>()
            .map_err(ConfigError::InvalidMetadata)
    }

    /// Parses `--last-modified`, treating an empty value as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLastModified`] for a malformed timestamp.
    pub fn last_modified(&self) -> Result<Option<LastModified>, ConfigError> {
        self.last_modified
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(str::parse::<LastModified>)
            .transpose()
            .map_err(ConfigError::InvalidLastModified)
    }

    /// Builds the core builder configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is missing or any value fails to parse.
    pub fn builder_config(&self) -> Result<BuilderConfig, ConfigError> {
        self.name()?;

        let mut config = BuilderConfig::default()
            .with_content_type(self.content_type.clone())
            .with_content_encoding(self.content_encoding.clone())
            .with_max_bytes(self.max_bytes)
            .with_metadata_map(self.metadata()?)
            .with_truncation_report(self.report_truncation);
        config.last_modified = self.last_modified()?;

        Ok(config)
    }

    /// Logs envelope configuration at debug level.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            name = ?self.name,
            content_type = %self.content_type,
            content_encoding = %self.content_encoding,
            last_modified = ?self.last_modified,
            max_bytes = self.max_bytes,
            metadata_pairs = self.metadata.len(),
            report_truncation = self.report_truncation,
            "envelope configuration"
        );
    }
}
