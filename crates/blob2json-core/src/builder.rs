//! Envelope construction.
//!
//! [`EnvelopeBuilder`] reads up to a configured number of bytes from a
//! source, encodes them, and wraps them in a [`BlobEnvelope`] together with
//! the descriptive fields from its [`BuilderConfig`].

use std::io::Read;

use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::TRACING_TARGET_BUILDER;
use crate::error::{Error, Result};
use crate::io::{
    LimitedRead, read_limited, read_limited_async, read_limited_probed, read_limited_probed_async,
};
use crate::types::{BlobEnvelope, EnvelopeParts, LastModified, Metadata};

/// Content type used when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Default truncation limit (1 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Configuration for [`EnvelopeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "config does nothing unless you use it"]
pub struct BuilderConfig {
    /// MIME type copied into every envelope.
    pub content_type: String,
    /// Content encoding copied into every envelope; empty when unknown.
    pub content_encoding: String,
    /// Maximum number of bytes read from the source.
    pub max_bytes: u64,
    /// Metadata attached when non-empty.
    pub metadata: Metadata,
    /// Last-modified timestamp attached when set.
    pub last_modified: Option<LastModified>,
    /// Whether envelopes carry an explicit `truncated` flag.
    ///
    /// Enabling this reads one byte past `max_bytes` when the limit is hit.
    pub report_truncation: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            content_encoding: String::new(),
            max_bytes: DEFAULT_MAX_BYTES,
            metadata: Metadata::new(),
            last_modified: None,
            report_truncation: false,
        }
    }
}

impl BuilderConfig {
    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the content encoding.
    pub fn with_content_encoding(mut self, content_encoding: impl Into<String>) -> Self {
        self.content_encoding = content_encoding.into();
        self
    }

    /// Sets the truncation limit.
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Adds a single metadata pair.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key, value);
        self
    }

    /// Replaces all metadata.
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the last-modified timestamp.
    pub fn with_last_modified(mut self, last_modified: impl Into<LastModified>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    /// Enables or disables the explicit `truncated` flag.
    pub fn with_truncation_report(mut self, enabled: bool) -> Self {
        self.report_truncation = enabled;
        self
    }
}

/// Builds [`BlobEnvelope`]s from byte sources.
///
/// Each call is independent; the builder holds only its configuration and can
/// be shared between threads.
///
/// # Example
///
/// ```
/// use blob2json_core::{BuilderConfig, EnvelopeBuilder};
///
/// let config = BuilderConfig::default()
///     .with_content_type("text/plain")
///     .with_max_bytes(1024);
/// let builder = EnvelopeBuilder::new(config);
///
/// let envelope = builder.build(&b"Hello, Go!"[..], "greeting.txt").unwrap();
/// assert_eq!(envelope.body(), "SGVsbG8sIEdvIQ==");
/// assert_eq!(envelope.content_length(), 10);
/// assert!(envelope.metadata().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvelopeBuilder {
    config: BuilderConfig,
}

impl EnvelopeBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Returns the builder configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Reads from `reader` and builds an envelope named `name`.
    ///
    /// Reading stops at end-of-stream or after `max_bytes` bytes. Pass
    /// `&mut reader` to keep using the source afterwards; it is never closed
    /// here.
    ///
    /// # Errors
    ///
    /// Returns an input read error if the source fails before the limit or
    /// end-of-stream is reached.
    pub fn build<R: Read>(&self, reader: R, name: impl Into<String>) -> Result<BlobEnvelope> {
        let name = name.into();
        let read = if self.config.report_truncation {
            read_limited_probed(reader, self.config.max_bytes)
        } else {
            read_limited(reader, self.config.max_bytes)
        };

        let read = read.map_err(|e| self.read_error(&name, e))?;
        Ok(self.assemble(name, read))
    }

    /// Async counterpart of [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns an input read error if the source fails before the limit or
    /// end-of-stream is reached.
    pub async fn build_async<R>(
        &self,
        reader: R,
        name: impl Into<String>,
    ) -> Result<BlobEnvelope>
    where
        R: AsyncRead + Unpin,
    {
        let name = name.into();
        let read = if self.config.report_truncation {
            read_limited_probed_async(reader, self.config.max_bytes).await
        } else {
            read_limited_async(reader, self.config.max_bytes).await
        };

        let read = read.map_err(|e| self.read_error(&name, e))?;
        Ok(self.assemble(name, read))
    }

    /// Builds an envelope from bytes already in memory.
    ///
    /// The same truncation rules apply as for streamed input.
    pub fn build_from_bytes(
        &self,
        data: impl Into<Bytes>,
        name: impl Into<String>,
    ) -> BlobEnvelope {
        let mut data: Bytes = data.into();
        let limit = usize::try_from(self.config.max_bytes).unwrap_or(usize::MAX);
        let truncated = data.len() > limit;
        if truncated {
            data.truncate(limit);
        }

        let truncated = self.config.report_truncation.then_some(truncated);
        self.assemble(name.into(), LimitedRead::from_parts(data, truncated))
    }

    fn read_error(&self, name: &str, error: std::io::Error) -> Error {
        tracing::warn!(
            target: TRACING_TARGET_BUILDER,
            name,
            error = %error,
            "failed to read blob body"
        );

        Error::input_read()
            .with_message(format!("unable to read body of blob {name:?}"))
            .with_source(error)
    }

    fn assemble(&self, name: String, read: LimitedRead) -> BlobEnvelope {
        let truncated = read.truncated();
        let data = read.into_data();

        tracing::debug!(
            target: TRACING_TARGET_BUILDER,
            name = %name,
            content_length = data.len(),
            max_bytes = self.config.max_bytes,
            metadata_entries = self.config.metadata.len(),
            truncated = ?truncated,
            "built blob envelope"
        );

        BlobEnvelope::from_parts(EnvelopeParts {
            name,
            content_type: self.config.content_type.clone(),
            content_encoding: self.config.content_encoding.clone(),
            data,
            metadata: self.config.metadata.clone(),
            last_modified: self.config.last_modified,
            truncated,
        })
    }
}
