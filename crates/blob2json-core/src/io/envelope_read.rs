//! Envelope reading trait for async sources
//!
//! This module provides the [`AsyncEnvelopeRead`] trait for turning async
//! sources directly into [`BlobEnvelope`] values.

use std::future::Future;

use tokio::io::AsyncRead;

use crate::builder::EnvelopeBuilder;
use crate::error::Result;
use crate::types::BlobEnvelope;

/// Trait for building envelopes from async sources
///
/// The source is borrowed, not consumed: it stays open and positioned just
/// past the bytes that were read, and the caller remains responsible for
/// closing it.
pub trait AsyncEnvelopeRead: AsyncRead + Unpin + Send {
    /// Read up to the builder's byte limit and wrap the bytes in an envelope
    ///
    /// # Errors
    ///
    /// Returns an input read error if the source fails before the limit or
    /// end-of-stream is reached.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use blob2json_core::io::AsyncEnvelopeRead;
    /// use blob2json_core::{BlobEnvelope, BuilderConfig, EnvelopeBuilder, Result};
    /// use tokio::fs::File;
    ///
    /// async fn envelope_for_file() -> Result<BlobEnvelope> {
    ///     let builder = EnvelopeBuilder::new(BuilderConfig::default());
    ///     let mut file = File::open("report.pdf").await?;
    ///     file.read_envelope(&builder, "report.pdf").await
    /// }
    /// ```
    fn read_envelope(
        &mut self,
        builder: &EnvelopeBuilder,
        name: impl Into<String>,
    ) -> impl Future<Output = Result<BlobEnvelope>> + Send
    where
        Self: Sized,
    {
        let name = name.into();
        async move { builder.build_async(self, name).await }
    }
}

// Implementations for common types
impl AsyncEnvelopeRead for tokio::fs::File {}
impl AsyncEnvelopeRead for tokio::io::Stdin {}
impl AsyncEnvelopeRead for &[u8] {}
impl<T: AsyncRead + Unpin + Send> AsyncEnvelopeRead for Box<T> {}

// Test-specific implementations
#[cfg(test)]
impl<T: AsRef<[u8]> + Unpin + Send> AsyncEnvelopeRead for std::io::Cursor<T> {}
