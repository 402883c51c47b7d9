//! Convenient re-exports for common use.

pub use crate::builder::{BuilderConfig, EnvelopeBuilder};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::io::AsyncEnvelopeRead;
pub use crate::types::{BlobEnvelope, LastModified, Metadata, MetadataEntry, TransferEncoding};
