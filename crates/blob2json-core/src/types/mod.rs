//! Data types that make up a blob envelope.
//!
//! - [`BlobEnvelope`]: the JSON document produced for one input stream
//! - [`Metadata`] and [`MetadataEntry`]: flat string-to-string metadata
//! - [`LastModified`]: an RFC 3339 timestamp that keeps its original offset
//! - [`TransferEncoding`]: how the envelope body is encoded

mod envelope;
mod last_modified;
mod metadata;
mod transfer_encoding;

pub use envelope::BlobEnvelope;
pub(crate) use envelope::EnvelopeParts;
pub use last_modified::LastModified;
pub use metadata::{Metadata, MetadataEntry};
pub use transfer_encoding::TransferEncoding;
