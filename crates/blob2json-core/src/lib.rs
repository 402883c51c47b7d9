#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for envelope construction.
pub const TRACING_TARGET_BUILDER: &str = "blob2json_core::builder";

/// Tracing target for bounded reads of the input stream.
pub const TRACING_TARGET_IO: &str = "blob2json_core::io";

mod builder;
mod error;

pub mod io;
pub mod prelude;
pub mod types;

pub use builder::{BuilderConfig, DEFAULT_CONTENT_TYPE, DEFAULT_MAX_BYTES, EnvelopeBuilder};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use types::BlobEnvelope;
