//! Bounded reading of input streams.
//!
//! # Functions
//!
//! - [`read_limited`] / [`read_limited_async`]: read at most `limit` bytes
//! - [`read_limited_probed`] / [`read_limited_probed_async`]: same, and also
//!   report whether input remained past the limit
//!
//! # Traits
//!
//! - [`AsyncEnvelopeRead`]: builds an envelope straight from an async source

mod envelope_read;
mod limited_read;

pub use envelope_read::AsyncEnvelopeRead;
pub use limited_read::{
    LimitedRead, read_limited, read_limited_async, read_limited_probed,
    read_limited_probed_async,
};
