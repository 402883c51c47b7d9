//! Body transfer encodings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{Error, Result};

/// Transfer encoding applied to the envelope body.
///
/// Only standard padded base64 (RFC 4648) is produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferEncoding {
    /// Standard base64 with padding.
    #[default]
    Base64,
}

impl TransferEncoding {
    /// Encodes raw bytes into the body representation.
    #[must_use]
    pub fn encode(&self, data: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(data),
        }
    }

    /// Decodes a body back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body is not valid for this encoding.
    pub fn decode(&self, body: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base64 => STANDARD.decode(body).map_err(|e| {
                Error::serialization()
                    .with_message("body is not valid base64")
                    .with_source(e)
            }),
        }
    }
}
