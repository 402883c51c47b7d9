//! The blob envelope document.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{LastModified, Metadata, TransferEncoding};
use crate::error::Result;

/// A self-describing JSON document wrapping one input stream.
///
/// Envelopes are produced by [`EnvelopeBuilder`] and are not modified
/// afterwards. Field order matches the wire order, and the conditional fields
/// (`metadata`, `last_modified`, `truncated`) are left out of the JSON
/// entirely when unset.
///
/// [`EnvelopeBuilder`]: crate::EnvelopeBuilder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobEnvelope {
    name: String,
    content_type: String,
    content_encoding: String,
    content_transfer_encoding: TransferEncoding,
    body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
    content_length: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_modified: Option<LastModified>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    truncated: Option<bool>,
}

/// Parts of an envelope assembled by the builder.
#[derive(Debug)]
pub(crate) struct EnvelopeParts {
    pub name: String,
    pub content_type: String,
    pub content_encoding: String,
    pub data: Bytes,
    pub metadata: Metadata,
    pub last_modified: Option<LastModified>,
    pub truncated: Option<bool>,
}

impl BlobEnvelope {
    /// Encodes the collected bytes and assembles the envelope.
    pub(crate) fn from_parts(parts: EnvelopeParts) -> Self {
        let content_transfer_encoding = TransferEncoding::Base64;

        Self {
            name: parts.name,
            content_type: parts.content_type,
            content_encoding: parts.content_encoding,
            body: content_transfer_encoding.encode(&parts.data),
            content_transfer_encoding,
            metadata: parts.metadata.into_non_empty(),
            content_length: parts.data.len() as u64,
            last_modified: parts.last_modified,
            truncated: parts.truncated,
        }
    }

    /// Returns the blob name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the content encoding, which may be empty.
    #[must_use]
    pub fn content_encoding(&self) -> &str {
        &self.content_encoding
    }

    /// Returns the transfer encoding of the body.
    #[must_use]
    pub fn content_transfer_encoding(&self) -> TransferEncoding {
        self.content_transfer_encoding
    }

    /// Returns the encoded body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the metadata, present only when at least one pair was supplied.
    #[must_use]
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    /// Returns the number of bytes read into the body.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Returns the last-modified timestamp if one was supplied.
    #[must_use]
    pub fn last_modified(&self) -> Option<&LastModified> {
        self.last_modified.as_ref()
    }

    /// Returns whether input was left unread, when truncation reporting is on.
    #[must_use]
    pub fn truncated(&self) -> Option<bool> {
        self.truncated
    }

    /// Decodes the body back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body is not valid for its
    /// transfer encoding.
    pub fn decode_body(&self) -> Result<Bytes> {
        let data = self.content_transfer_encoding.decode(&self.body)?;
        Ok(Bytes::from(data))
    }

    /// Renders the envelope as a single line of compact JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if rendering fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an envelope from JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the input is not a valid envelope.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn parts(data: &'static [u8]) -> EnvelopeParts {
        EnvelopeParts {
            name: "blob.dat".to_owned(),
            content_type: "application/octet-stream".to_owned(),
            content_encoding: String::new(),
            data: Bytes::from_static(data),
            metadata: Metadata::new(),
            last_modified: None,
            truncated: None,
        }
    }

    #[test]
    fn test_minimal_wire_shape() {
        let envelope = BlobEnvelope::from_parts(parts(b"abc"));
        let value: Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "blob.dat",
                "content_type": "application/octet-stream",
                "content_encoding": "",
                "content_transfer_encoding": "base64",
                "body": "YWJj",
                "content_length": 3,
            })
        );
    }

    #[test]
    fn test_field_order() {
        let mut parts = parts(b"abc");
        parts.metadata = Metadata::new().with_entry("k", "v");
        parts.last_modified = Some("2024-03-15T10:30:00Z".parse().unwrap());

        let json = BlobEnvelope::from_parts(parts).to_json().unwrap();
        let positions: Vec<usize> = [
            "\"name\"",
            "\"content_type\"",
            "\"content_encoding\"",
            "\"content_transfer_encoding\"",
            "\"body\"",
            "\"metadata\"",
            "\"content_length\"",
            "\"last_modified\"",
        ]
        .iter()
        .map(|field| json.find(field).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_metadata_is_embedded_object() {
        let mut parts = parts(b"");
        parts.metadata = Metadata::new().with_entry("source", "test");

        let value: Value =
            serde_json::from_str(&BlobEnvelope::from_parts(parts).to_json().unwrap()).unwrap();
        assert_eq!(value["metadata"], json!({ "source": "test" }));
    }

    #[test]
    fn test_json_round_trip_and_decode() {
        let mut parts = parts(&[0xDE, 0xAD, 0xBE, 0xEF]);
        parts.truncated = Some(true);
        let envelope = BlobEnvelope::from_parts(parts);

        let parsed = BlobEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();
        assert_eq!(parsed, envelope);
        assert_eq!(parsed.decode_body().unwrap().as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(parsed.truncated(), Some(true));
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let envelope = BlobEnvelope::from_json(
            r#"{"name":"a","content_type":"text/plain","content_encoding":"gzip",
                "content_transfer_encoding":"base64","body":"","content_length":0}"#,
        )
        .unwrap();

        assert_eq!(envelope.content_encoding(), "gzip");
        assert!(envelope.metadata().is_none());
        assert!(envelope.last_modified().is_none());
        assert!(envelope.truncated().is_none());
    }
}
