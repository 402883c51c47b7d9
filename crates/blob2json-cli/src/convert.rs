//! Reads the configured input and writes its envelope.

use std::io::Write;

use anyhow::Context;
use blob2json_core::prelude::{BlobEnvelope, EnvelopeBuilder};

use crate::TRACING_TARGET_CONVERT;
use crate::config::Cli;

/// Builds the envelope described by `cli` and writes it to `output`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the input cannot be
/// opened or read, or the output cannot be written.
pub fn convert(cli: &Cli, output: impl Write) -> anyhow::Result<()> {
    let name = cli.envelope.name()?;
    let builder = EnvelopeBuilder::new(cli.envelope.builder_config()?);

    let reader = cli.input.open()?;
    let envelope = builder
        .build(reader, name)
        .context("unable to create blob")?;

    tracing::info!(
        target: TRACING_TARGET_CONVERT,
        name = envelope.name(),
        content_length = envelope.content_length(),
        truncated = ?envelope.truncated(),
        "blob envelope created"
    );

    write_envelope(&envelope, output)
}

/// Writes `envelope` as one newline-terminated line of JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_envelope(envelope: &BlobEnvelope, mut output: impl Write) -> anyhow::Result<()> {
    serde_json::to_writer(&mut output, envelope).context("unable to encode envelope")?;
    output
        .write_all(b"\n")
        .and_then(|()| output.flush())
        .context("unable to write envelope")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::Value;

    use super::*;
    use crate::config::ConfigError;

    fn cli(args: &[&str]) -> Cli {
        Cli::from_args(std::iter::once("blob2json").chain(args.iter().copied())).unwrap()
    }

    fn input_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let mut output = Vec::new();
        convert(&cli(args), &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_convert_file_input() {
        let file = input_file(b"Hello, Go!");
        let path = file.path().to_str().unwrap();

        let output = run(&[
            "--name",
            "greeting.txt",
            "--content-type",
            "text/plain",
            "--input",
            path,
        ])
        .unwrap();

        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["name"], "greeting.txt");
        assert_eq!(value["content_type"], "text/plain");
        assert_eq!(value["content_encoding"], "");
        assert_eq!(value["content_transfer_encoding"], "base64");
        assert_eq!(value["body"], "SGVsbG8sIEdvIQ==");
        assert_eq!(value["content_length"], 10);
        assert!(value.get("metadata").is_none());
        assert!(value.get("last_modified").is_none());
    }

    #[test]
    fn test_convert_truncates_and_reports() {
        let file = input_file(b"This is a long string that should be truncated.");
        let path = file.path().to_str().unwrap();

        let output = run(&["--name", "t.txt", "--max-bytes", "10", "--input", path]).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["content_length"], 10);
        assert_eq!(value["body"], "VGhpcyBpcyBhIA==");
        assert!(value.get("truncated").is_none());

        let output = run(&[
            "--name",
            "t.txt",
            "--max-bytes",
            "10",
            "--report-truncation",
            "--input",
            path,
        ])
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["truncated"], true);
    }

    #[test]
    fn test_convert_metadata_and_last_modified() {
        let file = input_file(&[0xDE, 0xAD, 0xBE, 0xEF, 0x01, 0x02, 0x03, 0x04]);
        let path = file.path().to_str().unwrap();

        let output = run(&[
            "--name",
            "binary.bin",
            "--metadata",
            "source=test",
            "--metadata",
            "user=x",
            "--last-modified",
            "2024-03-15T10:30:00Z",
            "--input",
            path,
        ])
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["body"], "3q2+7wECAwQ=");
        assert_eq!(value["content_length"], 8);
        assert_eq!(value["last_modified"], "2024-03-15T10:30:00Z");

        let metadata: BTreeMap<String, String> =
            serde_json::from_value(value["metadata"].clone()).unwrap();
        assert_eq!(
            metadata,
            BTreeMap::from([
                ("source".to_owned(), "test".to_owned()),
                ("user".to_owned(), "x".to_owned()),
            ])
        );
    }

    #[test]
    fn test_missing_name_fails_before_reading() {
        let error = run(&["--input", "/nonexistent/blob"]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingName)
        ));
    }

    #[test]
    fn test_missing_input_file() {
        let error = run(&["--name", "a", "--input", "/nonexistent/blob"]).unwrap_err();
        assert!(format!("{error:#}").contains("unable to open input file"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct FullDisk;

        impl Write for FullDisk {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("no space left"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let file = input_file(b"data");
        let path = file.path().to_str().unwrap();
        let result = convert(&cli(&["--name", "a", "--input", path]), FullDisk);
        assert!(result.is_err());
    }
}
