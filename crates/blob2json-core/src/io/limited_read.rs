//! Reads that stop at a byte limit.
//!
//! Truncation is a hard cut at the byte boundary. Nothing past the limit is
//! consumed unless a probe is requested, in which case exactly one extra byte
//! may be taken from the source.

use std::io::{self, Read};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::TRACING_TARGET_IO;

/// Upper bound on the initial buffer allocation.
const INITIAL_CAPACITY: u64 = 8192;

/// Bytes collected by a bounded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitedRead {
    data: Bytes,
    truncated: Option<bool>,
}

impl LimitedRead {
    fn new(data: Vec<u8>, truncated: Option<bool>) -> Self {
        Self::from_parts(Bytes::from(data), truncated)
    }

    pub(crate) fn from_parts(data: Bytes, truncated: Option<bool>) -> Self {
        Self { data, truncated }
    }

    /// Returns the bytes read.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consumes the read and returns its bytes.
    #[must_use]
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Returns the number of bytes read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns whether input remained past the limit.
    ///
    /// `None` unless the read was probed.
    #[must_use]
    pub fn truncated(&self) -> Option<bool> {
        self.truncated
    }
}

fn buffer_for(limit: u64) -> Vec<u8> {
    Vec::with_capacity(limit.min(INITIAL_CAPACITY) as usize)
}

/// Reads from `reader` until end-of-stream or until `limit` bytes are read.
///
/// # Errors
///
/// Returns the first I/O error reported by the reader, other than
/// [`io::ErrorKind::Interrupted`], which is retried.
pub fn read_limited<R: Read>(mut reader: R, limit: u64) -> io::Result<LimitedRead> {
    let mut buffer = buffer_for(limit);
    reader.by_ref().take(limit).read_to_end(&mut buffer)?;

    tracing::trace!(
        target: TRACING_TARGET_IO,
        limit,
        read = buffer.len(),
        "bounded read complete"
    );

    Ok(LimitedRead::new(buffer, None))
}

/// Like [`read_limited`], but also reports whether input remained.
///
/// When the limit is reached, one more byte is read to find out; that byte is
/// consumed from the source and discarded.
///
/// # Errors
///
/// Returns the first I/O error reported by the reader, including one raised
/// while probing past the limit.
pub fn read_limited_probed<R: Read>(mut reader: R, limit: u64) -> io::Result<LimitedRead> {
    let LimitedRead { data, .. } = read_limited(&mut reader, limit)?;

    let truncated = if data.len() as u64 == limit {
        has_more(&mut reader)?
    } else {
        false
    };

    Ok(LimitedRead {
        data,
        truncated: Some(truncated),
    })
}

fn has_more<R: Read>(reader: &mut R) -> io::Result<bool> {
    let mut probe = [0u8; 1];
    loop {
        match reader.read(&mut probe) {
            Ok(n) => return Ok(n > 0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Async counterpart of [`read_limited`].
///
/// # Errors
///
/// Returns the first I/O error reported by the reader.
pub async fn read_limited_async<R>(mut reader: R, limit: u64) -> io::Result<LimitedRead>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = buffer_for(limit);
    (&mut reader).take(limit).read_to_end(&mut buffer).await?;

    tracing::trace!(
        target: TRACING_TARGET_IO,
        limit,
        read = buffer.len(),
        "bounded async read complete"
    );

    Ok(LimitedRead::new(buffer, None))
}

/// Async counterpart of [`read_limited_probed`].
///
/// # Errors
///
/// Returns the first I/O error reported by the reader.
pub async fn read_limited_probed_async<R>(mut reader: R, limit: u64) -> io::Result<LimitedRead>
where
    R: AsyncRead + Unpin,
{
    let LimitedRead { data, .. } = read_limited_async(&mut reader, limit).await?;

    let truncated = if data.len() as u64 == limit {
        has_more_async(&mut reader).await?
    } else {
        false
    };

    Ok(LimitedRead {
        data,
        truncated: Some(truncated),
    })
}

async fn has_more_async<R>(reader: &mut R) -> io::Result<bool>
where
    R: AsyncRead + Unpin,
{
    let mut probe = [0u8; 1];
    loop {
        match reader.read(&mut probe).await {
            Ok(n) => return Ok(n > 0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::pin::Pin;
    use std::task::{Context, Poll, ready};

    use tokio::io::ReadBuf;

    use super::*;

    /// Yields `prefix`, then fails every subsequent read.
    struct FailingReader {
        prefix: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match Read::read(&mut self.prefix, buf)? {
                0 => Err(io::Error::other("device went away")),
                n => Ok(n),
            }
        }
    }

    /// Interrupts every other read.
    struct InterruptingReader {
        inner: Cursor<Vec<u8>>,
        interrupt: bool,
    }

    impl Read for InterruptingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::ErrorKind::Interrupted.into());
            }
            let len = buf.len().min(3);
            Read::read(&mut self.inner, &mut buf[..len])
        }
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let before = buf.filled().len();
            ready!(Pin::new(&mut self.prefix).poll_read(cx, buf))?;
            if buf.filled().len() == before {
                return Poll::Ready(Err(io::Error::other("device went away")));
            }
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn test_read_under_limit() -> io::Result<()> {
        let read = read_limited(Cursor::new(b"Hello, world!"), 1024)?;
        assert_eq!(read.data().as_ref(), b"Hello, world!");
        assert_eq!(read.len(), 13);
        assert_eq!(read.truncated(), None);
        Ok(())
    }

    #[test]
    fn test_read_stops_at_limit() -> io::Result<()> {
        let mut cursor = Cursor::new(b"This is a long string that should be truncated.");
        let read = read_limited(&mut cursor, 10)?;

        assert_eq!(read.into_data().as_ref(), b"This is a ");
        assert_eq!(cursor.position(), 10);
        Ok(())
    }

    #[test]
    fn test_zero_limit_reads_nothing() -> io::Result<()> {
        let mut cursor = Cursor::new(b"data");
        let read = read_limited(&mut cursor, 0)?;

        assert!(read.is_empty());
        assert_eq!(cursor.position(), 0);
        Ok(())
    }

    #[test]
    fn test_probe_reports_truncation() -> io::Result<()> {
        let mut cursor = Cursor::new(b"0123456789abc");
        let read = read_limited_probed(&mut cursor, 10)?;
        assert_eq!(read.len(), 10);
        assert_eq!(read.truncated(), Some(true));
        assert_eq!(cursor.position(), 11);

        let read = read_limited_probed(Cursor::new(b"0123456789"), 10)?;
        assert_eq!(read.truncated(), Some(false));

        let read = read_limited_probed(Cursor::new(b"01234"), 10)?;
        assert_eq!(read.truncated(), Some(false));
        Ok(())
    }

    #[test]
    fn test_error_before_limit_is_returned() {
        let reader = FailingReader {
            prefix: Cursor::new(b"partial".to_vec()),
        };

        let error = read_limited(reader, 1024).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_error_after_limit_is_not_observed() -> io::Result<()> {
        let reader = FailingReader {
            prefix: Cursor::new(b"partial".to_vec()),
        };

        let read = read_limited(reader, 7)?;
        assert_eq!(read.data().as_ref(), b"partial");
        Ok(())
    }

    #[test]
    fn test_interrupted_reads_are_retried() -> io::Result<()> {
        let reader = InterruptingReader {
            inner: Cursor::new(b"interrupted input".to_vec()),
            interrupt: false,
        };

        let read = read_limited_probed(reader, 11)?;
        assert_eq!(read.data().as_ref(), b"interrupted");
        assert_eq!(read.truncated(), Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn test_async_read_stops_at_limit() -> io::Result<()> {
        let mut cursor = Cursor::new(b"This is a long string that should be truncated.".to_vec());
        let read = read_limited_async(&mut cursor, 10).await?;

        assert_eq!(read.data().as_ref(), b"This is a ");
        assert_eq!(cursor.position(), 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_async_probe() -> io::Result<()> {
        let read = read_limited_probed_async(Cursor::new(b"0123456789abc".to_vec()), 10).await?;
        assert_eq!(read.truncated(), Some(true));

        let read = read_limited_probed_async(&b"short"[..], 10).await?;
        assert_eq!(read.truncated(), Some(false));
        assert_eq!(read.len(), 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_async_probe_at_exact_limit() -> io::Result<()> {
        let mut cursor = Cursor::new(b"0123456789".to_vec());
        let read = read_limited_probed_async(&mut cursor, 10).await?;

        assert_eq!(read.len(), 10);
        assert_eq!(read.truncated(), Some(false));
        assert_eq!(cursor.position(), 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_async_probe_error_is_returned() {
        let reader = FailingReader {
            prefix: Cursor::new(b"partial".to_vec()),
        };

        let error = read_limited_probed_async(reader, 7).await.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::Other);
    }
}
