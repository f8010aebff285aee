use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::codec::{decode_frame, payload_len, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads complete frames from any `Read` stream.
///
/// Reads exactly the length prefix and then exactly the declared payload, never
/// past the end of the frame. Callers always get complete payloads.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(HEADER_SIZE),
            config,
        }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::IncompleteInput)` when the stream ends or the pipe
    /// breaks before the prefix or the payload is complete.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        self.buf.clear();
        self.buf.resize(HEADER_SIZE, 0);
        self.fill(0, HEADER_SIZE)?;

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let len = payload_len(header, self.config.max_payload_size)?;
        tracing::trace!(len, "read frame header");

        let total = HEADER_SIZE + len;
        self.buf.resize(total, 0);
        self.fill(HEADER_SIZE, total)?;

        decode_frame(&mut self.buf, self.config.max_payload_size)?.ok_or(
            FrameError::IncompleteInput {
                read: self.buf.len(),
                expected: total,
            },
        )
    }

    /// Fill `buf[from..to]` from the stream.
    fn fill(&mut self, from: usize, to: usize) -> Result<()> {
        let mut filled = from;
        while filled < to {
            match self.inner.read(&mut self.buf[filled..to]) {
                Ok(0) => {
                    return Err(FrameError::IncompleteInput {
                        read: filled,
                        expected: to,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::BrokenPipe
                            | ErrorKind::UnexpectedEof
                            | ErrorKind::ConnectionReset
                    ) =>
                {
                    tracing::debug!(error = %err, "input stream broke mid-frame");
                    return Err(FrameError::IncompleteInput {
                        read: filled,
                        expected: to,
                    });
                }
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
