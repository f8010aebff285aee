/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared payload length exceeds the configured maximum.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input stream ended before the length prefix or payload was complete.
    #[error("incomplete input ({read} of {expected} bytes)")]
    IncompleteInput { read: usize, expected: usize },

    /// The output stream stopped accepting bytes mid-frame.
    #[error("incomplete output ({written} of {expected} bytes)")]
    IncompleteOutput { written: usize, expected: usize },
}

impl FrameError {
    /// Whether the peer went away, i.e. nothing more can be exchanged on the stream.
    pub fn is_disconnect(&self) -> bool {
        match self {
            FrameError::IncompleteInput { .. } | FrameError::IncompleteOutput { .. } => true,
            FrameError::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
                    | std::io::ErrorKind::ConnectionReset
            ),
            FrameError::PayloadTooLarge { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
