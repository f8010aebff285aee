use nmhost_frame::FrameError;

/// Errors that end a host invocation without a response reaching the parent.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The request frame could not be read.
    #[error("failed to read request frame: {0}")]
    Read(#[source] FrameError),

    /// The response could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// The response frame could not be written.
    #[error("failed to write response frame: {0}")]
    Write(#[source] FrameError),
}

impl HostError {
    /// Whether the parent closed its end of the pipe.
    pub fn is_disconnect(&self) -> bool {
        match self {
            HostError::Read(err) | HostError::Write(err) => err.is_disconnect(),
            HostError::Encode(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostError>;
