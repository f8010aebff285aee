use std::io::{Read, Write};

use nmhost_frame::{FrameError, FrameReader, FrameWriter};

use crate::config::HostConfig;
use crate::error::{HostError, Result};
use crate::exec::execute;
use crate::request::decode_request;
use crate::response::{send_response, ExecutionResult};

/// How a host invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOutcome {
    /// The request could not be decoded; a failure response was sent.
    Rejected,
    /// The command ran (or failed to start) and its result was sent.
    Executed { success: bool },
}

/// Serve exactly one request: read a frame, run it, write one frame back.
///
/// A read failure returns before anything is written. Decode failures are reported to
/// the parent and never reach the shell.
pub fn serve_once<R: Read, W: Write>(
    input: R,
    output: W,
    config: &HostConfig,
) -> Result<HostOutcome> {
    let mut reader = FrameReader::with_config(input, config.frame.clone());
    let payload = reader.read_frame().map_err(HostError::Read)?;
    tracing::debug!(len = payload.len(), "request frame received");

    let mut writer = FrameWriter::new(output);

    let command = match decode_request(&payload) {
        Ok(command) => command,
        Err(err) => {
            tracing::warn!(error = %err, "rejecting request");
            send_response(&mut writer, &ExecutionResult::rejected(err.to_string()))?;
            return Ok(HostOutcome::Rejected);
        }
    };

    tracing::debug!(command = %command, root = %config.exec.root.display(), "executing");
    let result = execute(&command, &config.exec);
    send_response(&mut writer, &result)?;

    Ok(HostOutcome::Executed {
        success: result.success,
    })
}

/// Whether `err` means the parent had nothing (more) to say.
pub fn is_no_input(err: &HostError) -> bool {
    matches!(err, HostError::Read(FrameError::IncompleteInput { .. }))
}
