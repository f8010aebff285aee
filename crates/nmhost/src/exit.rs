use nmhost::host::is_no_input;
use nmhost::{HostError, HostOutcome};

// The parent only looks at the response frame, so every protocol path exits 0.
// Usage errors are reported by clap with its own code.
pub const SUCCESS: i32 = 0;

/// Log how the invocation ended and pick the process exit code.
pub fn finish(result: Result<HostOutcome, HostError>) -> i32 {
    match result {
        Ok(HostOutcome::Executed { success }) => {
            tracing::debug!(success, "request served");
        }
        Ok(HostOutcome::Rejected) => {
            tracing::debug!("request rejected");
        }
        Err(err) if is_no_input(&err) => {
            tracing::debug!(error = %err, "no request, exiting");
        }
        Err(err) if err.is_disconnect() => {
            tracing::info!(error = %err, "parent went away");
        }
        Err(err) => {
            tracing::warn!(error = %err, "request dropped");
        }
    }
    SUCCESS
}
