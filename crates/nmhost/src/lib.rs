//! Native messaging host that runs one shell command per request.
//!
//! The browser spawns the host, writes a single framed JSON string on stdin and reads
//! a single framed JSON object back from stdout:
//!
//! ```text
//! stdin  ─▶ [len][ "echo hello" ]
//! stdout ◀─ [len][ {"output":"hello\n","success":true} ]
//! ```
//!
//! # Crate Structure
//!
//! - [`frame`] — Length-prefixed stdio framing (re-export of `nmhost-frame`)
//! - [`config`] — Execution root, timeout and frame limits
//! - [`request`] — Payload to command decoding
//! - [`exec`] — Shell invocation and output capture
//! - [`response`] — Result shape and response encoding
//! - [`host`] — The one-shot read, execute, reply pipeline

pub mod config;
pub mod error;
pub mod exec;
pub mod host;
pub mod request;
pub mod response;

/// Re-export frame types.
pub mod frame {
    pub use nmhost_frame::*;
}

pub use config::{parse_duration, ExecConfig, HostConfig};
pub use error::{HostError, Result};
pub use exec::execute;
pub use host::{serve_once, HostOutcome};
pub use request::{decode_request, RequestError};
pub use response::{send_response, ExecutionResult};
