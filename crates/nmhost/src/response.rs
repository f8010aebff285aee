use std::io::Write;

use nmhost_frame::FrameWriter;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// Outcome of one request, as reported to the parent.
///
/// Fields are declared in alphabetical key order, the same order the browser side
/// already sees from this host: `{"error":...,"output":...,"success":...}`. Only the
/// key order carries over; string escaping is serde_json's (`<`, `>` and `&` are
/// written as is).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub success: bool,
}

impl ExecutionResult {
    /// The command exited with status 0.
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            error: None,
            output: Some(output.into()),
            success: true,
        }
    }

    /// The command failed to start or exited non-zero.
    pub fn failed(error: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            output: Some(output.into()),
            success: false,
        }
    }

    /// The request never reached execution.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            output: None,
            success: false,
        }
    }

    /// Serialize to the JSON payload carried by the response frame.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Encode `result` and write it as one frame.
pub fn send_response<W: Write>(
    writer: &mut FrameWriter<W>,
    result: &ExecutionResult,
) -> Result<()> {
    let payload = result.to_payload()?;
    tracing::debug!(
        success = result.success,
        len = payload.len(),
        "sending response"
    );
    writer.send(&payload).map_err(HostError::Write)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use nmhost_frame::FrameReader;

    use super::*;

    fn json(result: &ExecutionResult) -> String {
        String::from_utf8(result.to_payload().unwrap()).unwrap()
    }

    #[test]
    fn success_omits_error() {
        assert_eq!(
            json(&ExecutionResult::succeeded("hello\n")),
            r#"{"output":"hello\n","success":true}"#
        );
    }

    #[test]
    fn failure_carries_empty_fields() {
        assert_eq!(
            json(&ExecutionResult::failed("", "")),
            r#"{"error":"","output":"","success":false}"#
        );
    }

    #[test]
    fn rejection_omits_output() {
        assert_eq!(
            json(&ExecutionResult::rejected("Invalid JSON: boom")),
            r#"{"error":"Invalid JSON: boom","success":false}"#
        );
    }

    #[test]
    fn control_characters_are_escaped() {
        let out = json(&ExecutionResult::succeeded("a\tb\r\n\u{1}\"q\""));
        assert_eq!(out, r#"{"output":"a\tb\r\n\u0001\"q\"","success":true}"#);
    }

    #[test]
    fn html_characters_are_not_escaped() {
        let out = json(&ExecutionResult::succeeded("<a href=\"x\">&</a>"));
        assert_eq!(out, r#"{"output":"<a href=\"x\">&</a>","success":true}"#);
    }

    #[test]
    fn send_response_writes_one_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::new()));
        let result = ExecutionResult::failed("oops\n", "partial");
        send_response(&mut writer, &result).unwrap();

        let wire = writer.into_inner().into_inner();
        let mut reader = FrameReader::new(Cursor::new(wire));
        let payload = reader.read_frame().unwrap();

        let decoded: ExecutionResult = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn send_response_reports_write_failures() {
        let mut writer = FrameWriter::new(Closed);
        let err = send_response(&mut writer, &ExecutionResult::succeeded("")).unwrap_err();
        assert!(matches!(err, HostError::Write(_)));
        assert!(err.is_disconnect());
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
