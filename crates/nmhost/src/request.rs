/// Errors produced while decoding a request payload.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The payload is not JSON, or is JSON of a type other than string.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Decode a request payload into the shell command it carries.
///
/// The payload must be a JSON string. Objects, arrays, numbers, booleans and `null`
/// are rejected the same way malformed JSON is. The decoded text is returned as is.
pub fn decode_request(payload: &[u8]) -> Result<String, RequestError> {
    Ok(serde_json::from_slice::<String>(payload)?)
}
