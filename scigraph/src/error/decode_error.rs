//! Response decoding failures.

use thiserror::Error;

/// The service responded, but the payload does not match its declaration.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON for the declared type.
    #[error("HTTP {status} body does not match the declared type: {source}")]
    Json {
        /// The HTTP status code of the response.
        status: u16,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A text payload is not valid UTF-8.
    #[error("HTTP {status} body is not valid UTF-8: {source}")]
    Utf8 {
        /// The HTTP status code of the response.
        status: u16,
        /// The underlying decoding error.
        #[source]
        source: std::str::Utf8Error,
    },
}

impl DecodeError {
    /// The status code of the response that failed to decode.
    pub fn status(&self) -> u16 {
        match self {
            Self::Json { status, .. } | Self::Utf8 { status, .. } => *status,
        }
    }
}
