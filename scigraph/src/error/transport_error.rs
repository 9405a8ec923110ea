//! Network-level failures.

use thiserror::Error;

/// Boxed error used to attach an arbitrary underlying cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from the transport layer.
///
/// Every variant that wraps a cause keeps it reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to establish a connection to the service.
    #[error("connection failed: {0}")]
    Connection(#[source] BoxError),

    /// The request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    /// The call was cancelled before a response arrived.
    #[error("request was cancelled")]
    Cancelled,

    /// The service returned a status that is neither the documented success
    /// nor a documented error.
    #[error("unexpected HTTP {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, decoded lossily as UTF-8.
        body: String,
    },

    /// Any other failure reported by the transport.
    #[error("HTTP request failed: {0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    /// Wraps an arbitrary cause as [`TransportError::Other`].
    pub fn other(cause: impl Into<BoxError>) -> Self {
        Self::Other(cause.into())
    }

    /// Returns `true` if the service could not be reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns the HTTP status code for [`TransportError::UnexpectedStatus`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(Box::new(err))
        } else if err.is_connect() {
            Self::Connection(Box::new(err))
        } else {
            Self::Other(Box::new(err))
        }
    }
}
