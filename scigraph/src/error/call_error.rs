//! Top-level error returned by generated operation methods.

use std::fmt;

use thiserror::Error;

use super::{DecodeError, EncodeError, TransportError};

/// Error returned by every generated operation.
///
/// `E` is the operation's error enum (for example `TermGetError`), or
/// [`Undocumented`](crate::Undocumented) when the operation documents no
/// failure responses.
///
/// ## Examples
///
/// ```rust,ignore
/// match client.term().get("HBP_00001").await {
///     Ok(term) => println!("{}", term.label),
///     Err(CallError::Api { status, error }) => eprintln!("{status}: {error:?}"),
///     Err(CallError::Transport(e)) => eprintln!("network: {e}"),
///     Err(other) => eprintln!("{other}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum CallError<E: fmt::Debug> {
    /// The service returned a documented error response.
    #[error("service returned documented error (HTTP {status}): {error:?}")]
    Api {
        /// The HTTP status code received.
        status: u16,
        /// The decoded error payload.
        error: E,
    },

    /// The service answered but the payload did not match its declaration.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The request failed before a usable response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request could not be built from the supplied arguments.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl<E: fmt::Debug> CallError<E> {
    /// Returns the HTTP status code, if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Decode(e) => Some(e.status()),
            Self::Transport(e) => e.status_code(),
            Self::Encode(_) => None,
        }
    }

    /// Returns the documented error payload, if this is an [`CallError::Api`].
    pub fn api_error(&self) -> Option<&E> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Consumes the error and returns the documented payload, if any.
    pub fn into_api_error(self) -> Option<E> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum NotFound {
        Status404(String),
    }

    #[test]
    fn api_error_accessors() {
        let err: CallError<NotFound> = CallError::Api {
            status: 404,
            error: NotFound::Status404("missing".into()),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.api_error(),
            Some(&NotFound::Status404("missing".into()))
        );
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[test]
    fn transport_errors_convert() {
        let err: CallError<NotFound> = TransportError::Cancelled.into();
        assert!(matches!(err, CallError::Transport(TransportError::Cancelled)));
        assert_eq!(err.status_code(), None);
        assert!(err.into_api_error().is_none());
    }

    #[test]
    fn encode_errors_convert() {
        let err: CallError<NotFound> = EncodeError::MissingPathParameter("id".into()).into();
        assert!(matches!(err, CallError::Encode(_)));
        assert_eq!(err.to_string(), "path parameter `id` has no value");
    }
}
