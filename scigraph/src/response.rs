//! Response decoding.
//!
//! The dispatcher routes every received status one of three ways: into the
//! operation's success type, into its documented error enum (an
//! [`ErrorShape`]), or into [`TransportError::UnexpectedStatus`](crate::TransportError).

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DecodeError;
use crate::{PayloadFormat, StatusMatch};

/// What an operation expects back on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    /// Status (or status class) that counts as success.
    pub status: StatusMatch,
    /// How the success payload is decoded.
    pub format: PayloadFormat,
}

impl Expectation {
    /// Creates an expectation.
    pub const fn new(status: StatusMatch, format: PayloadFormat) -> Self {
        Self { status, format }
    }

    /// The `Accept` header value matching [`Expectation::format`].
    pub fn accept(&self) -> Option<&'static str> {
        match self.format {
            PayloadFormat::Json => Some("application/json"),
            PayloadFormat::Text => Some("text/plain"),
            PayloadFormat::Empty => None,
        }
    }
}

/// The documented failure responses of one operation.
///
/// Generated error enums implement this with one match arm per documented
/// status: exact codes first, then status classes.
///
/// ## Examples
///
/// ```
/// use scigraph_runtime::{DecodeError, ErrorShape, decode_json};
///
/// #[derive(Debug)]
/// enum LookupError {
///     Status404(serde_json::Value),
///     Status5xx,
/// }
///
/// impl ErrorShape for LookupError {
///     fn decode(status: u16, body: &[u8]) -> Option<Result<Self, DecodeError>> {
///         match status {
///             404 => Some(decode_json(status, body).map(Self::Status404)),
///             500..=599 => Some(Ok(Self::Status5xx)),
///             _ => None,
///         }
///     }
/// }
///
/// assert!(matches!(LookupError::decode(503, b""), Some(Ok(LookupError::Status5xx))));
/// assert!(LookupError::decode(418, b"").is_none());
/// ```
pub trait ErrorShape: Sized + fmt::Debug {
    /// Decodes `body` if `status` is documented. Returns `None` when it is not.
    fn decode(status: u16, body: &[u8]) -> Option<Result<Self, DecodeError>>;
}

/// Error type of operations that document no failure responses.
///
/// Uninhabited: such operations can never return [`CallError::Api`](crate::CallError).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undocumented {}

impl ErrorShape for Undocumented {
    fn decode(_status: u16, _body: &[u8]) -> Option<Result<Self, DecodeError>> {
        None
    }
}

/// Deserializes a JSON body. An empty body is treated as `null`.
///
/// ## Errors
///
/// Returns [`DecodeError::Json`] if the body does not match `T`.
pub fn decode_json<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, DecodeError> {
    let result = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(body)
    };
    result.map_err(|source| DecodeError::Json { status, source })
}

/// Decodes a success payload according to its declared format.
///
/// Text payloads are handed to `T` as a JSON string, so `T` is normally
/// `String`. Empty payloads are handed over as `null`, so `T` is normally `()`.
///
/// ## Errors
///
/// Returns a [`DecodeError`] if the body does not match the declaration.
pub fn decode_payload<T: DeserializeOwned>(
    format: PayloadFormat,
    status: u16,
    body: &[u8],
) -> Result<T, DecodeError> {
    match format {
        PayloadFormat::Json => decode_json(status, body),
        PayloadFormat::Text => {
            let text =
                std::str::from_utf8(body).map_err(|source| DecodeError::Utf8 { status, source })?;
            serde_json::from_value(Value::String(text.to_string()))
                .map_err(|source| DecodeError::Json { status, source })
        }
        PayloadFormat::Empty => serde_json::from_value(Value::Null)
            .map_err(|source| DecodeError::Json { status, source }),
    }
}
