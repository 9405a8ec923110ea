//! Request construction failures.

use thiserror::Error;

/// A request could not be built from the supplied arguments.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A parameter value could not be serialized.
    #[error("failed to serialize parameter `{name}`: {source}")]
    Parameter {
        /// Wire name of the parameter.
        name: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A parameter value has a shape that cannot be rendered in its position
    /// (for example an object in a query string).
    #[error("parameter `{name}` cannot be rendered as {position}")]
    Unrenderable {
        /// Wire name of the parameter.
        name: String,
        /// Where the value was to be placed (`path`, `query`, `header`, `form`).
        position: &'static str,
    },

    /// The body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Body(#[source] serde_json::Error),

    /// A form body did not serialize to an object.
    #[error("form bodies must serialize to an object")]
    FormShape,

    /// A placeholder in the path template received no value.
    #[error("path parameter `{0}` has no value")]
    MissingPathParameter(String),

    /// A path parameter is `.` or `..`, which URL parsing would resolve away.
    #[error("path parameter `{0}` cannot be a dot segment")]
    DotSegment(String),

    /// A header name or value contains characters HTTP does not allow.
    #[error("header `{name}` is invalid: {reason}")]
    InvalidHeader {
        /// Header name as given.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The assembled URL is invalid.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
