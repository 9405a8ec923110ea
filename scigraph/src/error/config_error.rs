//! Client configuration errors.

use thiserror::Error;

/// Errors raised while configuring a client.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required environment variable is not set.
    #[error("Missing required environment variable: {var}")]
    MissingEnv {
        /// The variable name.
        var: &'static str,
    },

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A header name or value is invalid.
    #[error("Invalid header {name:?}: {message}")]
    InvalidHeader {
        /// The header name as supplied.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    /// Creates an invalid header error.
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_message() {
        let err: ConfigError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid URL"));
    }

    #[test]
    fn missing_env_names_variable() {
        let err = ConfigError::MissingEnv { var: "SCIGRAPH_API" };
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: SCIGRAPH_API"
        );
    }
}
