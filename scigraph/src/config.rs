//! Client configuration.
//!
//! A [`ClientConfig`] is passed explicitly to every generated client. It holds
//! the base URL, headers sent with every request, an optional credential and
//! the per-request timeout.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

use crate::error::ConfigError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the base URL.
pub const ENV_BASE_URL: &str = "SCIGRAPH_API";
/// Environment variable holding the API key (sent as the `key` query parameter).
pub const ENV_API_KEY: &str = "SCIGRAPH_API_KEY";
/// Environment variable holding the timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "SCIGRAPH_TIMEOUT_SECS";

/// Query parameter SciCrunch expects API keys in.
const API_KEY_QUERY_PARAM: &str = "key";

/// A credential attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthToken {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// A named header carrying the token verbatim.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// A named query parameter carrying the token (e.g. SciCrunch `key=`).
    Query {
        /// Query parameter name.
        name: String,
        /// Token value.
        value: String,
    },
}

impl AuthToken {
    /// SciCrunch-style API key sent as `?key=<value>`.
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::Query {
            name: API_KEY_QUERY_PARAM.to_string(),
            value: value.into(),
        }
    }
}

// Tokens never show up in logs or panic messages.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
            Self::Header { name, .. } => write!(f, "Header({name}: <redacted>)"),
            Self::Query { name, .. } => write!(f, "Query({name}=<redacted>)"),
        }
    }
}

/// Configuration shared by every call made through a client.
///
/// ## Examples
///
/// ```
/// use std::time::Duration;
/// use scigraph_runtime::{AuthToken, ClientConfig};
///
/// let config = ClientConfig::builder("https://scicrunch.org/api/1/scigraph".parse().unwrap())
///     .timeout(Duration::from_secs(10))
///     .default_header("X-Trace", "on")
///     .unwrap()
///     .auth(AuthToken::api_key("secret"))
///     .build();
///
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// assert_eq!(config.default_headers().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    default_headers: Vec<(String, String)>,
    auth: Option<AuthToken>,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a new builder with the specified base URL.
    pub fn builder(base_url: Url) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Creates a configuration with defaults for everything but the base URL.
    ///
    /// ## Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::builder(Url::parse(base_url)?).build())
    }

    /// Loads configuration from the environment.
    ///
    /// Reads `SCIGRAPH_API` (required), `SCIGRAPH_API_KEY` and
    /// `SCIGRAPH_TIMEOUT_SECS`.
    ///
    /// ## Errors
    ///
    /// Returns an error if `SCIGRAPH_API` is missing or any variable holds an
    /// invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(None, |var| std::env::var(var).ok())
    }

    /// Like [`ClientConfig::from_env`], but falls back to `default_base_url`
    /// when `SCIGRAPH_API` is not set.
    ///
    /// ## Errors
    ///
    /// Returns an error if any variable holds an invalid value.
    pub fn from_env_or(default_base_url: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(Some(default_base_url), |var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(
        default_base_url: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = match (lookup(ENV_BASE_URL), default_base_url) {
            (Some(url), _) => url,
            (None, Some(default)) => default.to_string(),
            (None, None) => return Err(ConfigError::MissingEnv { var: ENV_BASE_URL }),
        };
        let mut builder = Self::builder(Url::parse(base_url.trim())?);

        if let Some(key) = lookup(ENV_API_KEY).filter(|k| !k.trim().is_empty()) {
            builder = builder.auth(AuthToken::api_key(key.trim()));
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }

    /// The base URL every operation path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request, in insertion order.
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// The configured credential, if any.
    pub fn auth(&self) -> Option<&AuthToken> {
        self.auth.as_ref()
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: Url,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    auth: Option<AuthToken>,
}

impl ClientConfigBuilder {
    fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
            auth: None,
        }
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header sent with every request. A later header with the same
    /// name (case-insensitive) replaces the earlier one.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let name = name.as_ref();
        let value = value.as_ref();
        HeaderName::try_from(name).map_err(|e| ConfigError::invalid_header(name, e))?;
        HeaderValue::try_from(value).map_err(|e| ConfigError::invalid_header(name, e))?;

        self.default_headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.default_headers
            .push((name.to_string(), value.to_string()));
        Ok(self)
    }

    /// Sets the credential.
    pub fn auth(mut self, auth: AuthToken) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the [`ClientConfig`].
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            default_headers: self.default_headers,
            auth: self.auth,
            timeout: self.timeout,
        }
    }
}
