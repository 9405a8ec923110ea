//! Request execution with tracing instrumentation.

use reqwest::header::{HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{Span, debug, instrument, warn};
use url::Url;

use crate::config::{AuthToken, ClientConfig};
use crate::error::{CallError, EncodeError};
use crate::request::OperationRequest;
use crate::response::{ErrorShape, Expectation, decode_payload};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Executes operation requests through a [`Transport`].
///
/// A dispatcher is `Send + Sync` whenever its transport is, and calls made
/// through it are independent of each other. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    /// Creates a dispatcher.
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The configuration requests are built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Binds an operation request to the configured base URL, headers and
    /// credential.
    ///
    /// ## Errors
    ///
    /// Returns an error if a path placeholder is unbound or holds a dot
    /// segment, an operation header is not valid HTTP, or the resulting URL
    /// is invalid.
    pub fn build_request(
        &self,
        request: &OperationRequest,
        expect: &Expectation,
    ) -> Result<HttpRequest, EncodeError> {
        let path = request.render_path()?;
        let base = self.config.base_url().as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;

        let auth_query = match self.config.auth() {
            Some(AuthToken::Query { name, value }) => Some((name.as_str(), value.as_str())),
            _ => None,
        };
        if !request.query_pairs().is_empty() || auth_query.is_some() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.query_pairs() {
                pairs.append_pair(name, value);
            }
            if let Some((name, value)) = auth_query {
                pairs.append_pair(name, value);
            }
        }

        let mut headers: Vec<(String, String)> = Vec::new();
        if let Some(accept) = expect.accept() {
            set_header(&mut headers, "Accept", accept);
        }
        for (name, value) in self.config.default_headers() {
            set_header(&mut headers, name, value);
        }
        match self.config.auth() {
            Some(AuthToken::Bearer(token)) => {
                set_header(&mut headers, "Authorization", &format!("Bearer {token}"));
            }
            Some(AuthToken::Header { name, value }) => set_header(&mut headers, name, value),
            Some(AuthToken::Query { .. }) | None => {}
        }
        for (name, value) in request.headers() {
            check_header(name, value)?;
            set_header(&mut headers, name, value);
        }

        let body = request.request_body().map(|body| {
            set_header(&mut headers, "Content-Type", body.content_type);
            body.bytes.clone()
        });

        Ok(HttpRequest {
            method: request.method(),
            url,
            headers,
            body,
            timeout: self.config.timeout(),
        })
    }

    /// Sends `request` and decodes the response.
    ///
    /// ## Type Parameters
    ///
    /// * `R` - The success payload type.
    /// * `E` - The operation's documented error enum.
    ///
    /// ## Errors
    ///
    /// - [`CallError::Encode`] if the request cannot be built
    /// - [`CallError::Transport`] if no response was received, or the status
    ///   is neither the documented success nor a documented error
    /// - [`CallError::Api`] for a documented error status
    /// - [`CallError::Decode`] if a payload does not match its declaration
    #[instrument(
        name = "scigraph_call",
        skip(self, request, expect),
        fields(
            http.method = tracing::field::Empty,
            http.route = request.template(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn dispatch<R, E>(
        &self,
        request: OperationRequest,
        expect: Expectation,
    ) -> Result<R, CallError<E>>
    where
        R: DeserializeOwned,
        E: ErrorShape,
    {
        let span = Span::current();
        span.record("http.method", request.method().to_string().as_str());

        let http_request = self.build_request(&request, &expect)?;
        span.record("http.url", http_request.url.as_str());

        let response = match self.transport.send(http_request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "transport failure");
                span.record("otel.status_code", "ERROR");
                return Err(e.into());
            }
        };
        let status = response.status;
        span.record("http.status_code", status);

        if expect.status.matches(status) {
            debug!(bytes = response.body.len(), "decoding success payload");
            return Ok(decode_payload(expect.format, status, &response.body)?);
        }

        span.record("otel.status_code", if status >= 500 { "ERROR" } else { "UNSET" });
        match E::decode(status, &response.body) {
            Some(Ok(error)) => {
                debug!(status, "documented error response");
                Err(CallError::Api { status, error })
            }
            Some(Err(e)) => Err(e.into()),
            None => {
                warn!(status, "undocumented response status");
                Err(crate::TransportError::UnexpectedStatus {
                    status,
                    body: String::from_utf8_lossy(&response.body).into_owned(),
                }
                .into())
            }
        }
    }
}

/// Inserts a header, replacing any earlier one with the same name.
/// Rejects names and values that no HTTP stack would send.
fn check_header(name: &str, value: &str) -> Result<(), EncodeError> {
    let invalid = |reason: String| EncodeError::InvalidHeader {
        name: name.to_string(),
        reason,
    };
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
    HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
    Ok(())
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BodyFormat, PayloadFormat, RestMethod, StatusMatch};

    fn dispatcher(config: ClientConfig) -> Dispatcher {
        Dispatcher::new(config, ReqwestTransport::new().unwrap())
    }

    fn json() -> Expectation {
        Expectation::new(StatusMatch::Exact(200), PayloadFormat::Json)
    }

    #[test]
    fn base_path_is_preserved() {
        let d = dispatcher(ClientConfig::new("https://scicrunch.org/api/1/scigraph/").unwrap());
        let mut request = OperationRequest::new(RestMethod::Get, "/term/{id}");
        request.path_param("id", "HBP_00001").unwrap();
        let built = d.build_request(&request, &json()).unwrap();
        assert_eq!(
            built.url.as_str(),
            "https://scicrunch.org/api/1/scigraph/term/HBP_00001"
        );
        assert_eq!(built.header("accept"), Some("application/json"));
        assert!(built.body.is_none());
    }

    #[test]
    fn invalid_headers_fail_before_sending() {
        let d = dispatcher(ClientConfig::new("https://example.org/api").unwrap());

        let mut request = OperationRequest::new(RestMethod::Get, "/term");
        request.header("X-Request-Id", "a\nInjected: yes").unwrap();
        let err = d.build_request(&request, &json()).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidHeader { name, .. } if name == "X-Request-Id"));

        let mut request = OperationRequest::new(RestMethod::Get, "/term");
        request.header("Bad Name", "ok").unwrap();
        assert!(matches!(
            d.build_request(&request, &json()),
            Err(EncodeError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn dot_path_values_fail_before_sending() {
        let d = dispatcher(ClientConfig::new("https://example.org/api").unwrap());
        let mut request = OperationRequest::new(RestMethod::Get, "/term/{id}");
        request.path_param("id", "..").unwrap();
        assert!(matches!(
            d.build_request(&request, &json()),
            Err(EncodeError::DotSegment(_))
        ));

        let mut request = OperationRequest::new(RestMethod::Get, "/term/{id}");
        request.path_param("id", "a\\b").unwrap();
        let built = d.build_request(&request, &json()).unwrap();
        assert_eq!(built.url.as_str(), "https://example.org/api/term/a%5Cb");
    }

    #[test]
    fn api_key_goes_last_in_query() {
        let config = ClientConfig::builder("https://example.org/api".parse().unwrap())
            .auth(AuthToken::api_key("k1"))
            .build();
        let d = dispatcher(config);
        let mut request = OperationRequest::new(RestMethod::Get, "/vocabulary/search");
        request.query("term", "hippo campus").unwrap();
        request.query("limit", &Some(3)).unwrap();
        let built = d.build_request(&request, &json()).unwrap();
        assert_eq!(built.url.query(), Some("term=hippo+campus&limit=3&key=k1"));
    }

    #[test]
    fn headers_layer_in_order() {
        let config = ClientConfig::builder("https://example.org".parse().unwrap())
            .default_header("X-Client", "default")
            .unwrap()
            .default_header("X-Other", "kept")
            .unwrap()
            .auth(AuthToken::Bearer("tok".into()))
            .build();
        let d = dispatcher(config);
        let mut request = OperationRequest::new(RestMethod::Post, "/annotations");
        request.header("x-client", "operation").unwrap();
        request.body(BodyFormat::Text, "hello").unwrap();
        let built = d.build_request(&request, &json()).unwrap();

        assert_eq!(built.header("X-Client"), Some("operation"));
        assert_eq!(built.header("X-Other"), Some("kept"));
        assert_eq!(built.header("Authorization"), Some("Bearer tok"));
        assert_eq!(built.header("Content-Type"), Some("text/plain"));
        assert_eq!(built.body.as_deref(), Some(b"hello".as_slice()));
        assert_eq!(built.url.query(), None);
    }

    #[test]
    fn unbound_placeholder_fails_before_sending() {
        let d = dispatcher(ClientConfig::new("https://example.org").unwrap());
        let request = OperationRequest::new(RestMethod::Get, "/term/{id}");
        let err = d.build_request(&request, &json()).unwrap_err();
        assert!(matches!(err, EncodeError::MissingPathParameter(_)));
    }
}
