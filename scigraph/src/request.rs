//! Request construction.
//!
//! Generated methods describe a call as an [`OperationRequest`]: the method,
//! the path template, and every parameter value already serialized. The
//! dispatcher later turns it into an [`HttpRequest`](crate::HttpRequest)
//! against a concrete base URL.
//!
//! ## Rendering rules
//!
//! - Path parameters are percent-encoded as a single path segment.
//! - Query parameters keep the order they were added in. Arrays repeat the
//!   key, `None` values are skipped.
//! - Header arrays are joined with `,`.
//! - Objects cannot be rendered into any of these positions.

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;

use crate::error::EncodeError;
use crate::{BodyFormat, RestMethod};

/// Characters escaped inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An encoded request body with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    /// Value for the `Content-Type` header.
    pub content_type: &'static str,
    /// Encoded bytes.
    pub bytes: Bytes,
}

/// One operation call, before it is bound to a base URL.
///
/// ## Examples
///
/// ```
/// use scigraph_runtime::{OperationRequest, RestMethod};
///
/// let mut request = OperationRequest::new(RestMethod::Get, "/vocabulary/autocomplete/{term}");
/// request.path_param("term", "hippo campus").unwrap();
/// request.query("limit", &Some(5)).unwrap();
/// request.query("prefix", &vec!["UBERON", "NIFSTD"]).unwrap();
/// request.query("searchSynonyms", &None::<bool>).unwrap();
///
/// assert_eq!(request.render_path().unwrap(), "/vocabulary/autocomplete/hippo%20campus");
/// assert_eq!(
///     request.query_pairs(),
///     &[
///         ("limit".to_string(), "5".to_string()),
///         ("prefix".to_string(), "UBERON".to_string()),
///         ("prefix".to_string(), "NIFSTD".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct OperationRequest {
    method: RestMethod,
    template: &'static str,
    path_params: Vec<(&'static str, String)>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl OperationRequest {
    /// Starts a request for `method` against the path `template`.
    pub fn new(method: RestMethod, template: &'static str) -> Self {
        Self {
            method,
            template,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Binds the value of the `{name}` placeholder.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value is not a scalar.
    pub fn path_param<V>(&mut self, name: &'static str, value: &V) -> Result<&mut Self, EncodeError>
    where
        V: Serialize + ?Sized,
    {
        let mut values = render(name, value, "path")?;
        if values.len() != 1 {
            return Err(EncodeError::Unrenderable {
                name: name.to_string(),
                position: "path",
            });
        }
        let rendered = values.remove(0);
        self.path_params.retain(|(n, _)| *n != name);
        self.path_params.push((name, rendered));
        Ok(self)
    }

    /// Appends a query parameter. `None` adds nothing; arrays repeat the key.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value is or contains an object.
    pub fn query<V>(&mut self, name: &str, value: &V) -> Result<&mut Self, EncodeError>
    where
        V: Serialize + ?Sized,
    {
        for rendered in render(name, value, "query")? {
            self.query.push((name.to_string(), rendered));
        }
        Ok(self)
    }

    /// Sets a header. `None` adds nothing; arrays are joined with `,`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value is or contains an object.
    pub fn header<V>(&mut self, name: &str, value: &V) -> Result<&mut Self, EncodeError>
    where
        V: Serialize + ?Sized,
    {
        let values = render(name, value, "header")?;
        if !values.is_empty() {
            self.headers.push((name.to_string(), values.join(",")));
        }
        Ok(self)
    }

    /// Serializes `value` as the request body in the given format.
    ///
    /// ## Errors
    ///
    /// Returns an error if the value cannot be serialized, or for
    /// [`BodyFormat::Form`] if it is not an object of scalars.
    pub fn body<V>(&mut self, format: BodyFormat, value: &V) -> Result<&mut Self, EncodeError>
    where
        V: Serialize + ?Sized,
    {
        let bytes = match format {
            BodyFormat::Json => serde_json::to_vec(value).map_err(EncodeError::Body)?,
            BodyFormat::Form => encode_form(value)?.into_bytes(),
            BodyFormat::Text => match serde_json::to_value(value).map_err(EncodeError::Body)? {
                Value::String(text) => text.into_bytes(),
                Value::Null => Vec::new(),
                other => other.to_string().into_bytes(),
            },
        };
        self.body = Some(RequestBody {
            content_type: format.content_type(),
            bytes: Bytes::from(bytes),
        });
        Ok(self)
    }

    /// Substitutes every placeholder of the template.
    ///
    /// ## Errors
    ///
    /// Returns [`EncodeError::MissingPathParameter`] if a placeholder was
    /// never bound, or [`EncodeError::DotSegment`] for a value of `.` or `..`.
    pub fn render_path(&self) -> Result<String, EncodeError> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return Ok(out);
            };
            let name = &after[..end];
            let value = self
                .path_params
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v)
                .ok_or_else(|| EncodeError::MissingPathParameter(name.to_string()))?;
            // `%2E` counts as a dot too, so these cannot be escaped.
            if matches!(value.as_str(), "." | "..") {
                return Err(EncodeError::DotSegment(name.to_string()));
            }
            out.extend(utf8_percent_encode(value, PATH_SEGMENT));
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// HTTP method.
    pub fn method(&self) -> RestMethod {
        self.method
    }

    /// Path template as declared.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Query pairs in the order they will be sent.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Operation-specific headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Encoded body, if one was set.
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// Renders a value into zero or more strings for a non-body position.
fn render<V>(name: &str, value: &V, position: &'static str) -> Result<Vec<String>, EncodeError>
where
    V: Serialize + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| EncodeError::Parameter {
        name: name.to_string(),
        source,
    })?;
    let unrenderable = || EncodeError::Unrenderable {
        name: name.to_string(),
        position,
    };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| scalar(item).ok_or_else(unrenderable))
            .collect(),
        other => scalar(other).map(|s| vec![s]).ok_or_else(unrenderable),
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn encode_form<V>(value: &V) -> Result<String, EncodeError>
where
    V: Serialize + ?Sized,
{
    let Value::Object(fields) = serde_json::to_value(value).map_err(EncodeError::Body)? else {
        return Err(EncodeError::FormShape);
    };
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, field) in fields {
        for rendered in render(&name, &field, "form")? {
            serializer.append_pair(&name, &rendered);
        }
    }
    Ok(serializer.finish())
}
