//! Request-side definitions: parameters and body encodings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::schema::TypeSpec;

/// Where a parameter travels in the HTTP request.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use scigraph_define::ParamKind;
///
/// assert_eq!(ParamKind::from_str("query").unwrap(), ParamKind::Query);
/// assert!(ParamKind::from_str("form").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    /// Substituted into a `{placeholder}` of the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Serialized as the request body.
    Body,
    /// Sent as an HTTP header.
    Header,
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Name on the wire (placeholder, query key, header name).
    pub name: String,
    /// Canonical `snake_case` Rust identifier (possibly raw, e.g. `r#type`).
    pub ident: String,
    /// Where the parameter is sent.
    pub kind: ParamKind,
    /// Declared type.
    pub ty: TypeSpec,
    /// Whether the caller must supply a value. Always `true` for path parameters.
    pub required: bool,
    /// Default value documented by the service, if any.
    pub default: Option<serde_json::Value>,
    /// Human-readable description.
    pub description: Option<String>,
}

/// Encoding used for an operation's body parameter.
///
/// ## Examples
///
/// ```
/// use scigraph_define::BodyFormat;
///
/// assert_eq!(BodyFormat::from_content_type("application/json"), Some(BodyFormat::Json));
/// assert_eq!(BodyFormat::Json.content_type(), "application/json");
/// assert_eq!(BodyFormat::from_content_type("multipart/form-data"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    /// `application/json`
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
    /// `text/plain`
    Text,
}

impl BodyFormat {
    /// Maps a declared content type onto a supported body encoding.
    ///
    /// Parameters after `;` (e.g. `charset`) are ignored. Returns `None` for
    /// content types the generator does not model.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/json" => Some(Self::Json),
            "application/x-www-form-urlencoded" => Some(Self::Form),
            "text/plain" => Some(Self::Text),
            other if other.starts_with("application/") && other.ends_with("+json") => {
                Some(Self::Json)
            }
            _ => None,
        }
    }

    /// The `Content-Type` header value for this encoding.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Text => "text/plain",
        }
    }

    /// Variant name as written in Rust source.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Json => "Json",
            Self::Form => "Form",
            Self::Text => "Text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parameters_are_ignored() {
        assert_eq!(
            BodyFormat::from_content_type("text/plain; charset=utf-8"),
            Some(BodyFormat::Text)
        );
        assert_eq!(
            BodyFormat::from_content_type("Application/X-WWW-Form-Urlencoded"),
            Some(BodyFormat::Form)
        );
    }

    #[test]
    fn json_suffix_types_are_json() {
        assert_eq!(
            BodyFormat::from_content_type("application/ld+json"),
            Some(BodyFormat::Json)
        );
    }

    #[test]
    fn param_kind_display_is_lowercase() {
        assert_eq!(ParamKind::Header.to_string(), "header");
        assert_eq!(ParamKind::Path.to_string(), "path");
    }
}
