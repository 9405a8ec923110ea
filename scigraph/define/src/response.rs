//! Response-side definitions.
//!
//! An operation documents exactly one success [`ResponseSpec`] and any number
//! of [`ErrorSpec`]s. Both are keyed by a [`StatusMatch`], which is also what
//! the runtime uses to route a received status code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::TypeSpec;

/// An HTTP status code or a status class such as `5XX`.
///
/// ## Examples
///
/// ```
/// use scigraph_define::StatusMatch;
///
/// assert!(StatusMatch::Exact(404).matches(404));
/// assert!(StatusMatch::Class(5).matches(503));
/// assert!(!StatusMatch::Class(5).matches(404));
/// assert_eq!(StatusMatch::parse("4XX"), Some(StatusMatch::Class(4)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusMatch {
    /// A single status code.
    Exact(u16),
    /// Every code in `N00..=N99`.
    Class(u16),
}

impl StatusMatch {
    /// Returns true if `status` falls under this matcher.
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(code) => *code == status,
            Self::Class(class) => status / 100 == *class,
        }
    }

    /// Parses `"404"` or `"5XX"`/`"5xx"`. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 3 {
            return None;
        }
        if let Ok(code) = raw.parse::<u16>() {
            return (100..=599).contains(&code).then_some(Self::Exact(code));
        }
        let mut chars = raw.chars();
        let class = chars.next()?.to_digit(10)? as u16;
        let rest: String = chars.collect();
        if rest.eq_ignore_ascii_case("xx") && (1..=5).contains(&class) {
            Some(Self::Class(class))
        } else {
            None
        }
    }

    /// Returns true for any status in the 2xx range.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Exact(code) => (200..300).contains(code),
            Self::Class(class) => *class == 2,
        }
    }

    /// Suffix used for generated identifiers (`404`, `5xx`).
    pub fn ident_suffix(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Class(class) => format!("{class}xx"),
        }
    }
}

impl fmt::Display for StatusMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(code) => write!(f, "{code}"),
            Self::Class(class) => write!(f, "{class}XX"),
        }
    }
}

/// How a response payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// Deserialize the body as JSON.
    #[default]
    Json,
    /// Return the body as a UTF-8 string.
    Text,
    /// Ignore the body entirely.
    Empty,
}

impl PayloadFormat {
    /// Chooses a payload format from a `produces` list.
    ///
    /// JSON-compatible media types win over `text/plain`; an empty list means
    /// JSON. Returns `None` when nothing in the list is supported.
    ///
    /// ## Examples
    ///
    /// ```
    /// use scigraph_define::PayloadFormat;
    ///
    /// let produces = vec!["application/xml".to_string(), "application/json".to_string()];
    /// assert_eq!(PayloadFormat::from_produces(&produces), Some(PayloadFormat::Json));
    /// assert_eq!(PayloadFormat::from_produces(&["text/plain".to_string()]), Some(PayloadFormat::Text));
    /// assert_eq!(PayloadFormat::from_produces(&["image/png".to_string()]), None);
    /// ```
    pub fn from_produces(produces: &[String]) -> Option<Self> {
        if produces.is_empty() {
            return Some(Self::Json);
        }
        let essences: Vec<String> = produces
            .iter()
            .map(|p| {
                p.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase()
            })
            .collect();
        if essences
            .iter()
            .any(|e| e == "application/json" || e.ends_with("+json"))
        {
            Some(Self::Json)
        } else if essences.iter().any(|e| e == "text/plain") {
            Some(Self::Text)
        } else {
            None
        }
    }

    /// Variant name as written in Rust source.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Json => "Json",
            Self::Text => "Text",
            Self::Empty => "Empty",
        }
    }
}

/// The documented success response of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSpec {
    /// Status (or status class) considered success.
    pub status: StatusMatch,
    /// Decoding strategy for the payload.
    pub format: PayloadFormat,
    /// Payload type. `None` when `format` is [`PayloadFormat::Empty`].
    pub ty: Option<TypeSpec>,
}

impl ResponseSpec {
    /// A success response without a body, matching any 2xx status.
    pub fn empty() -> Self {
        Self {
            status: StatusMatch::Class(2),
            format: PayloadFormat::Empty,
            ty: None,
        }
    }
}

/// A documented failure response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSpec {
    /// Status (or status class) this shape applies to.
    pub status: StatusMatch,
    /// Message documented alongside the status.
    pub message: Option<String>,
    /// JSON payload type, if the service documents one.
    pub ty: Option<TypeSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_out_of_range_codes() {
        assert_eq!(StatusMatch::parse("999"), None);
        assert_eq!(StatusMatch::parse("099"), None);
        assert_eq!(StatusMatch::parse("6XX"), None);
        assert_eq!(StatusMatch::parse("default"), None);
    }

    #[test]
    fn parse_accepts_lowercase_class() {
        assert_eq!(StatusMatch::parse("5xx"), Some(StatusMatch::Class(5)));
        assert_eq!(StatusMatch::parse(" 200 "), Some(StatusMatch::Exact(200)));
    }

    #[test]
    fn display_and_ident_suffix() {
        assert_eq!(StatusMatch::Exact(404).to_string(), "404");
        assert_eq!(StatusMatch::Class(5).to_string(), "5XX");
        assert_eq!(StatusMatch::Class(5).ident_suffix(), "5xx");
    }

    #[test]
    fn success_detection() {
        assert!(StatusMatch::Exact(201).is_success());
        assert!(StatusMatch::Class(2).is_success());
        assert!(!StatusMatch::Exact(404).is_success());
    }

    #[test]
    fn empty_response_matches_any_2xx() {
        let response = ResponseSpec::empty();
        assert!(response.status.matches(204));
        assert!(response.status.matches(200));
        assert!(response.ty.is_none());
    }
}
