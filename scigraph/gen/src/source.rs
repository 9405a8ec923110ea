//! Loading API documents from disk or over HTTP.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use crate::errors::GeneratorError;

/// Timeout for fetching a remote document.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// A local file.
    File(PathBuf),
    /// An `http` or `https` URL.
    Url(Url),
}

impl SpecSource {
    /// Interprets a command-line location.
    ///
    /// Anything that parses as an `http`/`https` URL is fetched; everything
    /// else is a path.
    ///
    /// ## Examples
    ///
    /// ```
    /// use scigraph_gen::source::SpecSource;
    ///
    /// assert!(matches!(SpecSource::parse("https://example.org/api-docs"), SpecSource::Url(_)));
    /// assert!(matches!(SpecSource::parse("spec/scigraph.json"), SpecSource::File(_)));
    /// assert!(matches!(SpecSource::parse("C:\\spec.json"), SpecSource::File(_)));
    /// ```
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(location)),
        }
    }

    /// Reads the whole document.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::Fetch`] if the file cannot be read, the
    /// request fails, or the server answers with a non-success status.
    #[instrument(name = "load_spec", skip(self), fields(source = %self))]
    pub fn load(&self) -> Result<Vec<u8>, GeneratorError> {
        let bytes = match self {
            Self::File(path) => fs::read(path).map_err(|e| GeneratorError::Fetch {
                source_name: path.display().to_string(),
                reason: e.to_string(),
            })?,
            Self::Url(url) => fetch(url)?,
        };
        debug!(bytes = bytes.len(), "loaded spec");
        Ok(bytes)
    }
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

fn fetch(url: &Url) -> Result<Vec<u8>, GeneratorError> {
    let failed = |reason: String| GeneratorError::Fetch {
        source_name: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| failed(e.to_string()))?;
    let response = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(|e| failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(failed(format!("server answered HTTP {}", status.as_u16())));
    }
    let body = response.bytes().map_err(|e| failed(e.to_string()))?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn file_sources_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, b"{\"apis\": []}").unwrap();

        let source = SpecSource::parse(path.to_str().unwrap());
        assert_eq!(source.load().unwrap(), b"{\"apis\": []}");
    }

    #[test]
    fn missing_file_is_fetch_error() {
        let err = SpecSource::parse("/definitely/not/here.json")
            .load()
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Fetch { .. }));
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn other_schemes_are_paths() {
        assert!(matches!(SpecSource::parse("file:///tmp/x.json"), SpecSource::File(_)));
    }
}
