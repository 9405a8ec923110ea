//! Error types for the SciGraph generator.

use std::fmt;

use thiserror::Error;

/// Where in the document an error was found.
///
/// Renders as `resource /term, operation get, field id`, omitting the parts
/// that do not apply, or `document` when none do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecLocation {
    /// Resource name as written in the document.
    pub resource: Option<String>,
    /// Operation name or `METHOD path`.
    pub operation: Option<String>,
    /// Dotted field or parameter path.
    pub field: Option<String>,
}

impl SpecLocation {
    /// The document as a whole.
    pub fn document() -> Self {
        Self::default()
    }

    /// A named model.
    pub fn model(name: impl Into<String>) -> Self {
        Self {
            field: Some(format!("models.{}", name.into())),
            ..Self::default()
        }
    }

    /// A resource.
    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            resource: Some(name.into()),
            ..Self::default()
        }
    }

    /// Narrows this location to an operation.
    pub fn operation(&self, name: impl Into<String>) -> Self {
        Self {
            operation: Some(name.into()),
            field: None,
            ..self.clone()
        }
    }

    /// Narrows this location to a field, appending to any existing field path.
    pub fn field(&self, name: impl AsRef<str>) -> Self {
        let field = match &self.field {
            Some(parent) => format!("{parent}.{}", name.as_ref()),
            None => name.as_ref().to_string(),
        };
        Self {
            field: Some(field),
            ..self.clone()
        }
    }
}

impl fmt::Display for SpecLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(resource) = &self.resource {
            parts.push(format!("resource {resource}"));
        }
        if let Some(operation) = &self.operation {
            parts.push(format!("operation {operation}"));
        }
        if let Some(field) = &self.field {
            parts.push(format!("field {field}"));
        }
        if parts.is_empty() {
            f.write_str("document")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Coarse classification of a [`GeneratorError`], used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document does not match the expected shape.
    Malformed,
    /// The document uses a construct the generator does not model.
    Unsupported,
    /// A named type reference does not resolve.
    Unresolved,
    /// Anything else (I/O, network, configuration, internal).
    Other,
}

impl ErrorKind {
    /// Process exit code for this kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Malformed => 2,
            Self::Unsupported => 3,
            Self::Unresolved => 4,
            Self::Other => 1,
        }
    }

    /// Short label printed before the message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed spec",
            Self::Unsupported => "unsupported feature",
            Self::Unresolved => "unresolved reference",
            Self::Other => "error",
        }
    }
}

/// Errors that can occur during code generation.
///
/// The first three variants describe problems with the input document and are
/// always raised before any output is written.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The document does not conform to the expected schema.
    #[error("Malformed spec at {location}: {reason}")]
    MalformedSpec {
        location: SpecLocation,
        reason: String,
    },

    /// The document uses a construct the generator does not model.
    #[error("Unsupported feature at {location}: {feature}")]
    UnsupportedFeature {
        location: SpecLocation,
        feature: String,
    },

    /// A named type reference does not resolve against the type registry.
    #[error("Unresolved reference '{reference}' at {location}")]
    UnresolvedReference {
        location: SpecLocation,
        reference: String,
    },

    /// Failed to fetch or read the document.
    #[error("Failed to load spec from '{source_name}': {reason}")]
    Fetch { source_name: String, reason: String },

    /// Generated code failed validation.
    #[error("Code generation failed: {0}")]
    CodeGen(String),

    /// Failed to write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid generator configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Creates a malformed spec error.
    pub fn malformed(location: SpecLocation, reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            location,
            reason: reason.into(),
        }
    }

    /// Creates an unsupported feature error.
    pub fn unsupported(location: SpecLocation, feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            location,
            feature: feature.into(),
        }
    }

    /// Creates an unresolved reference error.
    pub fn unresolved(location: SpecLocation, reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            location,
            reference: reference.into(),
        }
    }

    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedSpec { .. } => ErrorKind::Malformed,
            Self::UnsupportedFeature { .. } => ErrorKind::Unsupported,
            Self::UnresolvedReference { .. } => ErrorKind::Unresolved,
            Self::Fetch { .. } | Self::CodeGen(_) | Self::Write { .. } | Self::Config(_) => {
                ErrorKind::Other
            }
        }
    }

    /// The location in the document, for spec-level errors.
    pub fn location(&self) -> Option<&SpecLocation> {
        match self {
            Self::MalformedSpec { location, .. }
            | Self::UnsupportedFeature { location, .. }
            | Self::UnresolvedReference { location, .. } => Some(location),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_renders_present_parts() {
        let location = SpecLocation::resource("/term").operation("get").field("id");
        assert_eq!(location.to_string(), "resource /term, operation get, field id");
        assert_eq!(SpecLocation::document().to_string(), "document");
        assert_eq!(
            SpecLocation::model("Term").field("label").to_string(),
            "field models.Term.label"
        );
    }

    #[test]
    fn operation_resets_field() {
        let location = SpecLocation::resource("/term").field("x").operation("get");
        assert_eq!(location.field, None);
    }

    #[test]
    fn exit_codes_by_kind() {
        let malformed = GeneratorError::malformed(SpecLocation::document(), "bad");
        let unsupported = GeneratorError::unsupported(SpecLocation::document(), "form");
        let unresolved = GeneratorError::unresolved(SpecLocation::document(), "Missing");
        let other = GeneratorError::Config("x".into());
        assert_eq!(malformed.kind().exit_code(), 2);
        assert_eq!(unsupported.kind().exit_code(), 3);
        assert_eq!(unresolved.kind().exit_code(), 4);
        assert_eq!(other.kind().exit_code(), 1);
    }

    #[test]
    fn message_includes_location() {
        let err = GeneratorError::unresolved(
            SpecLocation::resource("/graph").operation("neighbors"),
            "Edge",
        );
        assert_eq!(
            err.to_string(),
            "Unresolved reference 'Edge' at resource /graph, operation neighbors"
        );
        assert!(err.location().is_some());
    }
}
