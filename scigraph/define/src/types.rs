//! Core types of the specification model.
//!
//! This module provides the top of the model tree:
//!
//! - [`SpecModel`] - A parsed specification document
//! - [`ResourceSpec`] - A named group of operations
//! - [`OperationSpec`] - A single callable endpoint
//! - [`RestMethod`] - HTTP method enumeration

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::request::{BodyFormat, ParamKind, ParameterSpec};
use crate::response::{ErrorSpec, ResponseSpec};
use crate::schema::NamedType;

/// HTTP methods supported by the generator.
///
/// ## Examples
///
/// Parse from string:
///
/// ```
/// use std::str::FromStr;
/// use scigraph_define::RestMethod;
///
/// let method = RestMethod::from_str("GET").unwrap();
/// assert_eq!(method, RestMethod::Get);
/// ```
///
/// Display as uppercase:
///
/// ```
/// use scigraph_define::RestMethod;
///
/// assert_eq!(RestMethod::Post.to_string(), "POST");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource
    Get,
    /// HTTP POST - Create a new resource
    Post,
    /// HTTP PUT - Replace a resource entirely
    Put,
    /// HTTP PATCH - Partially update a resource
    Patch,
    /// HTTP DELETE - Remove a resource
    Delete,
    /// HTTP HEAD - Get headers only (no body)
    Head,
    /// HTTP OPTIONS - Get allowed methods for a resource
    Options,
}

impl RestMethod {
    /// Returns the variant name as written in Rust source (e.g. `"Get"`).
    ///
    /// Used by the code generator to emit `RestMethod::Get` paths.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
            Self::Head => "Head",
            Self::Options => "Options",
        }
    }
}

/// A parsed specification document.
///
/// Built once per generation run by the parser and never mutated afterwards.
/// Resources keep document order; the type registry is sorted by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecModel {
    /// Human-readable API title.
    pub title: String,
    /// Longer description of the API, if the document has one.
    pub description: Option<String>,
    /// Version string declared by the document (`apiVersion`).
    pub api_version: Option<String>,
    /// Default base URL for every operation (`basePath`).
    pub base_url: Option<String>,
    /// All resources in document order.
    pub resources: Vec<ResourceSpec>,
    /// Named type declarations (`models`), sorted by name.
    pub types: Vec<NamedType>,
}

impl SpecModel {
    /// Looks up a named type by its declared (document) name.
    pub fn named_type(&self, name: &str) -> Option<&NamedType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Returns resources sorted by canonical identifier.
    ///
    /// This is the traversal order used for hoisting and emission, so that
    /// output never depends on the order resources appear in the document.
    pub fn resources_sorted(&self) -> Vec<&ResourceSpec> {
        let mut resources: Vec<&ResourceSpec> = self.resources.iter().collect();
        resources.sort_by(|a, b| a.ident.cmp(&b.ident));
        resources
    }

    /// Total number of operations across all resources.
    pub fn operation_count(&self) -> usize {
        self.resources.iter().map(|r| r.operations.len()).sum()
    }
}

/// A named API resource (one section of the API).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSpec {
    /// Name as written in the document (e.g. `/vocabulary`).
    pub name: String,
    /// Canonical `snake_case` identifier (e.g. `vocabulary`).
    ///
    /// Becomes the module name, file name and client accessor.
    pub ident: String,
    /// Canonical `PascalCase` identifier (e.g. `Vocabulary`).
    pub type_ident: String,
    /// Description of the resource.
    pub description: Option<String>,
    /// Operations in declaration order.
    pub operations: Vec<OperationSpec>,
}

/// One callable endpoint.
///
/// ## Path Parameters
///
/// Paths use `{param}` placeholders. The parser guarantees every placeholder
/// has a matching [`ParamKind::Path`] parameter and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSpec {
    /// Identifier as written in the document (`nickname`), or the derived one.
    pub name: String,
    /// Canonical `snake_case` identifier, unique within the resource.
    pub ident: String,
    /// Canonical `PascalCase` identifier of the owning resource plus this
    /// operation (e.g. `TermGet`). Prefix for every generated type name.
    pub type_ident: String,
    /// HTTP method.
    pub method: RestMethod,
    /// Path template relative to the base URL (e.g. `/term/{id}`).
    pub path: String,
    /// One-line summary.
    pub summary: Option<String>,
    /// Longer notes.
    pub notes: Option<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterSpec>,
    /// Content type used to serialize the body parameter.
    pub body_format: BodyFormat,
    /// The documented success response.
    pub response: ResponseSpec,
    /// Documented failure responses.
    pub errors: Vec<ErrorSpec>,
}

impl OperationSpec {
    /// Parameters that must be passed as positional arguments.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// Parameters reachable only through the options bundle.
    pub fn optional_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| !p.required)
    }

    /// Parameters of the given kind, in declaration order.
    pub fn parameters_of(&self, kind: ParamKind) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(move |p| p.kind == kind)
    }

    /// The body parameter, if the operation has one.
    pub fn body_parameter(&self) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.kind == ParamKind::Body)
    }
}
