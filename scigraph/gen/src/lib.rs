//! SciGraph client generator library.
//!
//! This crate turns a SciGraph API document (Swagger 1.2 JSON) into the
//! source of a strongly-typed Rust client built on `scigraph-runtime`. The
//! generated code includes:
//!
//! - A client struct owning a `Dispatcher`, with one accessor per resource
//! - One handle struct per resource with an async method per operation
//! - Options bundles for optional parameters
//! - Error enums for documented failure responses
//! - Serde types for every named model and inline object
//!
//! ## Modules
//!
//! - [`parser`] - Document parsing and validation
//! - [`types`] - Rust type mapping and hoisting of inline types
//! - [`codegen`] - Code generation for each unit
//! - [`output`] - Final assembly, validation, and file writing
//! - [`manifest`] - Cargo.toml generation for the output crate
//! - [`source`] - Loading documents from files or URLs
//! - [`naming`] - Canonical identifiers
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use scigraph_gen::{GenerateOptions, generate};
//! use scigraph_gen::output::write_all;
//!
//! let document = std::fs::read("scigraph.json").unwrap();
//! let source = generate(&document, &GenerateOptions::default()).unwrap();
//! write_all(&source.units, Path::new("generated/src")).unwrap();
//! ```
//!
//! ## Generated Code Structure
//!
//! For a document titled "SciGraph" with a `/term` resource:
//!
//! ```text
//! // types.rs
//! pub struct Term { pub id: String, pub label: Option<String> }
//!
//! // term.rs
//! pub struct TermResource<'a, T> { .. }
//! pub enum TermGetError { Status404(ErrorMessage) }
//! impl<'a, T: Transport> TermResource<'a, T> {
//!     pub async fn get(&self, id: impl Into<String>) -> Result<Term, CallError<TermGetError>>;
//! }
//!
//! // client.rs
//! pub struct SciGraphClient<T = ReqwestTransport> { .. }
//! impl<T: Transport> SciGraphClient<T> {
//!     pub fn term(&self) -> TermResource<'_, T>;
//! }
//! ```

pub mod codegen;
pub mod errors;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod parser;
pub mod source;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use codegen::EmitOptions as GenerateOptions;
pub use errors::{ErrorKind, GeneratorError, SpecLocation};
pub use output::{CodeUnit, GeneratedSource};

/// Parses `document` and emits every code unit.
///
/// Nothing is written to disk; pass the result to [`output::write_all`].
///
/// ## Errors
///
/// Any [`GeneratorError`] from parsing or emission.
pub fn generate(
    document: &[u8],
    options: &GenerateOptions,
) -> Result<GeneratedSource, GeneratorError> {
    let model = parser::parse(document)?;
    let types = types::TypeMapper::build(&model);
    codegen::emit(&model, &types, options)
}
