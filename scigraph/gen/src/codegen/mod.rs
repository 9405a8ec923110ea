//! Code generation for SciGraph clients.
//!
//! Each submodule produces the tokens of one kind of code unit:
//!
//! - [`types`] - every named and hoisted declaration, with serde derives
//! - [`resource`] - one handle struct per resource with its async operation
//!   methods, options bundles and error enums
//! - [`client`] - the top-level client owning the dispatcher
//! - [`module_docs`] - crate documentation for the `lib` unit
//!
//! ## Output Format
//!
//! Generators return [`UnitTokens`]: the unit's documentation lines and its
//! items. [`crate::output`] turns them into standalone files (docs as inner
//! attributes) or into inline modules of a single bundle (docs as outer
//! attributes), then validates with `syn` and formats with `prettyplease`.

pub mod client;
pub mod module_docs;
pub mod resource;
pub mod types;

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use scigraph_define::SpecModel;
use tracing::{debug, instrument};

use crate::errors::GeneratorError;
use crate::naming::{ident, pascal_ident};
use crate::output::{self, GeneratedSource};
use crate::types::TypeMapper;

pub use module_docs::ModuleDocBuilder;

/// Crate path generated code uses for the runtime, unless overridden.
pub const DEFAULT_RUNTIME_CRATE: &str = "scigraph_runtime";

/// Knobs for [`emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Name of the top-level client struct. Defaults to the document title
    /// in `PascalCase` plus `Client`.
    pub client_name: Option<String>,
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_crate: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            client_name: None,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

/// Documentation lines plus items of one code unit.
#[derive(Debug, Clone)]
pub struct UnitTokens {
    /// Lines of the unit's documentation, each with a leading space.
    pub docs: Vec<String>,
    /// The unit's items.
    pub items: TokenStream,
}

/// Everything the unit generators share.
pub struct EmitContext<'a> {
    pub model: &'a SpecModel,
    pub types: &'a TypeMapper,
    /// Runtime crate path tokens, e.g. `scigraph_runtime`.
    pub runtime: TokenStream,
    /// Name of the top-level client struct.
    pub client_name: String,
}

impl<'a> EmitContext<'a> {
    /// Resolves `options` against `model`.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::Config`] if the client name is not a valid
    /// identifier or the runtime crate is not a valid path.
    pub fn new(
        model: &'a SpecModel,
        types: &'a TypeMapper,
        options: &EmitOptions,
    ) -> Result<Self, GeneratorError> {
        let runtime: syn::Path = syn::parse_str(&options.runtime_crate).map_err(|e| {
            GeneratorError::Config(format!(
                "runtime crate '{}' is not a valid path: {e}",
                options.runtime_crate
            ))
        })?;

        let client_name = match &options.client_name {
            Some(name) => {
                if syn::parse_str::<Ident>(name).is_err() {
                    return Err(GeneratorError::Config(format!(
                        "client name '{name}' is not a valid identifier"
                    )));
                }
                name.clone()
            }
            None => format!(
                "{}Client",
                pascal_ident(&model.title).unwrap_or_else(|| "Api".to_string())
            ),
        };

        Ok(Self {
            model,
            types,
            runtime: quote! { #runtime },
            client_name,
        })
    }

    /// The client struct identifier.
    pub fn client_ident(&self) -> Ident {
        ident(&self.client_name)
    }
}

/// Emits every code unit for `model`.
///
/// Units come out in a fixed order: `lib`, `types`, `client`, then one per
/// resource sorted by identifier.
///
/// ## Errors
///
/// - [`GeneratorError::Config`] for invalid [`EmitOptions`]
/// - [`GeneratorError::CodeGen`] if a unit does not parse as Rust
#[instrument(name = "emit", skip_all, fields(resources = model.resources.len()))]
pub fn emit(
    model: &SpecModel,
    types: &TypeMapper,
    options: &EmitOptions,
) -> Result<GeneratedSource, GeneratorError> {
    let ctx = EmitContext::new(model, types, options)?;

    let mut units: Vec<(String, UnitTokens)> = vec![
        ("types".to_string(), types::generate_types_unit(&ctx)),
        ("client".to_string(), client::generate_client_unit(&ctx)),
    ];
    for resource in model.resources_sorted() {
        units.push((
            resource.ident.clone(),
            resource::generate_resource_unit(&ctx, resource),
        ));
    }

    let source = output::assemble(&ctx, &units)?;
    debug!(units = source.units.len(), "emitted source");
    Ok(source)
}

/// Splits free text into doc lines.
///
/// Lines are trimmed so nothing is mistaken for an indented code block, and
/// fences are broken so descriptions never turn into doctests.
pub(crate) fn doc_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim().replace("```", "'''");
            if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            }
        })
        .collect()
}

/// Renders doc lines as `#[doc = ..]` attributes.
pub(crate) fn doc_attrs(lines: &[String]) -> TokenStream {
    quote! { #( #[doc = #lines] )* }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::model_with;

    #[test]
    fn default_client_name_comes_from_title() {
        let model = model_with(vec![], vec![]);
        let types = TypeMapper::build(&model);
        let ctx = EmitContext::new(&model, &types, &EmitOptions::default()).unwrap();
        assert_eq!(ctx.client_name, "SciGraphClient");
    }

    #[test]
    fn invalid_options_are_config_errors() {
        let model = model_with(vec![], vec![]);
        let types = TypeMapper::build(&model);

        let bad_name = EmitOptions {
            client_name: Some("not a name".into()),
            ..EmitOptions::default()
        };
        assert!(matches!(
            EmitContext::new(&model, &types, &bad_name),
            Err(GeneratorError::Config(_))
        ));

        let bad_path = EmitOptions {
            runtime_crate: "scigraph-runtime".into(),
            ..EmitOptions::default()
        };
        assert!(matches!(
            EmitContext::new(&model, &types, &bad_path),
            Err(GeneratorError::Config(_))
        ));
    }

    #[test]
    fn doc_lines_are_trimmed_and_defanged() {
        let lines = doc_lines("Find terms.\n\n    indented\n```rust\nx\n```");
        assert_eq!(lines, [" Find terms.", "", " indented", " '''rust", " x", " '''"]);
    }
}
