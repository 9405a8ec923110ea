//! Crate documentation for generated clients.
//!
//! This module provides the [`ModuleDocBuilder`] struct for generating the
//! documentation of the `lib` unit. The documentation includes an
//! introduction, a resource list and a usage example.

use std::collections::BTreeMap;

use scigraph_define::{RestMethod, SpecModel};

use super::client::accessor_name;
use super::doc_lines;
use crate::naming::unraw;

/// Builds crate-level documentation for a generated client.
///
/// The builder generates documentation sections including:
/// - Introduction paragraph with API title, description and version
/// - Resources section listing operations grouped by resource
/// - Example section with a basic usage example
///
/// ## Examples
///
/// ```ignore
/// use scigraph_gen::codegen::ModuleDocBuilder;
///
/// let model = scigraph_gen::parser::parse(document)?;
/// let lines = ModuleDocBuilder::new(&model, "SciGraphClient").build();
/// ```
pub struct ModuleDocBuilder<'a> {
    model: &'a SpecModel,
    client_name: &'a str,
}

impl<'a> ModuleDocBuilder<'a> {
    /// Creates a new documentation builder for the given model.
    pub fn new(model: &'a SpecModel, client_name: &'a str) -> Self {
        Self { model, client_name }
    }

    /// Builds the complete documentation as doc lines.
    pub fn build(&self) -> Vec<String> {
        let mut lines = self.intro_paragraph();
        lines.push(String::new());
        lines.extend(self.resources_section());
        lines.push(String::new());
        lines.extend(self.example_section());
        lines
    }

    /// Generates the introduction paragraph.
    fn intro_paragraph(&self) -> Vec<String> {
        let mut lines = vec![format!(" Generated client for the {} API.", self.model.title)];
        if let Some(description) = &self.model.description {
            lines.push(String::new());
            lines.extend(doc_lines(description));
        }
        let mut facts = Vec::new();
        if let Some(version) = &self.model.api_version {
            facts.push(format!(" API version: `{version}`"));
        }
        if let Some(base_url) = &self.model.base_url {
            facts.push(format!(" Default base URL: <{base_url}>"));
        }
        if !facts.is_empty() {
            lines.push(String::new());
            lines.extend(facts);
        }
        lines
    }

    /// Groups operations by resource, sorted by resource identifier.
    fn categorize_operations(&self) -> BTreeMap<&str, Vec<(String, RestMethod, &str)>> {
        let mut categories: BTreeMap<&str, Vec<(String, RestMethod, &str)>> = BTreeMap::new();
        for resource in &self.model.resources {
            let entry = categories.entry(resource.ident.as_str()).or_default();
            for operation in &resource.operations {
                entry.push((
                    unraw(&operation.ident).to_string(),
                    operation.method,
                    operation.path.as_str(),
                ));
            }
        }
        categories
    }

    /// Generates the resources section.
    fn resources_section(&self) -> Vec<String> {
        let categories = self.categorize_operations();
        if categories.is_empty() {
            return vec![
                " ## Resources".to_string(),
                String::new(),
                " No resources defined.".to_string(),
            ];
        }

        let mut lines = vec![" ## Resources".to_string(), String::new()];
        for (resource, operations) in &categories {
            lines.push(format!(" **`{}()`**:", accessor_name(resource)));
            for (name, method, path) in operations {
                lines.push(format!(" - `{name}` - `{method} {path}`"));
            }
            lines.push(String::new());
        }
        lines.pop();
        lines
    }

    /// Generates the example section.
    ///
    /// Uses the first GET operation, or the first operation if there is no
    /// GET operation.
    fn example_section(&self) -> Vec<String> {
        let found = self
            .model
            .resources_sorted()
            .into_iter()
            .flat_map(|r| r.operations.iter().map(move |o| (r, o)))
            .min_by_key(|(_, o)| o.method != RestMethod::Get);

        let Some((resource, operation)) = found else {
            return vec![
                " ## Example".to_string(),
                String::new(),
                " No operations available for example.".to_string(),
            ];
        };

        let args: Vec<&str> = operation.required_parameters().map(|p| unraw(&p.ident)).collect();
        let mut args = args.join(", ");
        if operation.optional_parameters().next().is_some() {
            if !args.is_empty() {
                args.push_str(", ");
            }
            args.push_str("Default::default()");
        }

        let example = format!(
            r#" ## Example

 ```ignore
 let client = {}::from_env()?;
 let response = client.{}().{}({}).await?;
 println!("{{response:?}}");
 ```"#,
            self.client_name,
            accessor_name(&resource.ident),
            unraw(&operation.ident),
            args
        );
        example.lines().map(str::to_string).collect()
    }
}
