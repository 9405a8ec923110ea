//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling the
//! unit tokens into files, validating them, formatting them, and writing them
//! to disk atomically.
//!
//! ## Output Structure
//!
//! ```text
//! <out>/
//! ├── lib.rs         # Crate docs, module declarations, client re-export
//! ├── types.rs       # Named models and hoisted inline types
//! ├── client.rs      # Top-level client
//! └── <resource>.rs  # One per resource
//! ```
//!
//! The same units are also rendered as a single bundle of inline modules,
//! suitable for `include!` from a build script's output.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Every file is written to a temporary sibling first and
//!   only renamed into place once all of them were written

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use quote::quote;
use tracing::{debug, instrument, warn};

use crate::codegen::{EmitContext, ModuleDocBuilder, UnitTokens, doc_attrs};
use crate::errors::GeneratorError;
use crate::naming::ident;

/// Notice prepended to every generated file.
const GENERATED_NOTICE: &str =
    "// This code was automatically generated by scigraph-codegen. Do not edit manually.";

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUnit {
    /// Unit name (`lib`, `types`, `client` or a resource identifier).
    pub name: String,
    /// File name relative to the output directory.
    pub file_name: String,
    /// Formatted contents.
    pub contents: String,
}

/// All generated code for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// `lib`, `types`, `client`, then resources sorted by identifier.
    pub units: Vec<CodeUnit>,
    /// Every unit as inline modules of a single file.
    pub bundle: String,
}

impl GeneratedSource {
    /// Looks up a unit by name.
    pub fn unit(&self, name: &str) -> Option<&CodeUnit> {
        self.units.iter().find(|u| u.name == name)
    }
}

/// Assembles validated, formatted units plus the bundle.
///
/// `units` are the non-`lib` units in output order; the `lib` unit is built
/// here from their names.
pub fn assemble(
    ctx: &EmitContext<'_>,
    units: &[(String, UnitTokens)],
) -> Result<GeneratedSource, GeneratorError> {
    let crate_docs = ModuleDocBuilder::new(ctx.model, &ctx.client_name).build();
    let client = ctx.client_ident();

    let mut code_units = Vec::with_capacity(units.len() + 1);
    code_units.push(CodeUnit {
        name: "lib".to_string(),
        file_name: "lib.rs".to_string(),
        contents: render(&assemble_lib_rs(&crate_docs, units, &client))?,
    });
    for (name, unit) in units {
        code_units.push(CodeUnit {
            name: name.clone(),
            file_name: format!("{}.rs", crate::naming::unraw(name)),
            contents: render(&assemble_file(unit))?,
        });
    }

    let bundle = render(&assemble_bundle(units, &client))?;
    Ok(GeneratedSource {
        units: code_units,
        bundle,
    })
}

/// A standalone file: docs as inner attributes, then the items.
fn assemble_file(unit: &UnitTokens) -> TokenStream {
    let docs = &unit.docs;
    let items = &unit.items;
    quote! {
        #( #![doc = #docs] )*

        #items
    }
}

/// The `lib.rs` file: crate docs, module declarations and re-exports.
fn assemble_lib_rs(
    crate_docs: &[String],
    units: &[(String, UnitTokens)],
    client: &proc_macro2::Ident,
) -> TokenStream {
    let modules = units.iter().map(|(name, _)| ident(name));
    quote! {
        #( #![doc = #crate_docs] )*

        #( pub mod #modules; )*

        pub use client::#client;
    }
}

/// Every unit as an inline module of one file.
///
/// Inner attributes are not allowed in `include!`d files, so unit docs become
/// outer attributes on the module.
fn assemble_bundle(units: &[(String, UnitTokens)], client: &proc_macro2::Ident) -> TokenStream {
    let modules = units.iter().map(|(name, unit)| {
        let name = ident(name);
        let docs = doc_attrs(&unit.docs);
        let items = &unit.items;
        quote! {
            #docs
            pub mod #name {
                #items
            }
        }
    });
    quote! {
        #(#modules)*

        pub use client::#client;
    }
}

/// Validates and formats one file.
pub fn render(tokens: &TokenStream) -> Result<String, GeneratorError> {
    let file = validate_code(tokens)?;
    Ok(format_code(&file))
}

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGen` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGen(format!("Generated code is invalid: {e}")))
}

/// Formats generated code using prettyplease.
///
/// Converts a parsed syn::File back to a nicely formatted string,
/// prepending an auto-generated notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{GENERATED_NOTICE}\n\n{formatted}")
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::Write` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    create_parent(path)?;

    let temp_path = temp_path(path);
    fs::write(&temp_path, content).map_err(|e| GeneratorError::Write {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        GeneratorError::Write {
            path: path.display().to_string(),
            source: e,
        }
    })
}

/// Writes every unit into `dir`.
///
/// All units are written to temporary files first; only when every write
/// succeeded are they renamed into place. On failure the temporaries are
/// removed and existing files are left untouched, apart from any already
/// renamed when a rename fails.
///
/// Returns the paths written, in unit order.
///
/// ## Errors
///
/// Returns `GeneratorError::Write` naming the path that failed.
#[instrument(name = "write", skip(units), fields(dir = %dir.display(), units = units.len()))]
pub fn write_all(units: &[CodeUnit], dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
    fs::create_dir_all(dir).map_err(|e| GeneratorError::Write {
        path: dir.display().to_string(),
        source: e,
    })?;

    let targets: Vec<(PathBuf, PathBuf)> = units
        .iter()
        .map(|unit| {
            let path = dir.join(&unit.file_name);
            (temp_path(&path), path)
        })
        .collect();

    for (index, (unit, (temp, _))) in units.iter().zip(&targets).enumerate() {
        if let Err(e) = fs::write(temp, &unit.contents) {
            warn!(path = %temp.display(), error = %e, "write failed, removing temporaries");
            remove_temps(&targets[..index]);
            return Err(GeneratorError::Write {
                path: temp.display().to_string(),
                source: e,
            });
        }
    }

    for (index, (temp, path)) in targets.iter().enumerate() {
        if let Err(e) = fs::rename(temp, path) {
            warn!(path = %path.display(), error = %e, "rename failed, removing temporaries");
            remove_temps(&targets[index..]);
            return Err(GeneratorError::Write {
                path: path.display().to_string(),
                source: e,
            });
        }
        debug!(path = %path.display(), "wrote unit");
    }

    Ok(targets.into_iter().map(|(_, path)| path).collect())
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

fn remove_temps(targets: &[(PathBuf, PathBuf)]) {
    for (temp, _) in targets {
        let _ = fs::remove_file(temp);
    }
}

fn create_parent(path: &Path) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str, contents: &str) -> CodeUnit {
        CodeUnit {
            name: name.into(),
            file_name: format!("{name}.rs"),
            contents: contents.into(),
        }
    }

    #[test]
    fn format_code_prepends_notice() {
        let file = validate_code(&quote! { pub struct Term; }).unwrap();
        let code = format_code(&file);
        assert!(code.starts_with(GENERATED_NOTICE));
        assert!(code.contains("pub struct Term;"));
    }

    #[test]
    fn invalid_tokens_are_codegen_errors() {
        let result = validate_code(&quote! { pub struct; });
        assert!(matches!(result, Err(GeneratorError::CodeGen(_))));
    }

    #[test]
    fn write_all_writes_every_unit_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let units = [unit("lib", "// lib\n"), unit("term", "// term\n")];
        let paths = write_all(&units, dir.path()).unwrap();

        assert_eq!(paths, [dir.path().join("lib.rs"), dir.path().join("term.rs")]);
        assert_eq!(fs::read_to_string(dir.path().join("term.rs")).unwrap(), "// term\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_write_leaves_existing_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), "old").unwrap();
        // A directory where a temporary file should go makes the second write fail.
        fs::create_dir(dir.path().join("term.tmp")).unwrap();

        let units = [unit("lib", "new"), unit("term", "new")];
        let err = write_all(&units, dir.path()).unwrap_err();

        assert!(matches!(err, GeneratorError::Write { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("lib.rs")).unwrap(), "old");
        assert!(!dir.path().join("lib.tmp").exists());
        assert!(!dir.path().join("term.rs").exists());
    }

    #[test]
    fn write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/Cargo.toml");
        write_atomic(&path, "[package]\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[package]\n");
        assert!(!dir.path().join("nested/Cargo.tmp").exists());
    }
}
