//! Cargo.toml generation for a generated client crate.
//!
//! The manifest is written next to the `src/` directory the sources go into.
//! Generated code needs the runtime crate, `serde` for the payload derives and
//! `serde_json` for untyped values.

use std::path::{Path, PathBuf};

use heck::ToKebabCase;
use scigraph_define::SpecModel;

use crate::errors::GeneratorError;
use crate::output::write_atomic;

/// Where the generated crate finds the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeSource {
    /// A crates.io version requirement.
    Version(String),
    /// A local checkout, relative to the generated crate.
    Path(String),
}

impl Default for RuntimeSource {
    fn default() -> Self {
        Self::Version(env!("CARGO_PKG_VERSION").to_string())
    }
}

/// Renders the manifest for a generated crate.
///
/// The package name is the document title in kebab case plus `-client`.
pub fn generate_manifest(model: &SpecModel, runtime: &RuntimeSource) -> String {
    let title = model.title.to_kebab_case();
    let name = if title.is_empty() {
        "api-client".to_string()
    } else {
        format!("{title}-client")
    };
    let version = model
        .api_version
        .as_deref()
        .filter(|v| is_semver(v))
        .unwrap_or("0.1.0");
    let runtime = match runtime {
        RuntimeSource::Version(version) => format!("\"{version}\""),
        RuntimeSource::Path(path) => format!("{{ path = \"{path}\" }}"),
    };

    format!(
        r#"# This file was automatically generated by scigraph-codegen. Do not edit manually.

[package]
name = "{name}"
version = "{version}"
edition = "2024"
description = "Generated client for the {title_text} API"

[dependencies]
scigraph-runtime = {runtime}
serde = {{ version = "1.0", features = ["derive"] }}
serde_json = "1.0"

[dev-dependencies]
tokio = {{ version = "1.43", features = ["rt-multi-thread", "macros"] }}
"#,
        title_text = model.title.replace('"', "'"),
    )
}

/// Writes `Cargo.toml` into the parent of the sources directory.
///
/// ## Errors
///
/// - `GeneratorError::Config` if `src_dir` has no parent
/// - `GeneratorError::Write` if the file cannot be written
pub fn write_manifest(
    model: &SpecModel,
    runtime: &RuntimeSource,
    src_dir: &Path,
) -> Result<PathBuf, GeneratorError> {
    let crate_dir = manifest_dir(src_dir)?;
    let path = crate_dir.join("Cargo.toml");
    write_atomic(&path, &generate_manifest(model, runtime))?;
    Ok(path)
}

/// The crate directory for a sources directory (`<crate>/src` → `<crate>`).
pub fn manifest_dir(src_dir: &Path) -> Result<PathBuf, GeneratorError> {
    match src_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        Some(_) => Ok(PathBuf::from(".")),
        None => Err(GeneratorError::Config(format!(
            "cannot place Cargo.toml above '{}'",
            src_dir.display()
        ))),
    }
}

fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
