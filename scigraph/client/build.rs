//! Generates the client from the checked-in SciGraph document.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use scigraph_gen::{GenerateOptions, generate};

const SPEC: &str = "spec/scigraph.json";

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed={SPEC}");

    let document = fs::read(SPEC)?;
    let source = generate(&document, &GenerateOptions::default())?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("scigraph.rs"), source.bundle)?;
    Ok(())
}
