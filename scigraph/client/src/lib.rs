//! Typed client for the SciGraph ontology services.
//!
//! The code in this crate is generated by `scigraph-codegen` from
//! `spec/scigraph.json` every time the document changes. Each resource of
//! the API is a module with a handle struct; [`SciGraphClient`] hands them
//! out:
//!
//! ```no_run
//! use scigraph_client::SciGraphClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SciGraphClient::from_env()?;
//! let term = client.term().get("HBP_00001").await?;
//! println!("{:?}", term.label);
//! # Ok(())
//! # }
//! ```
//!
//! Configuration, transports and error types come from [`runtime`].

pub use scigraph_runtime as runtime;

include!(concat!(env!("OUT_DIR"), "/scigraph.rs"));
