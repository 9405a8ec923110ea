//! Runtime support for generated SciGraph clients.
//!
//! Code emitted by `scigraph-gen` is thin: each operation method collects its
//! arguments into an [`OperationRequest`] and calls
//! [`Dispatcher::dispatch`]. Everything else lives here.
//!
//! ## Features
//!
//! - **Pluggable transport**: [`Transport`] is the only network boundary;
//!   [`ReqwestTransport`] is the default
//! - **Explicit configuration**: [`ClientConfig`] carries base URL, default
//!   headers, credential and timeout
//! - **Typed failures**: [`CallError`] separates documented errors from
//!   transport, decoding and encoding failures
//! - **Tracing**: every call runs inside a `scigraph_call` span recording
//!   method, URL and status
//!
//! ## Example
//!
//! ```rust,ignore
//! use scigraph_client::SciGraphClient;
//!
//! let client = SciGraphClient::from_env()?;
//! let term = client.term().get("HBP_00001").await?;
//! println!("{}", term.label);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Dispatcher;
pub use config::{AuthToken, ClientConfig, ClientConfigBuilder};
pub use error::{BoxError, CallError, ConfigError, DecodeError, EncodeError, TransportError};
pub use request::{OperationRequest, RequestBody};
pub use response::{ErrorShape, Expectation, Undocumented, decode_json, decode_payload};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use scigraph_define::{BodyFormat, PayloadFormat, RestMethod, StatusMatch};
