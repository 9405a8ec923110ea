//! Call dispatch.
//!
//! Every generated operation method builds an
//! [`OperationRequest`](crate::OperationRequest) and hands it to a
//! [`Dispatcher`] together with an [`Expectation`](crate::Expectation).
//!
//! ## Examples
//!
//! ```rust,ignore
//! use scigraph_runtime::{
//!     ClientConfig, Dispatcher, Expectation, OperationRequest, PayloadFormat,
//!     ReqwestTransport, RestMethod, StatusMatch, Undocumented,
//! };
//!
//! let config = ClientConfig::new("https://scicrunch.org/api/1/scigraph")?;
//! let dispatcher = Dispatcher::new(config, ReqwestTransport::new()?);
//!
//! let mut request = OperationRequest::new(RestMethod::Get, "/vocabulary/id/{id}");
//! request.path_param("id", "UBERON:0000955")?;
//! let concept: serde_json::Value = dispatcher
//!     .dispatch::<_, Undocumented>(request, Expectation::new(StatusMatch::Exact(200), PayloadFormat::Json))
//!     .await?;
//! ```

mod dispatcher;

pub use dispatcher::Dispatcher;
