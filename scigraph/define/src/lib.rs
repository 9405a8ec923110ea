//! SciGraph specification model.
//!
//! This crate holds the in-memory representation of a parsed API
//! specification document. The model is produced by `scigraph-gen`'s parser
//! and consumed by its type mapper and code emitter. The generated runtime
//! (`scigraph-runtime`) re-exports the few types that generated code names
//! directly ([`RestMethod`], [`StatusMatch`], [`PayloadFormat`],
//! [`BodyFormat`]).
//!
//! ## Core Types
//!
//! - [`SpecModel`] - A complete specification: resources plus named types
//! - [`ResourceSpec`] - A named group of operations
//! - [`OperationSpec`] - One endpoint: method, path, parameters, responses
//! - [`ParameterSpec`] - A path, query, body or header parameter
//! - [`TypeSpec`] - Recursive type descriptor
//! - [`ResponseSpec`] / [`ErrorSpec`] - Success and documented failure shapes
//!
//! ## Examples
//!
//! ```
//! use scigraph_define::prelude::*;
//!
//! let operation = OperationSpec {
//!     name: "get".to_string(),
//!     ident: "get".to_string(),
//!     type_ident: "TermGet".to_string(),
//!     method: RestMethod::Get,
//!     path: "/term/{id}".to_string(),
//!     summary: Some("Look up a term".to_string()),
//!     notes: None,
//!     parameters: vec![ParameterSpec {
//!         name: "id".to_string(),
//!         ident: "id".to_string(),
//!         kind: ParamKind::Path,
//!         ty: TypeSpec::string(),
//!         required: true,
//!         default: None,
//!         description: None,
//!     }],
//!     body_format: BodyFormat::Json,
//!     response: ResponseSpec {
//!         status: StatusMatch::Exact(200),
//!         format: PayloadFormat::Json,
//!         ty: Some(TypeSpec::reference("Term")),
//!     },
//!     errors: vec![],
//! };
//!
//! assert_eq!(operation.required_parameters().count(), 1);
//! assert!(operation.body_parameter().is_none());
//! ```

pub mod prelude;
pub mod request;
pub mod response;
pub mod schema;
pub mod types;

pub use request::{BodyFormat, ParamKind, ParameterSpec};
pub use response::{ErrorSpec, PayloadFormat, ResponseSpec, StatusMatch};
pub use schema::{
    EnumSpec, FieldSpec, NamedType, ObjectSpec, OriginKind, Primitive, TypeOrigin, TypeSpec,
};
pub use types::{OperationSpec, ResourceSpec, RestMethod, SpecModel};
