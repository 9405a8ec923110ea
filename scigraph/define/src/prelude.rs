//! Convenient re-exports for working with the specification model.
//!
//! ```
//! use scigraph_define::prelude::*;
//!
//! let ty = TypeSpec::array(TypeSpec::reference("Node"));
//! assert_eq!(ty.references(), vec!["Node"]);
//! ```

pub use crate::request::{BodyFormat, ParamKind, ParameterSpec};
pub use crate::response::{ErrorSpec, PayloadFormat, ResponseSpec, StatusMatch};
pub use crate::schema::{
    EnumSpec, FieldSpec, NamedType, ObjectSpec, OriginKind, Primitive, TypeOrigin, TypeSpec,
};
pub use crate::types::{OperationSpec, ResourceSpec, RestMethod, SpecModel};
