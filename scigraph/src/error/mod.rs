//! Error types for generated client calls.
//!
//! Errors are organized by where a call failed:
//!
//! - [`CallError`] - What every generated operation method returns
//! - [`TransportError`] - The request never produced a usable response
//! - [`DecodeError`] - The service answered, but not as documented
//! - [`EncodeError`] - The request could not be built from its arguments
//! - [`ConfigError`] - The client could not be configured

mod call_error;
mod config_error;
mod decode_error;
mod encode_error;
mod transport_error;

pub use call_error::CallError;
pub use config_error::ConfigError;
pub use decode_error::DecodeError;
pub use encode_error::EncodeError;
pub use transport_error::{BoxError, TransportError};
