//! Invocation types
//!
//! An invocation is one outbound call to the target API: the immutable
//! description of the request plus the normalized capture of whatever
//! came back.

mod method;
mod query;
mod result;
mod spec;

pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use result::{InvocationResult, StatusCode, TransportError, TransportErrorKind};
pub use spec::InvocationSpec;
