//! Transport port

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use url::Url;

use sonar_domain::{InvocationSpec, TransportError};

/// What came back over the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Elapsed wall-clock time.
    pub duration: Duration,
}

/// Port for sending a single HTTP request.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// invoker to be exercised against scripted fakes in tests. The future
/// is boxed so the trait stays dyn-compatible.
pub trait Transport: Send + Sync {
    /// Sends the request described by `spec` against `base` and returns
    /// the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be captured:
    /// timeout, connection failure, DNS failure, or an unusable URL.
    fn send(
        &self,
        spec: &InvocationSpec,
        base: &Url,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>>;
}
