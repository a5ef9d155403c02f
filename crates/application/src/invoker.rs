//! Endpoint invoker.
//!
//! The invoker is the only place the harness touches the network. Its
//! contract: `invoke` never raises. URL-resolution failures, transport
//! failures, and undecodable bodies are all folded into the returned
//! [`InvocationResult`] so a broken call becomes a testable condition
//! instead of aborting the run.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use sonar_domain::{InvocationResult, InvocationSpec, TransportError, TransportErrorKind};

use crate::ports::Transport;

/// Issues invocations against a fixed base URL through a [`Transport`].
pub struct Invoker<T: Transport> {
    transport: Arc<T>,
    base_url: Url,
}

impl<T: Transport> Invoker<T> {
    /// Creates a new invoker for the given target.
    pub fn new(transport: Arc<T>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Invokes one spec and returns the normalized result.
    ///
    /// Never returns an error: transport failures are captured in the
    /// result, and the response body's JSON decode is attempted with
    /// failure preserved as a distinct condition.
    pub async fn invoke(&self, spec: &InvocationSpec) -> InvocationResult {
        // Reject unusable specs before touching the network.
        if let Err(e) = spec.validate() {
            return InvocationResult::from_transport_error(
                TransportError::new(TransportErrorKind::InvalidUrl, e.to_string()),
                Duration::ZERO,
            );
        }

        tracing::debug!(request = %spec.label(), "invoking");

        let result = match self.transport.send(spec, &self.base_url).await {
            Ok(response) => {
                InvocationResult::from_response(response.status, response.body, response.duration)
            }
            Err(error) => {
                tracing::debug!(request = %spec.label(), error = %error, "transport failure");
                InvocationResult::from_transport_error(error, Duration::ZERO)
            }
        };

        tracing::debug!(
            request = %spec.label(),
            status = result.status,
            "invocation complete"
        );

        result
    }
}
