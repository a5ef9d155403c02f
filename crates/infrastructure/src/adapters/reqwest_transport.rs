//! Transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port using the reqwest
//! library. It handles all HTTP communication for the harness.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use reqwest::{Client, Method};
use url::Url;

use sonar_application::ports::{RawResponse, Transport};
use sonar_domain::{HttpMethod, InvocationSpec, TransportError, TransportErrorKind};

/// Default per-call timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport implementation backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new transport with default settings.
    ///
    /// Default configuration:
    /// - Per-call timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - User-Agent: "Sonar/0.1.0"
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a new transport with a custom per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent("Sonar/0.1.0")
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the domain error kinds.
    fn map_error(error: &reqwest::Error) -> TransportError {
        let message = error.to_string();

        if error.is_timeout() {
            return TransportError::new(TransportErrorKind::Timeout, message);
        }

        if error.is_connect() {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::new(TransportErrorKind::Dns, message);
            }
            return TransportError::new(TransportErrorKind::Connection, message);
        }

        TransportError::new(TransportErrorKind::Other, message)
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        spec: &InvocationSpec,
        base: &Url,
    ) -> Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + Send + '_>> {
        // Clone what we need to move into the async block
        let method = spec.method;
        let url = spec.url(base);
        let body = spec.body.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let url = url
                .map_err(|e| TransportError::new(TransportErrorKind::InvalidUrl, e.to_string()))?;

            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), url)
                .timeout(timeout);

            if let Some(json) = &body {
                builder = builder.json(json);
            }

            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::new(TransportErrorKind::Connection, e.to_string()))?;

            Ok(RawResponse {
                status,
                body,
                duration: start.elapsed(),
            })
        })
    }
}
