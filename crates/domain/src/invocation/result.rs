//! Invocation result types
//!
//! The normalized capture of one call: status, body, the parsed form of
//! the body when it decoded, and the transport error when the call never
//! produced a response. Invoking never raises; everything that can go
//! wrong on the wire lands in these fields instead.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// Categories of transport-level failure.
///
/// `decode` failures are not transport errors: a response arrived, its
/// body just was not valid JSON. Those are recorded on the result
/// itself so assertions can treat them as a distinct condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// The request exceeded its deadline.
    Timeout,
    /// The connection could not be established or was dropped.
    Connection,
    /// DNS resolution failed.
    Dns,
    /// The resolved URL was not a valid request target.
    InvalidUrl,
    /// Anything else the transport reported.
    Other,
}

impl TransportErrorKind {
    /// Returns the kind as a static lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Dns => "dns",
            Self::InvalidUrl => "invalid_url",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transport-level failure captured inside an [`InvocationResult`].
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category.
    pub kind: TransportErrorKind,
    /// Human-readable detail from the transport.
    pub message: String,
}

impl TransportError {
    /// Creates a new transport error.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Normalized outcome of one invocation.
///
/// Produced fresh per call and never reused. Exactly one of two shapes:
/// a response capture (status + body, JSON parse attempted) or a
/// transport error with status zero and empty body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    /// HTTP status code (0 when the call never produced a response).
    pub status: u16,
    /// Raw response body text.
    pub body: String,
    /// Parsed JSON body; `None` when parsing failed or no response arrived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Recorded JSON decode failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
    /// Transport failure, if the call never completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_error: Option<TransportError>,
    /// Elapsed wall-clock time.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl InvocationResult {
    /// Creates a result from a received response, attempting JSON decode.
    ///
    /// Decode failure is preserved, not raised: `json` stays `None` and
    /// `decode_error` records the parser message so assertions can test
    /// the condition.
    #[must_use]
    pub fn from_response(status: u16, body: impl Into<String>, duration: Duration) -> Self {
        let body = body.into();
        let (json, decode_error) = if body.trim().is_empty() {
            (None, None)
        } else {
            match serde_json::from_str(&body) {
                Ok(value) => (Some(value), None),
                Err(e) => (None, Some(e.to_string())),
            }
        };

        Self {
            status,
            body,
            json,
            decode_error,
            transport_error: None,
            duration,
        }
    }

    /// Creates a result capturing a transport failure.
    #[must_use]
    pub fn from_transport_error(error: TransportError, duration: Duration) -> Self {
        Self {
            status: 0,
            body: String::new(),
            json: None,
            decode_error: None,
            transport_error: Some(error),
            duration,
        }
    }

    /// Returns the status as a `StatusCode` struct.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::new(self.status)
    }

    /// Returns true if the call never produced a response.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        self.transport_error.is_some()
    }

    /// Returns true if a body arrived but was not valid JSON.
    #[must_use]
    pub const fn decode_failed(&self) -> bool {
        self.decode_error.is_some()
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode::new(200).is_success());
        assert!(StatusCode::new(201).is_success());
        assert!(StatusCode::new(404).is_client_error());
        assert!(StatusCode::new(500).is_server_error());
        assert!(!StatusCode::new(200).is_client_error());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::new(200).to_string(), "200 OK");
        assert_eq!(StatusCode::new(404).to_string(), "404 Not Found");
        assert_eq!(StatusCode::new(418).to_string(), "418 Unknown");
    }

    #[test]
    fn test_from_response_decodes_json() {
        let result =
            InvocationResult::from_response(200, r#"{"total": 42}"#, Duration::from_millis(10));

        assert_eq!(result.status, 200);
        assert!(!result.is_transport_error());
        assert!(!result.decode_failed());
        assert_eq!(result.json.unwrap()["total"], 42);
    }

    #[test]
    fn test_from_response_preserves_undecodable_body() {
        let result =
            InvocationResult::from_response(200, "<html>oops</html>", Duration::from_millis(10));

        assert!(result.json.is_none());
        assert!(result.decode_failed());
        assert_eq!(result.body, "<html>oops</html>");
    }

    #[test]
    fn test_empty_body_is_not_a_decode_failure() {
        let result = InvocationResult::from_response(204, "", Duration::ZERO);
        assert!(result.json.is_none());
        assert!(!result.decode_failed());
    }

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::new(TransportErrorKind::Timeout, "deadline exceeded");
        let result = InvocationResult::from_transport_error(err, Duration::from_secs(5));

        assert!(result.is_transport_error());
        assert_eq!(result.status, 0);
        assert_eq!(
            result.transport_error.unwrap().to_string(),
            "timeout: deadline exceeded"
        );
    }
}
