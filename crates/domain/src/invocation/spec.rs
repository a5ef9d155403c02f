//! Invocation specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{HttpMethod, QueryParam, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Complete description of one call against the target API.
///
/// Specs are value types: built once with the constructors below and
/// never mutated during a run. The base URL is supplied at invocation
/// time, so the same spec can be pointed at any deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Relative path (must start with `/`)
    pub path: String,
    /// Query parameters
    #[serde(default)]
    pub query: QueryParams,
    /// Optional JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl InvocationSpec {
    /// Creates a GET spec for the given relative path.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Creates a POST spec for the given relative path.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
        }
    }

    /// Adds a query parameter (builder pattern).
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(QueryParam::new(key, value));
        self
    }

    /// Sets the JSON body (builder pattern).
    #[must_use]
    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Validates that the path is a relative path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or does not start with `/`.
    pub fn validate(&self) -> DomainResult<()> {
        if self.path.is_empty() || !self.path.starts_with('/') {
            return Err(DomainError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }

    /// Resolves the full URL for this spec against a base URL.
    ///
    /// The spec path is appended to the base path, so a base of
    /// `https://host/api` and a path of `/about` resolve to
    /// `https://host/api/about` whether or not the base carries a
    /// trailing slash. Query parameters are appended in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the base cannot
    /// carry a path.
    pub fn url(&self, base: &Url) -> DomainResult<Url> {
        self.validate()?;

        if base.cannot_be_a_base() {
            return Err(DomainError::InvalidBaseUrl(base.to_string()));
        }

        let mut url = base.clone();
        let joined = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }

    /// Returns a compact `METHOD /path` label for logs and reports.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://cost.example.com/api/").unwrap()
    }

    #[test]
    fn test_get_spec() {
        let spec = InvocationSpec::get("/about");
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.path, "/about");
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_url_resolution() {
        let spec = InvocationSpec::get("/report")
            .with_query("id", "123123")
            .with_query("year", "2025")
            .with_query("month", "5");

        let url = spec.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cost.example.com/api/report?id=123123&year=2025&month=5"
        );
    }

    #[test]
    fn test_url_without_query() {
        let spec = InvocationSpec::get("/about");
        let url = spec.url(&base()).unwrap();
        assert_eq!(url.as_str(), "https://cost.example.com/api/about");
    }

    #[test]
    fn test_url_base_without_trailing_slash() {
        let base = Url::parse("https://cost.example.com/api").unwrap();
        let url = InvocationSpec::get("/about").url(&base).unwrap();
        assert_eq!(url.as_str(), "https://cost.example.com/api/about");
    }

    #[test]
    fn test_invalid_path_rejected() {
        let spec = InvocationSpec::get("about");
        assert!(matches!(spec.url(&base()), Err(DomainError::InvalidPath(_))));

        let spec = InvocationSpec::get("");
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_post_with_body() {
        let spec = InvocationSpec::post("/add").with_json_body(json!({
            "userid": 123_123,
            "description": "Bread",
            "category": "food",
            "sum": 5
        }));

        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.body.unwrap()["description"], "Bread");
    }

    #[test]
    fn test_label() {
        let spec = InvocationSpec::post("/add");
        assert_eq!(spec.label(), "POST /add");
    }
}
