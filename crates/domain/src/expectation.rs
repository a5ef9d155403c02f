//! Declarative response expectations.
//!
//! An expectation describes what a correct response looks like: an
//! acceptable status set plus zero or more predicates over the parsed
//! body. Expectations are data only; evaluation lives in the
//! application layer so the logic is unit-testable without network
//! access.

use serde::{Deserialize, Serialize};

/// Expected status code value, set, or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// One of multiple status codes.
    OneOf(Vec<u16>),
    /// Range of status codes (inclusive).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::OneOf(codes) => codes.contains(&status),
            Self::Range { min, max } => status >= *min && status <= *max,
        }
    }

    /// Get a description of the acceptable set, e.g. `{201}` or `{200, 404}`.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("{{{code}}}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("{{{}}}", codes_str.join(", "))
            }
            Self::Range { min, max } => format!("{{{min}..{max}}}"),
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// A declarative predicate over the parsed response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyPredicate {
    /// Body is a JSON array.
    IsArray,
    /// A dot-path resolves to some value.
    FieldPresent {
        /// Dot-path into the body, e.g. `total` or `costs.food`.
        path: String,
    },
    /// A dot-path resolves to exactly the given value.
    FieldEquals {
        /// Dot-path into the body.
        path: String,
        /// Expected value (as JSON).
        expected: serde_json::Value,
    },
    /// Some element under a dot-path has a field equal to the given value.
    ///
    /// The path may resolve to an array, or to an object whose values
    /// are arrays; in the latter case every array is scanned in turn.
    ContainsItem {
        /// Dot-path to the array (or map of arrays).
        path: String,
        /// Field looked up on each element.
        field: String,
        /// Expected field value.
        expected: serde_json::Value,
    },
    /// Raw body text matches a regex pattern.
    TextMatches {
        /// Regex pattern.
        pattern: String,
    },
}

impl BodyPredicate {
    /// Get a human-readable description of this predicate.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::IsArray => "body is an array".to_string(),
            Self::FieldPresent { path } => format!("field '{path}' present"),
            Self::FieldEquals { path, expected } => format!("field '{path}' equals {expected}"),
            Self::ContainsItem {
                path,
                field,
                expected,
            } => format!("some item under '{path}' has {field} == {expected}"),
            Self::TextMatches { pattern } => format!("body matches /{pattern}/"),
        }
    }
}

/// A declarative description of a correct response.
///
/// Status is checked first; body predicates apply only when the status
/// check passed, combine with logical AND, and short-circuit on the
/// first failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expectation {
    /// Acceptable status codes.
    pub status: StatusExpectation,
    /// Predicates over the parsed body, evaluated in order.
    #[serde(default)]
    pub body: Vec<BodyPredicate>,
}

impl Expectation {
    /// Expect an exact status code.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self {
            status: StatusExpectation::Exact(code),
            body: Vec::new(),
        }
    }

    /// Expect one of several status codes.
    #[must_use]
    pub fn status_one_of(codes: impl Into<Vec<u16>>) -> Self {
        Self {
            status: StatusExpectation::OneOf(codes.into()),
            body: Vec::new(),
        }
    }

    /// Add a body predicate (builder pattern).
    #[must_use]
    pub fn with_predicate(mut self, predicate: BodyPredicate) -> Self {
        self.body.push(predicate);
        self
    }

    /// Returns true if any body predicate is declared.
    #[must_use]
    pub fn requires_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// Walks a dot-path into a JSON value.
///
/// Segments are object keys, or array indices when the current value is
/// an array and the segment parses as a number: `costs.food.0.sum`.
/// Returns `None` as soon as a segment does not resolve.
#[must_use]
pub fn lookup_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            serde_json::Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            serde_json::Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(201);
        assert!(exp.matches(201));
        assert!(!exp.matches(200));
        assert_eq!(exp.description(), "{201}");
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 404]);
        assert!(exp.matches(200));
        assert!(exp.matches(404));
        assert!(!exp.matches(400));
        assert_eq!(exp.description(), "{200, 404}");
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert_eq!(exp.description(), "{200..299}");
    }

    #[test]
    fn test_lookup_path_object() {
        let body = json!({"costs": {"food": [{"sum": 5}]}});

        assert_eq!(lookup_path(&body, "costs.food.0.sum"), Some(&json!(5)));
        assert_eq!(lookup_path(&body, "costs.food"), Some(&json!([{"sum": 5}])));
        assert_eq!(lookup_path(&body, "costs.sport"), None);
        assert_eq!(lookup_path(&body, "costs.food.7"), None);
    }

    #[test]
    fn test_lookup_path_through_scalar_fails() {
        let body = json!({"total": 42});
        assert_eq!(lookup_path(&body, "total"), Some(&json!(42)));
        assert_eq!(lookup_path(&body, "total.sub"), None);
    }

    #[test]
    fn test_expectation_builder() {
        let exp = Expectation::status(200)
            .with_predicate(BodyPredicate::IsArray)
            .with_predicate(BodyPredicate::FieldPresent {
                path: "total".to_string(),
            });

        assert!(exp.requires_body());
        assert_eq!(exp.body.len(), 2);
    }

    #[test]
    fn test_predicate_descriptions() {
        let predicate = BodyPredicate::ContainsItem {
            path: "costs.food".to_string(),
            field: "description".to_string(),
            expected: json!("Bread"),
        };
        assert_eq!(
            predicate.description(),
            "some item under 'costs.food' has description == \"Bread\""
        );
    }
}
