//! Assertion engine.
//!
//! Evaluates a declarative [`Expectation`] against an
//! [`InvocationResult`] and produces a verdict with an attributable
//! message. Pure logic, no network access.

use regex::Regex;

use sonar_domain::{lookup_path, BodyPredicate, Expectation, InvocationResult};

/// Outcome of evaluating one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the expectation held.
    pub passed: bool,
    /// Failure message when it did not.
    pub failure: Option<String>,
}

impl Evaluation {
    /// Creates a passing evaluation.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            failure: None,
        }
    }

    /// Creates a failing evaluation.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            failure: Some(message.into()),
        }
    }
}

/// Evaluates expectations against invocation results.
///
/// Status is checked first. Body predicates run only when the status
/// check passed; they AND-compose and the first failing predicate
/// short-circuits, keeping diagnostics minimal and attributable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Creates a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates an expectation against a result.
    #[must_use]
    pub fn evaluate(&self, result: &InvocationResult, expect: &Expectation) -> Evaluation {
        if !expect.status.matches(result.status) {
            return Evaluation::fail(format!(
                "expected status in {}, got {}",
                expect.status.description(),
                result.status
            ));
        }

        for predicate in &expect.body {
            let evaluation = self.check_predicate(result, predicate);
            if !evaluation.passed {
                return evaluation;
            }
        }

        Evaluation::pass()
    }

    fn check_predicate(&self, result: &InvocationResult, predicate: &BodyPredicate) -> Evaluation {
        // TextMatches reads the raw text; everything else needs the
        // parsed body, and an undecodable body fails the predicate
        // rather than crashing the run.
        if let BodyPredicate::TextMatches { pattern } = predicate {
            return match Regex::new(pattern) {
                Ok(regex) => {
                    if regex.is_match(&result.body) {
                        Evaluation::pass()
                    } else {
                        Evaluation::fail(format!("{}: no match", predicate.description()))
                    }
                }
                Err(e) => Evaluation::fail(format!("invalid pattern '{pattern}': {e}")),
            };
        }

        let Some(json) = result.json.as_ref() else {
            return Evaluation::fail("body not decodable, predicate unevaluated");
        };

        match predicate {
            BodyPredicate::IsArray => {
                if json.is_array() {
                    Evaluation::pass()
                } else {
                    Evaluation::fail(format!(
                        "{}: body is {}",
                        predicate.description(),
                        json_type_name(json)
                    ))
                }
            }

            BodyPredicate::FieldPresent { path } => {
                if lookup_path(json, path).is_some() {
                    Evaluation::pass()
                } else {
                    Evaluation::fail(format!("{}: path not found", predicate.description()))
                }
            }

            BodyPredicate::FieldEquals { path, expected } => match lookup_path(json, path) {
                Some(actual) if actual == expected => Evaluation::pass(),
                Some(actual) => Evaluation::fail(format!(
                    "{}: got {actual}",
                    predicate.description()
                )),
                None => Evaluation::fail(format!("{}: path not found", predicate.description())),
            },

            BodyPredicate::ContainsItem {
                path,
                field,
                expected,
            } => self.check_contains_item(json, predicate, path, field, expected),

            // Handled before the decode gate above.
            BodyPredicate::TextMatches { .. } => Evaluation::pass(),
        }
    }

    fn check_contains_item(
        &self,
        json: &serde_json::Value,
        predicate: &BodyPredicate,
        path: &str,
        field: &str,
        expected: &serde_json::Value,
    ) -> Evaluation {
        let Some(target) = lookup_path(json, path) else {
            return Evaluation::fail(format!("{}: path not found", predicate.description()));
        };

        let matches = |items: &[serde_json::Value]| {
            items
                .iter()
                .any(|item| item.get(field).is_some_and(|v| v == expected))
        };

        let found = match target {
            serde_json::Value::Array(items) => matches(items),
            serde_json::Value::Object(map) => map
                .values()
                .filter_map(serde_json::Value::as_array)
                .any(|items| matches(items)),
            _ => {
                return Evaluation::fail(format!(
                    "{}: path is {}",
                    predicate.description(),
                    json_type_name(target)
                ));
            }
        };

        if found {
            Evaluation::pass()
        } else {
            Evaluation::fail(format!("{}: no such item", predicate.description()))
        }
    }
}

const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    use sonar_domain::StatusExpectation;

    fn response(status: u16, body: &str) -> InvocationResult {
        InvocationResult::from_response(status, body, Duration::from_millis(5))
    }

    #[test]
    fn test_status_pass_and_fail_message() {
        let evaluator = Evaluator::new();
        let result = response(400, "{}");

        let ok = evaluator.evaluate(&result, &Expectation::status(400));
        assert!(ok.passed);

        let failed = evaluator.evaluate(&result, &Expectation::status(201));
        assert!(!failed.passed);
        assert_eq!(
            failed.failure.unwrap(),
            "expected status in {201}, got 400"
        );
    }

    #[test]
    fn test_status_one_of() {
        let evaluator = Evaluator::new();
        let expect = Expectation::status_one_of([200, 404]);

        assert!(evaluator.evaluate(&response(404, "{}"), &expect).passed);
        assert!(evaluator.evaluate(&response(200, "{}"), &expect).passed);

        let failed = evaluator.evaluate(&response(400, "{}"), &expect);
        assert_eq!(
            failed.failure.unwrap(),
            "expected status in {200, 404}, got 400"
        );
    }

    #[test]
    fn test_undecodable_body_with_predicate_fails() {
        let evaluator = Evaluator::new();
        let result = response(200, "<html>oops</html>");
        let expect = Expectation::status(200).with_predicate(BodyPredicate::IsArray);

        let evaluation = evaluator.evaluate(&result, &expect);
        assert!(!evaluation.passed);
        assert_eq!(
            evaluation.failure.unwrap(),
            "body not decodable, predicate unevaluated"
        );
    }

    #[test]
    fn test_undecodable_body_without_predicate_is_ignored() {
        let evaluator = Evaluator::new();
        let result = response(200, "<html>oops</html>");

        assert!(evaluator.evaluate(&result, &Expectation::status(200)).passed);
    }

    #[test]
    fn test_is_array_predicate() {
        let evaluator = Evaluator::new();
        let expect = Expectation::status(200).with_predicate(BodyPredicate::IsArray);

        assert!(
            evaluator
                .evaluate(&response(200, r#"[{"first_name": "Shoval"}]"#), &expect)
                .passed
        );

        let failed = evaluator.evaluate(&response(200, r#"{"a": 1}"#), &expect);
        assert_eq!(
            failed.failure.unwrap(),
            "body is an array: body is an object"
        );
    }

    #[test]
    fn test_field_present_predicate() {
        let evaluator = Evaluator::new();
        let expect = Expectation::status(200).with_predicate(BodyPredicate::FieldPresent {
            path: "total".to_string(),
        });

        assert!(
            evaluator
                .evaluate(&response(200, r#"{"id": "123123", "total": 17}"#), &expect)
                .passed
        );
        assert!(
            !evaluator
                .evaluate(&response(200, r#"{"id": "123123"}"#), &expect)
                .passed
        );
    }

    #[test]
    fn test_contains_item_in_array() {
        let evaluator = Evaluator::new();
        let body = r#"{"costs": {"food": [{"sum": 5, "description": "Bread"}], "sport": []}}"#;
        let expect = Expectation::status(200).with_predicate(BodyPredicate::ContainsItem {
            path: "costs.food".to_string(),
            field: "description".to_string(),
            expected: json!("Bread"),
        });

        assert!(evaluator.evaluate(&response(200, body), &expect).passed);
    }

    #[test]
    fn test_contains_item_scans_map_of_arrays() {
        let evaluator = Evaluator::new();
        let body = r#"{"costs": {"food": [], "health": [{"description": "Aspirin", "sum": 3}]}}"#;
        let expect = Expectation::status(200).with_predicate(BodyPredicate::ContainsItem {
            path: "costs".to_string(),
            field: "description".to_string(),
            expected: json!("Aspirin"),
        });

        assert!(evaluator.evaluate(&response(200, body), &expect).passed);
    }

    #[test]
    fn test_contains_item_missing() {
        let evaluator = Evaluator::new();
        let body = r#"{"costs": {"food": []}}"#;
        let expect = Expectation::status(200).with_predicate(BodyPredicate::ContainsItem {
            path: "costs.food".to_string(),
            field: "description".to_string(),
            expected: json!("Bread"),
        });

        let evaluation = evaluator.evaluate(&response(200, body), &expect);
        assert!(!evaluation.passed);
        assert!(evaluation.failure.unwrap().ends_with("no such item"));
    }

    #[test]
    fn test_text_matches() {
        let evaluator = Evaluator::new();
        let expect = Expectation::status(200).with_predicate(BodyPredicate::TextMatches {
            pattern: r#""total"\s*:\s*\d+"#.to_string(),
        });

        assert!(
            evaluator
                .evaluate(&response(200, r#"{"total": 42}"#), &expect)
                .passed
        );
    }

    #[test]
    fn test_text_matches_works_without_decoded_body() {
        let evaluator = Evaluator::new();
        let expect = Expectation::status(200).with_predicate(BodyPredicate::TextMatches {
            pattern: "Server error".to_string(),
        });

        let result = response(200, "<html>Server error</html>");
        assert!(result.decode_failed());
        assert!(evaluator.evaluate(&result, &expect).passed);
    }

    #[test]
    fn test_predicates_short_circuit_on_first_failure() {
        let evaluator = Evaluator::new();
        let expect = Expectation {
            status: StatusExpectation::Exact(200),
            body: vec![
                BodyPredicate::FieldPresent {
                    path: "missing".to_string(),
                },
                BodyPredicate::IsArray,
            ],
        };

        let evaluation = evaluator.evaluate(&response(200, r#"{"a": 1}"#), &expect);
        // The first failing predicate is the one reported.
        assert!(evaluation.failure.unwrap().contains("field 'missing'"));
    }
}
