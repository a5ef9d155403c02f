//! Test case and step types.
//!
//! A case is a named, ordered sequence of steps. Call steps pair an
//! invocation with an expectation; settle steps bound the wait between
//! a state-mutating call and a dependent read, because the backing
//! service may process writes asynchronously.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::expectation::Expectation;
use crate::invocation::InvocationSpec;

/// One invocation plus the expectation its response must meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStep {
    /// The call to issue.
    pub spec: InvocationSpec,
    /// What a correct response looks like.
    pub expect: Expectation,
}

/// A bounded wait between a write and a dependent read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Settle {
    /// Fixed delay.
    Delay {
        /// How long to wait.
        #[serde(with = "duration_millis")]
        duration: Duration,
    },
    /// Re-invoke until the expectation passes or attempts run out.
    ///
    /// Exhausting the attempt budget resolves to a failed verdict for
    /// the enclosing case, never a hang.
    Poll {
        /// The call to repeat.
        spec: InvocationSpec,
        /// The condition to wait for.
        expect: Expectation,
        /// Pause between attempts.
        #[serde(with = "duration_millis")]
        interval: Duration,
        /// Maximum number of attempts.
        max_attempts: u32,
    },
}

/// One step of a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Invoke and assert.
    Call(CallStep),
    /// Wait for the backend to settle.
    Settle(Settle),
}

/// A named test case: ordered steps plus explicit prerequisites.
///
/// Constructed at registry build time, executed once per run. The
/// verdict is recorded in the run report and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Case name, unique within a registry.
    pub name: String,
    /// Names of earlier cases that must pass before this one runs.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Steps executed in order.
    pub steps: Vec<Step>,
}

impl TestCase {
    /// Creates a new empty case.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Adds a call step (builder pattern).
    #[must_use]
    pub fn with_call(mut self, spec: InvocationSpec, expect: Expectation) -> Self {
        self.steps.push(Step::Call(CallStep { spec, expect }));
        self
    }

    /// Adds a settle step (builder pattern).
    #[must_use]
    pub fn with_settle(mut self, settle: Settle) -> Self {
        self.steps.push(Step::Settle(settle));
        self
    }

    /// Declares a prerequisite case (builder pattern).
    #[must_use]
    pub fn depends_on(mut self, case: impl Into<String>) -> Self {
        self.depends_on.push(case.into());
        self
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
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_builder() {
        let case = TestCase::new("add cost item")
            .with_call(InvocationSpec::post("/add"), Expectation::status(201))
            .with_settle(Settle::Delay {
                duration: Duration::from_secs(2),
            })
            .depends_on("known user lookup");

        assert_eq!(case.name, "add cost item");
        assert_eq!(case.steps.len(), 2);
        assert_eq!(case.depends_on, vec!["known user lookup"]);
        assert!(matches!(case.steps[0], Step::Call(_)));
        assert!(matches!(case.steps[1], Step::Settle(Settle::Delay { .. })));
    }
}
