//! Case verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The outcome of one test case.
///
/// Every case produces exactly one verdict per run. A transport-level
/// failure during invocation is an `Errored` verdict; it never aborts
/// the remaining cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Every step met its expectation.
    Passed,
    /// An expectation was not met.
    Failed {
        /// What went wrong, with expected-vs-actual detail.
        reason: String,
    },
    /// A transport failure prevented a response from being captured.
    Errored {
        /// The transport error, with its kind.
        reason: String,
    },
    /// A prerequisite case did not pass.
    Skipped {
        /// Which dependency kept this case from running.
        reason: String,
    },
}

impl Verdict {
    /// Creates a failed verdict.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Creates an errored verdict.
    #[must_use]
    pub fn errored(reason: impl Into<String>) -> Self {
        Self::Errored {
            reason: reason.into(),
        }
    }

    /// Creates a skipped verdict.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns true if the case passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the lowercase label used in reports and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed { .. } => "failed",
            Self::Errored { .. } => "errored",
            Self::Skipped { .. } => "skipped",
        }
    }

    /// Returns the reason text, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed { reason } | Self::Errored { reason } | Self::Skipped { reason } => {
                Some(reason)
            }
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.label(), reason),
            None => write!(f, "{}", self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels() {
        assert_eq!(Verdict::Passed.label(), "passed");
        assert_eq!(Verdict::failed("status mismatch").label(), "failed");
        assert_eq!(Verdict::errored("timeout").label(), "errored");
        assert_eq!(Verdict::skipped("dependency failed").label(), "skipped");
    }

    #[test]
    fn test_display_includes_reason() {
        assert_eq!(Verdict::Passed.to_string(), "passed");
        assert_eq!(
            Verdict::failed("expected status {201}, got 400").to_string(),
            "failed: expected status {201}, got 400"
        );
    }

    #[test]
    fn test_is_passed() {
        assert!(Verdict::Passed.is_passed());
        assert!(!Verdict::failed("x").is_passed());
        assert!(!Verdict::skipped("x").is_passed());
    }
}
