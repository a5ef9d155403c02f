//! Run report types.
//!
//! The report is the only mutable state of a run: an append-only list
//! of case records plus derived summary counts. It is created at run
//! start, appended to by the single execution thread, and finalized
//! once by a reporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::invocation::{InvocationResult, InvocationSpec, StatusCode};
use crate::verdict::Verdict;

/// Maximum body snippet length kept in a capture.
const SNIPPET_MAX: usize = 200;

/// Captured request/response detail for one call, kept so a failure is
/// diagnosable without re-running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCapture {
    /// `METHOD /path` of the request.
    pub request: String,
    /// Response status (0 for transport failures).
    pub status: u16,
    /// Truncated response body, or the transport error text.
    pub detail: String,
}

impl CallCapture {
    /// Captures the diagnostic snapshot of one invocation.
    #[must_use]
    pub fn of(spec: &InvocationSpec, result: &InvocationResult) -> Self {
        let detail = result.transport_error.as_ref().map_or_else(
            || truncate(&result.body, SNIPPET_MAX),
            ToString::to_string,
        );

        Self {
            request: spec.label(),
            status: result.status,
            detail,
        }
    }

    /// Renders the `status reason-phrase` part of the capture.
    #[must_use]
    pub fn status_display(&self) -> String {
        if self.status == 0 {
            "no response".to_string()
        } else {
            StatusCode::new(self.status).to_string()
        }
    }
}

/// One finished case: its verdict plus everything captured on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Case name.
    pub case: String,
    /// Final verdict.
    pub verdict: Verdict,
    /// Captured calls, in execution order.
    #[serde(default)]
    pub captures: Vec<CallCapture>,
    /// Case wall-clock time in milliseconds.
    pub duration_ms: u64,
}

/// Summary counts over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total number of cases.
    pub total: usize,
    /// Cases that passed.
    pub passed: usize,
    /// Cases with an unmet expectation.
    pub failed: usize,
    /// Cases with a transport failure.
    pub errored: usize,
    /// Cases skipped because a dependency did not pass.
    pub skipped: usize,
}

impl RunSummary {
    /// Renders the canonical one-line summary.
    #[must_use]
    pub fn line(&self) -> String {
        format!(
            "passed={} failed={} errored={} skipped={}",
            self.passed, self.failed, self.errored, self.skipped
        )
    }

    /// Returns true if every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0 && self.skipped == 0
    }
}

/// The ordered record of one harness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run identifier.
    pub run_id: Uuid,
    /// Target the run was pointed at.
    pub base_url: String,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Finished cases, in execution order.
    pub records: Vec<CaseRecord>,
}

impl RunReport {
    /// Creates an empty report for a run against the given target.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            base_url: base_url.into(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Appends a finished case.
    pub fn record(&mut self, record: CaseRecord) {
        self.records.push(record);
    }

    /// Derives the summary counts from the recorded verdicts.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.records.len(),
            ..RunSummary::default()
        };

        for record in &self.records {
            match record.verdict {
                Verdict::Passed => summary.passed += 1,
                Verdict::Failed { .. } => summary.failed += 1,
                Verdict::Errored { .. } => summary.errored += 1,
                Verdict::Skipped { .. } => summary.skipped += 1,
            }
        }

        summary
    }
}

/// Truncates text at a char boundary, appending an ellipsis when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
