//! Case runner.
//!
//! Executes a registry in order on a single logical thread. Later cases
//! observe the side effects of earlier ones through the shared remote
//! service, so cases never run concurrently. A failing or erroring case
//! never aborts the run; only its declared dependents are skipped.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use sonar_domain::{
    CallCapture, CaseRecord, Expectation, InvocationSpec, Registry, RunReport, Settle, Step,
    TestCase, Verdict,
};

use crate::evaluator::Evaluator;
use crate::invoker::Invoker;
use crate::ports::Transport;

/// Options controlling a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerOptions {
    /// Stop executing after the first case that does not pass.
    ///
    /// Remaining cases are still recorded (as skipped), so every case
    /// keeps its one-verdict-per-run guarantee.
    pub fail_fast: bool,
}

/// Executes test cases sequentially and records verdicts.
pub struct Runner<T: Transport> {
    invoker: Invoker<T>,
    evaluator: Evaluator,
    options: RunnerOptions,
}

impl<T: Transport> Runner<T> {
    /// Creates a runner with default options.
    pub fn new(invoker: Invoker<T>) -> Self {
        Self {
            invoker,
            evaluator: Evaluator::new(),
            options: RunnerOptions::default(),
        }
    }

    /// Sets the run options (builder pattern).
    #[must_use]
    pub const fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every case in the registry and returns the finished report.
    pub async fn run(&self, registry: &Registry) -> RunReport {
        let mut report = RunReport::new(self.invoker.base_url().as_str());
        // Names of cases that did not pass; dependents of these skip.
        let mut not_passed: HashSet<String> = HashSet::new();
        let mut aborted = false;

        for case in registry.cases() {
            let record = if aborted {
                CaseRecord {
                    case: case.name.clone(),
                    verdict: Verdict::skipped("run aborted (fail-fast)"),
                    captures: Vec::new(),
                    duration_ms: 0,
                }
            } else if let Some(dependency) = case
                .depends_on
                .iter()
                .find(|d| not_passed.contains(d.as_str()))
            {
                CaseRecord {
                    case: case.name.clone(),
                    verdict: Verdict::skipped(format!("dependency '{dependency}' did not pass")),
                    captures: Vec::new(),
                    duration_ms: 0,
                }
            } else {
                self.run_case(case).await
            };

            tracing::info!(case = %record.case, verdict = %record.verdict, "case finished");

            if !record.verdict.is_passed() {
                not_passed.insert(record.case.clone());
                if self.options.fail_fast && !aborted {
                    aborted = true;
                }
            }

            report.record(record);
        }

        report
    }

    /// Executes one case's steps in order.
    async fn run_case(&self, case: &TestCase) -> CaseRecord {
        let start = Instant::now();
        let mut captures = Vec::new();
        let mut verdict = Verdict::Passed;

        for step in &case.steps {
            match step {
                Step::Call(call) => {
                    let result = self.invoker.invoke(&call.spec).await;
                    captures.push(CallCapture::of(&call.spec, &result));

                    if let Some(error) = &result.transport_error {
                        verdict = Verdict::errored(format!("{}: {error}", call.spec.label()));
                        break;
                    }

                    let evaluation = self.evaluator.evaluate(&result, &call.expect);
                    if !evaluation.passed {
                        let reason = evaluation
                            .failure
                            .unwrap_or_else(|| "expectation not met".to_string());
                        verdict = Verdict::failed(format!("{}: {reason}", call.spec.label()));
                        break;
                    }
                }

                Step::Settle(Settle::Delay { duration }) => {
                    tracing::debug!(case = %case.name, ?duration, "settling");
                    tokio::time::sleep(*duration).await;
                }

                Step::Settle(Settle::Poll {
                    spec,
                    expect,
                    interval,
                    max_attempts,
                }) => {
                    if let Some(failed) = self
                        .poll(case, spec, expect, *interval, *max_attempts, &mut captures)
                        .await
                    {
                        verdict = failed;
                        break;
                    }
                }
            }
        }

        CaseRecord {
            case: case.name.clone(),
            verdict,
            captures,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Re-invokes `spec` until `expect` passes or attempts run out.
    ///
    /// Returns `None` when the condition was met, or the failed verdict
    /// when the attempt budget is exhausted. Transport errors count as
    /// failed attempts: a lagging write and a momentary connection blip
    /// are indistinguishable from the client side, and the budget bounds
    /// the wait either way.
    async fn poll(
        &self,
        case: &TestCase,
        spec: &InvocationSpec,
        expect: &Expectation,
        interval: Duration,
        max_attempts: u32,
        captures: &mut Vec<CallCapture>,
    ) -> Option<Verdict> {
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            let result = self.invoker.invoke(spec).await;

            let outcome = if let Some(error) = &result.transport_error {
                Some(error.to_string())
            } else {
                let evaluation = self.evaluator.evaluate(&result, expect);
                (!evaluation.passed)
                    .then(|| evaluation.failure.unwrap_or_else(|| "not met".to_string()))
            };

            match outcome {
                None => {
                    // Keep the satisfying response for diagnosis.
                    captures.push(CallCapture::of(spec, &result));
                    return None;
                }
                Some(failure) => {
                    tracing::debug!(
                        case = %case.name,
                        attempt,
                        max_attempts,
                        failure = %failure,
                        "poll condition not met"
                    );
                    last_failure = failure;
                    if attempt < max_attempts {
                        tokio::time::sleep(interval).await;
                    } else {
                        captures.push(CallCapture::of(spec, &result));
                    }
                }
            }
        }

        Some(Verdict::failed(format!(
            "{}: condition not met within {max_attempts} attempts: {last_failure}",
            spec.label()
        )))
    }
}
