//! Text report renderer.
//!
//! Renders a finished run into a flat text artifact. The output sink is
//! injected at construction instead of swapping process-wide streams,
//! so a failing run can never leak a redirected stdout.

use std::io::Write;

use thiserror::Error;

use sonar_domain::{CaseRecord, RunReport};

/// Errors from rendering or persisting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the sink failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders run reports into an injected writable sink.
///
/// The sink can be a file, an in-memory buffer, or any other
/// `std::io::Write` implementation.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    /// Creates a reporter writing to the given sink.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Renders the full report and flushes the sink.
    ///
    /// The artifact preserves per-case diagnostics (request, status,
    /// body snippet) so a failure is diagnosable without re-running.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a write.
    pub fn finalize(&mut self, report: &RunReport) -> Result<(), ReportError> {
        writeln!(self.out, "sonar run {}", report.run_id)?;
        writeln!(self.out, "target:  {}", report.base_url)?;
        writeln!(
            self.out,
            "started: {}",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.out)?;

        for record in &report.records {
            self.write_case(record)?;
        }

        writeln!(self.out, "{}", report.summary().line())?;
        self.out.flush()?;
        Ok(())
    }

    fn write_case(&mut self, record: &CaseRecord) -> Result<(), ReportError> {
        writeln!(
            self.out,
            "[{}] {} ({} ms)",
            record.verdict.label(),
            record.case,
            record.duration_ms
        )?;

        if let Some(reason) = record.verdict.reason() {
            writeln!(self.out, "    reason: {reason}")?;
        }

        for capture in &record.captures {
            writeln!(
                self.out,
                "    {} -> {}",
                capture.request,
                capture.status_display()
            )?;
            if !capture.detail.is_empty() {
                writeln!(self.out, "        {}", capture.detail)?;
            }
        }

        writeln!(self.out)?;
        Ok(())
    }

    /// Consumes the reporter and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
