//! Report rendering.

mod text;

pub use text::{ReportError, TextReporter};
