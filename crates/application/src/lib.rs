//! Sonar Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The endpoint invoker, assertion engine, and case runner
//!
//! The layer is deliberately infallible: the invoker folds every
//! failure into the invocation result, and the runner folds unmet
//! expectations into verdicts, so a run always produces a full report.

pub mod evaluator;
pub mod invoker;
pub mod ports;
pub mod runner;

pub use evaluator::{Evaluation, Evaluator};
pub use invoker::Invoker;
pub use ports::{RawResponse, Transport};
pub use runner::{Runner, RunnerOptions};
