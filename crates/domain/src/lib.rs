//! Sonar Domain - Core harness types
//!
//! This crate defines the domain model for the Sonar contract harness.
//! All types here are pure Rust with no I/O dependencies.

pub mod case;
pub mod error;
pub mod expectation;
pub mod invocation;
pub mod registry;
pub mod report;
pub mod verdict;

pub use case::{CallStep, Settle, Step, TestCase};
pub use error::{DomainError, DomainResult};
pub use expectation::{lookup_path, BodyPredicate, Expectation, StatusExpectation};
pub use invocation::{
    HttpMethod, InvocationResult, InvocationSpec, QueryParam, QueryParams, StatusCode,
    TransportError, TransportErrorKind,
};
pub use registry::Registry;
pub use report::{CallCapture, CaseRecord, RunReport, RunSummary};
pub use verdict::Verdict;
