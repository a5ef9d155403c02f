//! Sonar Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: the reqwest-backed transport and the text
//! report renderer.

pub mod adapters;
pub mod report;

pub use adapters::ReqwestTransport;
pub use report::{ReportError, TextReporter};
