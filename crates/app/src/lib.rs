//! Sonar contract harness.
//!
//! Glues the harness layers together and defines the built-in contract
//! suite for the cost-manager API.

pub mod suite;

pub use suite::contract_suite;
