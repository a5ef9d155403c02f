//! Test case registry.
//!
//! An ordered sequence of named cases. The registry does not infer
//! dependencies; it only guarantees deterministic sequential execution
//! in registration order, and validates at build time that declared
//! dependencies point at earlier cases.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::case::TestCase;
use crate::error::{DomainError, DomainResult};

/// An ordered, validated collection of test cases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    cases: Vec<TestCase>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Registers a case after the ones already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken, or if a declared
    /// dependency is not the name of an earlier case. Forward
    /// dependencies are rejected: a consumer must be registered after
    /// its producer.
    pub fn register(&mut self, case: TestCase) -> DomainResult<()> {
        if self.cases.iter().any(|c| c.name == case.name) {
            return Err(DomainError::DuplicateCase(case.name));
        }

        let known: HashSet<&str> = self.cases.iter().map(|c| c.name.as_str()).collect();
        for dependency in &case.depends_on {
            if !known.contains(dependency.as_str()) {
                return Err(DomainError::UnknownDependency {
                    case: case.name.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        self.cases.push(case);
        Ok(())
    }

    /// Registers a case (builder pattern).
    ///
    /// # Errors
    ///
    /// Same as [`Registry::register`].
    pub fn with_case(mut self, case: TestCase) -> DomainResult<Self> {
        self.register(case)?;
        Ok(self)
    }

    /// Returns the cases in execution order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Returns the number of registered cases.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true if no cases are registered.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registration_order_preserved() {
        let registry = Registry::new()
            .with_case(TestCase::new("first"))
            .unwrap()
            .with_case(TestCase::new("second"))
            .unwrap();

        let names: Vec<_> = registry.cases().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = Registry::new();
        registry.register(TestCase::new("about")).unwrap();

        let err = registry.register(TestCase::new("about")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateCase("about".to_string()));
    }

    #[test]
    fn test_dependency_must_be_registered_earlier() {
        let mut registry = Registry::new();
        registry.register(TestCase::new("add cost")).unwrap();

        registry
            .register(TestCase::new("report reflects cost").depends_on("add cost"))
            .unwrap();

        let err = registry
            .register(TestCase::new("orphan").depends_on("never registered"))
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownDependency { .. }));
    }

    #[test]
    fn test_forward_dependency_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register(TestCase::new("reader").depends_on("writer"))
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::UnknownDependency {
                case: "reader".to_string(),
                dependency: "writer".to_string(),
            }
        );
    }
}
