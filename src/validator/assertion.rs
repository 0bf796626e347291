//! Isolated pass/fail assertion units.
use log::*;
use serde::Serialize;
use std::fmt::Display;

/// Result of a single named assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub outcome: Outcome,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Ordered collection of assertion results for one response.
///
/// Each call to [`TestRun::test`] runs in isolation: a failing assertion is
/// recorded and later assertions still execute.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TestRun {
    prefix: String,
    results: Vec<TestResult>,
}

impl TestRun {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            results: vec![],
        }
    }

    /// Run a named assertion and record its outcome.
    pub fn test<F>(&mut self, name: &str, check: F)
    where
        F: FnOnce() -> std::result::Result<(), String>,
    {
        let name = format!("{}{name}", self.prefix);

        let outcome = match check() {
            Ok(()) => {
                debug!("PASS: {name}");
                Outcome::Passed
            }
            Err(reason) => {
                debug!("FAIL: {name}: {reason}");
                Outcome::Failed(reason)
            }
        };

        self.results.push(TestResult { name, outcome });
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn find(&self, name: &str) -> Option<&TestResult> {
        let full = format!("{}{name}", self.prefix);
        self.results.iter().find(|r| r.name == full)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Log every result followed by a summary line.
    pub fn report(&self) {
        for result in self.results.iter() {
            match &result.outcome {
                Outcome::Passed => info!("✓ {}", result.name),
                Outcome::Failed(reason) => {
                    error!("✗ {}: {reason}", result.name)
                }
            }
        }

        info!(
            "{} assertions: {} passed, {} failed",
            self.results.len(),
            self.passed_count(),
            self.failed_count()
        );
    }
}

/// Assert two values are equal.
pub fn expect_eql<A, E>(
    actual: A,
    expected: E,
) -> std::result::Result<(), String>
where
    A: PartialEq<E> + Display,
    E: Display,
{
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected '{actual}' to deeply equal '{expected}'"))
    }
}

/// Assert a condition holds.
pub fn expect_true(
    condition: bool,
    message: impl Into<String>,
) -> std::result::Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message.into())
    }
}
