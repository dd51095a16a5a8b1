//! # Smoke Cases & Results
//!
//! The cases run against a BPM instance, the suite assembler that picks them,
//! and the runner that executes them serially and reports pass / fail / error
//! the way a unittest text runner does.

pub mod cases;
pub mod runner;
pub mod suite;

use std::time::Duration;

use thiserror::Error;

use crate::error::SmokeError;

/// Why a case did not pass.
#[derive(Debug, Error)]
pub enum CaseFailure {
    /// The response did not meet an expectation.
    #[error("{0}")]
    Assertion(String),

    /// The case could not be evaluated (network failure, malformed body).
    #[error(transparent)]
    Error(#[from] SmokeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Errored(String),
}

impl From<Result<(), CaseFailure>> for Outcome {
    fn from(result: Result<(), CaseFailure>) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(CaseFailure::Assertion(message)) => Outcome::Failed(message),
            Err(CaseFailure::Error(err)) => Outcome::Errored(err.to_string()),
        }
    }
}

/// Result of running one case.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: &'static str,
    pub description: &'static str,
    pub outcome: Outcome,
    pub duration: Duration,
}

/// Summary report for a run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub duration: Duration,
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        match result.outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::Errored(_) => self.errored += 1,
        }
        self.results.push(result);
    }

    pub fn was_successful(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}
