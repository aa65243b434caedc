#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]
// JUSTIFICATION: Report counters - overflow is impossible with realistic table sizes
#![allow(clippy::arithmetic_side_effects)]

//! Consumption contract for the table, and a reference model of it.
//!
//! [`NonceSetupTarget`] is the sequence of calls a harness makes per record.
//! [`evaluate`] drives any target through a table and records the outcome
//! of each record in a [`ConformanceReport`]. [`ReferenceModel`] implements
//! just enough of the lifecycle to show a table is self-consistent; it
//! performs no cryptography.

use crate::{
    policy,
    table::TestTable,
    types::{AeadAlgorithm, Direction, KeyType, KeyUsage, OperationState, Status, TestCase},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Calls a harness makes against the API under test.
///
/// Failures are reported as the status the API returned.
pub trait NonceSetupTarget {
    /// Imported key handle.
    type Key;
    /// AEAD operation object.
    type Operation;

    /// Import `material` as a key of `key_type` permitted for `usage` with `algorithm`.
    ///
    /// # Errors
    /// Returns the status reported by the API when the import is refused.
    fn import_key(
        &mut self,
        key_type: KeyType,
        material: &[u8],
        usage: KeyUsage,
        algorithm: AeadAlgorithm,
    ) -> Result<Self::Key, Status>;

    /// Set up an operation for `direction` using `algorithm`.
    ///
    /// # Errors
    /// Returns the status reported by the API when setup is refused.
    fn setup(
        &mut self,
        key: &Self::Key,
        direction: Direction,
        algorithm: AeadAlgorithm,
    ) -> Result<Self::Operation, Status>;

    /// An operation object that was never set up.
    fn inactive_operation(&mut self) -> Self::Operation;

    /// Invoke nonce setup on `operation`.
    fn set_nonce(&mut self, operation: &mut Self::Operation, nonce: &[u8]) -> Status;

    /// Release an operation.
    fn abort(&mut self, operation: Self::Operation);

    /// Release a key.
    fn destroy_key(&mut self, key: Self::Key);
}

/// Outcome of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Record description.
    pub description: String,
    /// Setup algorithm, as displayed.
    pub algorithm: String,
    /// Expected nonce-setup status.
    pub expected: Status,
    /// Observed nonce-setup status, if nonce setup was reached.
    pub observed: Option<Status>,
    /// Whether the record passed.
    pub passed: bool,
    /// Failure detail.
    pub error_message: Option<String>,
    /// Execution time in microseconds.
    pub execution_time_us: u128,
}

/// Results of evaluating a table against a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// Records evaluated.
    pub total: usize,
    /// Records passed.
    pub passed: usize,
    /// Records failed.
    pub failed: usize,
    /// Per-record outcomes, in table order.
    pub results: Vec<CaseOutcome>,
    /// Total execution time in microseconds.
    pub total_time_us: u128,
}

impl ConformanceReport {
    /// Empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome.
    pub fn add_result(&mut self, outcome: CaseOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.total_time_us += outcome.execution_time_us;
        self.results.push(outcome);
    }

    /// Whether every record passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Precision loss acceptable for percentage display
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 { 0.0 } else { (self.passed as f64 / self.total as f64) * 100.0 }
    }

    /// Failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.results.iter().filter(|outcome| !outcome.passed)
    }

    /// `(passed, total)` per setup algorithm.
    #[must_use]
    pub fn by_algorithm(&self) -> BTreeMap<String, (usize, usize)> {
        let mut breakdown: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for outcome in &self.results {
            let entry = breakdown.entry(outcome.algorithm.clone()).or_default();
            if outcome.passed {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
        breakdown
    }

    /// Log the summary and every failure.
    pub fn log_summary(&self) {
        info!(
            "Nonce-setup conformance: {}/{} passed ({:.1}%) in {} us",
            self.passed,
            self.total,
            self.pass_rate(),
            self.total_time_us
        );
        for (algorithm, (passed, total)) in self.by_algorithm() {
            info!("  {:<12} {}/{} passed", algorithm, passed, total);
        }
        for outcome in self.failures() {
            warn!(
                "FAILED {}: {}",
                outcome.description,
                outcome.error_message.as_deref().unwrap_or("no detail")
            );
        }
    }
}

/// Drive `target` through every record of `table`.
///
/// After a successful nonce setup, a second nonce setup on the same
/// operation must report `BadState`.
pub fn evaluate<T: NonceSetupTarget>(table: &TestTable, target: &mut T) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for case in table {
        let start = Instant::now();
        let (observed, failure) = run_case(case, target);
        let elapsed = start.elapsed().as_micros();

        if let Some(ref message) = failure {
            debug!("{}: {}", case.description, message);
        }
        report.add_result(CaseOutcome {
            description: case.description.clone(),
            algorithm: case.setup_algorithm.to_string(),
            expected: case.expected_status,
            observed,
            passed: failure.is_none(),
            error_message: failure,
            execution_time_us: elapsed,
        });
    }
    report
}

fn run_case<T: NonceSetupTarget>(
    case: &TestCase,
    target: &mut T,
) -> (Option<Status>, Option<String>) {
    let Some(direction) = case.direction() else {
        return (None, Some(format!("usage flags {:?} name no single direction", case.usage)));
    };

    let key = match target.import_key(case.key_type, case.key, case.usage, case.algorithm) {
        Ok(key) => key,
        Err(status) => return (None, Some(format!("key import failed with {status}"))),
    };

    let operation = match case.operation_state {
        OperationState::Active => target.setup(&key, direction, case.setup_algorithm),
        OperationState::Inactive => Ok(target.inactive_operation()),
    };
    let mut operation = match operation {
        Ok(operation) => operation,
        Err(status) => {
            target.destroy_key(key);
            let message =
                format!("{direction} setup with {} failed with {status}", case.setup_algorithm);
            return (None, Some(message));
        }
    };

    let observed = target.set_nonce(&mut operation, case.nonce);
    let failure = if observed != case.expected_status {
        Some(format!("expected {}, got {observed}", case.expected_status))
    } else if observed.is_success() {
        let repeated = target.set_nonce(&mut operation, case.nonce);
        (repeated != Status::BadState).then(|| {
            format!("second nonce setup returned {repeated}, expected {}", Status::BadState)
        })
    } else {
        None
    };

    target.abort(operation);
    target.destroy_key(key);
    (Some(observed), failure)
}

/// Key held by the [`ReferenceModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceKey {
    key_type: KeyType,
    usage: KeyUsage,
    algorithm: AeadAlgorithm,
}

/// Operation lifecycle of the [`ReferenceModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOperation {
    /// Never set up, or aborted.
    Inactive,
    /// Set up and awaiting a nonce.
    Active {
        /// Key family of the bound key.
        key_type: KeyType,
        /// Algorithm the operation was set up with.
        algorithm: AeadAlgorithm,
    },
    /// Nonce accepted.
    NonceSet,
    /// A call failed; the operation must be aborted.
    Errored,
}

/// Lifecycle model with the semantics the table encodes.
///
/// - key import accepts AES keys of 16, 24 or 32 bytes;
/// - setup requires the usage flag for the direction and a tag-length variant
///   of the key's algorithm, with a tag length valid for the mode;
/// - nonce setup checks operation state before the nonce length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceModel;

impl ReferenceModel {
    /// New model.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NonceSetupTarget for ReferenceModel {
    type Key = ReferenceKey;
    type Operation = ReferenceOperation;

    fn import_key(
        &mut self,
        key_type: KeyType,
        material: &[u8],
        usage: KeyUsage,
        algorithm: AeadAlgorithm,
    ) -> Result<Self::Key, Status> {
        match (key_type, material.len()) {
            (KeyType::Aes, 16 | 24 | 32) => Ok(ReferenceKey { key_type, usage, algorithm }),
            (KeyType::Aes, _) => Err(Status::InvalidArgument),
        }
    }

    fn setup(
        &mut self,
        key: &Self::Key,
        direction: Direction,
        algorithm: AeadAlgorithm,
    ) -> Result<Self::Operation, Status> {
        if !key.usage.contains(direction.usage()) || !key.algorithm.same_base(&algorithm) {
            return Err(Status::NotPermitted);
        }
        if !policy::is_valid_setup_algorithm(algorithm) {
            return Err(Status::NotSupported);
        }
        Ok(ReferenceOperation::Active { key_type: key.key_type, algorithm })
    }

    fn inactive_operation(&mut self) -> Self::Operation {
        ReferenceOperation::Inactive
    }

    fn set_nonce(&mut self, operation: &mut Self::Operation, nonce: &[u8]) -> Status {
        let ReferenceOperation::Active { key_type, algorithm } = *operation else {
            return Status::BadState;
        };
        let status =
            policy::expected_status(key_type, algorithm, nonce.len(), OperationState::Active);
        *operation = if status.is_success() {
            ReferenceOperation::NonceSet
        } else {
            ReferenceOperation::Errored
        };
        status
    }

    fn abort(&mut self, _operation: Self::Operation) {}

    fn destroy_key(&mut self, _key: Self::Key) {}
}
