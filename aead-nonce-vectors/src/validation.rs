#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Self-consistency checks over a [`TestTable`].
//!
//! All violations are collected before reporting, so one run shows every
//! problem in a hand-edited or externally supplied table.

use crate::{
    error::{Result, VectorError},
    fixtures::{self, AES_16B_KEY_SIZE},
    policy,
    table::TestTable,
    types::{AeadMode, Direction, KeyType, OperationState, Status, TestCase},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Longest description that fits a 75-byte report buffer with a trailing
/// newline and terminator.
pub const MAX_DESCRIPTION_LEN: usize = 73;

/// Summary of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Records checked.
    pub records: usize,
    /// Direction and mode blocks found.
    pub blocks: usize,
    /// Records per expected status.
    pub by_status: BTreeMap<String, usize>,
}

/// Validate every record and every block of `table`.
///
/// # Errors
/// Returns `VectorError::ValidationFailed` listing every violation found.
pub fn validate_table(table: &TestTable) -> Result<ValidationReport> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for case in table {
        check_record(case, &mut violations);
        if !seen.insert(case.description.as_str()) {
            violations.push(format!("{}: duplicate description", case.description));
        }
    }

    let blocks = group_blocks(table, &mut violations);
    for (key, cases) in &blocks {
        check_block(*key, cases, &mut violations);
    }

    if !violations.is_empty() {
        for violation in &violations {
            warn!("Table violation: {}", violation);
        }
        return Err(VectorError::ValidationFailed(violations));
    }

    let mut by_status = BTreeMap::new();
    for case in table {
        *by_status.entry(case.expected_status.to_string()).or_insert(0) += 1;
    }

    debug!("Validated {} record(s) in {} block(s)", table.len(), blocks.len());
    Ok(ValidationReport { records: table.len(), blocks: blocks.len(), by_status })
}

/// Per-record checks.
fn check_record(case: &TestCase, violations: &mut Vec<String>) {
    let name = &case.description;

    if name.trim().is_empty() {
        violations.push("record with empty description".to_string());
    }
    if name.len() > MAX_DESCRIPTION_LEN {
        violations.push(format!(
            "{name}: description is {} bytes, limit is {MAX_DESCRIPTION_LEN}",
            name.len()
        ));
    }

    if !fixtures::is_prefix_of(case.key, &fixtures::KEY_DATA) {
        violations.push(format!("{name}: key does not come from the shared key buffer"));
    }
    if !fixtures::is_prefix_of(case.nonce, &fixtures::NONCE) {
        violations.push(format!("{name}: nonce does not come from the shared nonce buffer"));
    }
    if case.key_type == KeyType::Aes && case.key_length() != AES_16B_KEY_SIZE {
        violations.push(format!(
            "{name}: AES key is {} bytes, expected {AES_16B_KEY_SIZE}",
            case.key_length()
        ));
    }

    if case.direction().is_none() {
        violations.push(format!(
            "{name}: usage flags {:?} must be exactly one of ENCRYPT or DECRYPT",
            case.usage
        ));
    }

    if !case.setup_algorithm.same_base(&case.algorithm) {
        violations.push(format!(
            "{name}: setup algorithm {} is not a tag-length variant of {}",
            case.setup_algorithm, case.algorithm
        ));
    }
    // Setup rejects the algorithm before nonce setup runs
    if case.operation_state == OperationState::Active
        && !policy::is_valid_setup_algorithm(case.setup_algorithm)
    {
        violations.push(format!(
            "{name}: setup algorithm {} is rejected at setup, nonce setup is unreachable",
            case.setup_algorithm
        ));
    }

    let derived = policy::expected_status(
        case.key_type,
        case.setup_algorithm,
        case.nonce_length(),
        case.operation_state,
    );
    if derived != case.expected_status {
        violations.push(format!(
            "{name}: expects {} but nonce policy yields {derived}",
            case.expected_status
        ));
    }
}

type BlockKey = (Direction, AeadMode);

fn group_blocks<'a>(
    table: &'a TestTable,
    violations: &mut Vec<String>,
) -> BTreeMap<BlockKey, Vec<&'a TestCase>> {
    let mut blocks: BTreeMap<BlockKey, Vec<&TestCase>> = BTreeMap::new();
    for case in table {
        // Records without a direction are already reported by check_record
        if let Some(direction) = case.direction() {
            blocks.entry((direction, case.algorithm.mode())).or_default().push(case);
        }
    }
    if blocks.is_empty() && !table.is_empty() {
        violations.push("no record has a usable direction".to_string());
    }
    blocks
}

fn is_baseline(case: &TestCase) -> bool {
    case.operation_state == OperationState::Active
        && case.setup_algorithm == case.algorithm
        && case.expected_status == Status::Success
}

/// Block checks: a baseline exists, every other record moves one axis at
/// most, and tag-length variants keep the baseline outcome.
fn check_block((direction, mode): BlockKey, cases: &[&TestCase], violations: &mut Vec<String>) {
    let Some(baseline) = cases.iter().copied().find(|case| is_baseline(case)) else {
        violations.push(format!("{direction} {mode}: block has no baseline record"));
        return;
    };

    for case in cases.iter().copied().filter(|case| !std::ptr::eq(*case, baseline)) {
        let tag_moved = case.setup_algorithm != baseline.setup_algorithm;
        let nonce_moved = case.nonce_length() != baseline.nonce_length();
        let state_moved = case.operation_state != baseline.operation_state;
        let key_moved = case.key != baseline.key || case.key_type != baseline.key_type;

        let axes = [tag_moved, nonce_moved, state_moved, key_moved].iter().filter(|m| **m).count();
        if axes > 1 {
            violations.push(format!(
                "{}: varies {axes} axes from baseline '{}'",
                case.description, baseline.description
            ));
        }

        if tag_moved
            && axes == 1
            && policy::is_valid_setup_algorithm(case.setup_algorithm)
            && case.expected_status != baseline.expected_status
        {
            violations.push(format!(
                "{}: tag-length variant expects {} but baseline expects {}",
                case.description, case.expected_status, baseline.expected_status
            ));
        }
    }
}
