#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! The read-only test case table.

use crate::{
    builder::TableBuilder,
    error::Result,
    types::{AeadMode, Direction, Status, TestCase},
};
use std::sync::OnceLock;

static COMPILED_TABLE: OnceLock<TestTable> = OnceLock::new();

/// Ordered, immutable sequence of test cases.
///
/// Iteration borrows the table, so it can be restarted any number of times
/// and shared between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestTable {
    cases: Vec<TestCase>,
}

impl TestTable {
    /// Table over `cases`, in the given order.
    #[must_use]
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// Records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TestCase] {
        &self.cases
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Record with the given description.
    #[must_use]
    pub fn find(&self, description: &str) -> Option<&TestCase> {
        self.cases.iter().find(|case| case.description == description)
    }

    /// Records for one direction and mode, in table order.
    pub fn block(&self, direction: Direction, mode: AeadMode) -> impl Iterator<Item = &TestCase> {
        self.cases.iter().filter(move |case| {
            case.direction() == Some(direction) && case.algorithm.mode() == mode
        })
    }

    /// Number of records expecting `status`.
    #[must_use]
    pub fn count_expecting(&self, status: Status) -> usize {
        self.cases.iter().filter(|case| case.expected_status == status).count()
    }
}

impl<'a> IntoIterator for &'a TestTable {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Table for the compiled algorithm set, built once per process.
///
/// # Errors
/// Returns an error if the compiled configuration cannot be built.
pub fn compiled_table() -> Result<&'static TestTable> {
    if let Some(table) = COMPILED_TABLE.get() {
        return Ok(table);
    }
    let table = TableBuilder::compiled().build()?;
    Ok(COMPILED_TABLE.get_or_init(|| table))
}
