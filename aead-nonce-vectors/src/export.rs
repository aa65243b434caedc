#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! JSON export and import of table records.
//!
//! Harnesses written in other languages read the table as JSON. Each record
//! carries both symbolic names and numeric PSA codes.

use crate::{
    error::{Result, VectorError},
    fixtures, psa,
    table::TestTable,
    types::{OperationState, TestCase},
};
use serde::{Deserialize, Serialize};

/// Owned, serialisable form of a [`TestCase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    /// Record description.
    pub description: String,
    /// Key family name.
    pub key_type: String,
    /// `psa_key_type_t` value.
    pub key_type_code: u16,
    /// Key material, hex encoded.
    pub key: String,
    /// Key length in bytes.
    pub key_length: usize,
    /// `psa_key_usage_t` value.
    pub usage_flags: u32,
    /// Key algorithm name.
    pub algorithm: String,
    /// Key algorithm `psa_algorithm_t` value.
    pub algorithm_code: u32,
    /// Setup algorithm name.
    pub setup_algorithm: String,
    /// Setup algorithm `psa_algorithm_t` value.
    pub setup_algorithm_code: u32,
    /// Nonce, hex encoded.
    pub nonce: String,
    /// Nonce length in bytes.
    pub nonce_length: usize,
    /// 1 for an active operation, 0 otherwise.
    pub operation_state: u32,
    /// Expected status name.
    pub expected_status: String,
    /// Expected `psa_status_t` value.
    pub expected_status_code: i32,
}

impl TestCaseRecord {
    /// Record for `case`.
    #[must_use]
    pub fn from_case(case: &TestCase) -> Self {
        Self {
            description: case.description.clone(),
            key_type: case.key_type.to_string(),
            key_type_code: psa::key_type_to_psa(case.key_type),
            key: hex::encode(case.key),
            key_length: case.key_length(),
            usage_flags: case.usage.bits(),
            algorithm: case.algorithm.to_string(),
            algorithm_code: psa::algorithm_to_psa(case.algorithm),
            setup_algorithm: case.setup_algorithm.to_string(),
            setup_algorithm_code: psa::algorithm_to_psa(case.setup_algorithm),
            nonce: hex::encode(case.nonce),
            nonce_length: case.nonce_length(),
            operation_state: case.operation_state.as_flag(),
            expected_status: case.expected_status.to_string(),
            expected_status_code: psa::status_to_psa(case.expected_status),
        }
    }

    /// Rebuild the [`TestCase`], decoding numeric codes and re-borrowing the
    /// shared buffers.
    ///
    /// # Errors
    /// Returns an error if a code is unknown, the hex is malformed, a length
    /// disagrees with its bytes, or the bytes are not a prefix of the shared
    /// buffer.
    pub fn to_case(&self) -> Result<TestCase> {
        let key = shared_prefix(
            &self.description,
            "key_data",
            &self.key,
            self.key_length,
            &fixtures::KEY_DATA,
        )?;
        let nonce = shared_prefix(
            &self.description,
            "nonce",
            &self.nonce,
            self.nonce_length,
            &fixtures::NONCE,
        )?;

        Ok(TestCase {
            description: self.description.clone(),
            key_type: psa::key_type_from_psa(self.key_type_code)?,
            key,
            usage: psa::usage_from_psa(self.usage_flags)?,
            algorithm: psa::algorithm_from_psa(self.algorithm_code)?,
            setup_algorithm: psa::algorithm_from_psa(self.setup_algorithm_code)?,
            nonce,
            operation_state: OperationState::from_flag(self.operation_state)?,
            expected_status: psa::status_from_psa(self.expected_status_code)?,
        })
    }
}

fn shared_prefix(
    record: &str,
    name: &'static str,
    encoded: &str,
    length: usize,
    buffer: &'static [u8],
) -> Result<&'static [u8]> {
    let bytes = hex::decode(encoded).map_err(|e| VectorError::HexError(e.to_string()))?;
    let shared = buffer.get(..length).ok_or(VectorError::BufferTooShort {
        name,
        needed: length,
        available: buffer.len(),
    })?;
    if bytes != shared {
        return Err(VectorError::ForeignBuffer { record: record.to_string(), name });
    }
    Ok(shared)
}

/// Serialise every record of `table` as a pretty-printed JSON array.
///
/// # Errors
/// Returns an error if serialisation fails.
pub fn to_json(table: &TestTable) -> Result<String> {
    let records: Vec<TestCaseRecord> = table.iter().map(TestCaseRecord::from_case).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parse a JSON array of records.
///
/// # Errors
/// Returns an error if the JSON is malformed.
pub fn records_from_json(json: &str) -> Result<Vec<TestCaseRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of records back into a table.
///
/// # Errors
/// Returns an error if the JSON is malformed or any record cannot be rebuilt.
pub fn table_from_json(json: &str) -> Result<TestTable> {
    let cases = records_from_json(json)?
        .iter()
        .map(TestCaseRecord::to_case)
        .collect::<Result<Vec<_>>>()?;
    Ok(TestTable::new(cases))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::{
        builder::TableBuilder,
        config::{Coverage, SuiteConfig},
        types::{AeadMode, Direction},
    };

    fn ccm_table() -> TestTable {
        let config = SuiteConfig::empty()
            .with_algorithm(AeadMode::Ccm, Coverage::Full)
            .with_directions(&[Direction::Encrypt]);
        TableBuilder::new(config).build().unwrap()
    }

    #[test]
    fn test_record_carries_psa_codes() {
        let table = ccm_table();
        let record = TestCaseRecord::from_case(&table.as_slice()[1]);
        assert_eq!(record.key_type_code, psa::PSA_KEY_TYPE_AES);
        assert_eq!(record.usage_flags, 0x100);
        assert_eq!(record.algorithm_code, psa::PSA_ALG_CCM);
        assert_eq!(record.setup_algorithm_code, psa::aead_with_shortened_tag(psa::PSA_ALG_CCM, 4));
        assert_eq!(record.nonce_length, 13);
        assert_eq!(record.nonce.len(), 26);
        assert_eq!(record.expected_status_code, psa::PSA_SUCCESS);
    }

    #[test]
    fn test_json_reimport_reproduces_table() {
        let table = ccm_table();
        let json = to_json(&table).unwrap();
        let reimported = table_from_json(&json).unwrap();
        assert_eq!(reimported, table);
        // Re-borrowed from the shared buffers, not copied
        assert!(fixtures::is_prefix_of(reimported.as_slice()[0].key, &fixtures::KEY_DATA));
    }

    #[test]
    fn test_foreign_key_bytes_rejected() {
        let table = ccm_table();
        let mut record = TestCaseRecord::from_case(&table.as_slice()[0]);
        record.key = "00".repeat(16);
        assert!(matches!(
            record.to_case(),
            Err(VectorError::ForeignBuffer { name: "key_data", .. })
        ));
    }

    #[test]
    fn test_bad_hex_and_codes_rejected() {
        let table = ccm_table();
        let base = TestCaseRecord::from_case(&table.as_slice()[0]);

        let mut bad_hex = base.clone();
        bad_hex.nonce = "zz".to_string();
        assert!(matches!(bad_hex.to_case(), Err(VectorError::HexError(_))));

        let mut bad_status = base.clone();
        bad_status.expected_status_code = -1;
        assert!(matches!(bad_status.to_case(), Err(VectorError::UnknownStatus(-1))));

        let mut too_long = base;
        too_long.nonce_length = fixtures::NONCE.len() + 1;
        assert!(matches!(too_long.to_case(), Err(VectorError::BufferTooShort { .. })));
    }

    #[test]
    fn test_unknown_operation_state_rejected() {
        let table = ccm_table();
        let mut record = TestCaseRecord::from_case(&table.as_slice()[0]);
        record.operation_state = 7;
        assert!(matches!(record.to_case(), Err(VectorError::UnknownOperationState(7))));

        record.operation_state = 0;
        let case = record.to_case().unwrap();
        assert_eq!(case.operation_state, OperationState::Inactive);
        assert_eq!(TestCaseRecord::from_case(&case).operation_state, 0);
    }

    #[test]
    fn test_records_from_json_rejects_garbage() {
        assert!(records_from_json("[{").is_err());
        assert!(records_from_json("[]").unwrap().is_empty());
    }
}
