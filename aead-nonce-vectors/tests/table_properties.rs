#![deny(unsafe_code)]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

//! Property-Based Table Tests
//!
//! ## Properties Tested
//!
//! - **Consistency**: every buildable configuration yields a table that validates
//! - **State precedence**: inactive operations always expect `BadState`
//! - **Tag-length independence**: valid tag modifiers never change the outcome
//! - **Nonce bounds**: active operations outside the bounds expect `InvalidArgument`
//! - **Inclusion only**: disabling an algorithm removes exactly its records

use aead_nonce_vectors::{
    AeadAlgorithm, AeadMode, Coverage, Direction, KeyType, OperationState, ReferenceModel, Status,
    SuiteConfig, TableBuilder, evaluate,
    policy::{
        LARGE_NONCE_FACTOR, default_nonce_length, expected_status, is_valid_tag_length,
        nonce_bounds,
    },
    validate_table,
};
use proptest::prelude::*;

fn arb_mode() -> impl Strategy<Value = AeadMode> {
    prop_oneof![Just(AeadMode::Ccm), Just(AeadMode::Gcm)]
}

fn arb_coverage() -> impl Strategy<Value = Option<Coverage>> {
    prop_oneof![Just(None), Just(Some(Coverage::Full)), Just(Some(Coverage::BaselineOnly))]
}

fn arb_directions() -> impl Strategy<Value = Vec<Direction>> {
    prop_oneof![
        Just(vec![Direction::Encrypt]),
        Just(vec![Direction::Decrypt]),
        Just(vec![Direction::Encrypt, Direction::Decrypt]),
        Just(vec![Direction::Decrypt, Direction::Encrypt]),
    ]
}

fn arb_config() -> impl Strategy<Value = SuiteConfig> {
    (arb_coverage(), arb_coverage(), arb_directions(), prop::sample::select(vec![4u8, 8, 12]))
        .prop_map(|(ccm, gcm, directions, tag_length)| {
            let mut config = SuiteConfig::empty()
                .with_directions(&directions)
                .with_shortened_tag_length(tag_length)
                .with_aes_128(true);
            if let Some(coverage) = ccm {
                config = config.with_algorithm(AeadMode::Ccm, coverage);
            }
            if let Some(coverage) = gcm {
                config = config.with_algorithm(AeadMode::Gcm, coverage);
            }
            config
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every buildable configuration yields a self-consistent, conformant table
    #[test]
    fn built_tables_validate(config in arb_config()) {
        let table = TableBuilder::new(config).build().unwrap();
        prop_assert!(validate_table(&table).is_ok());
        prop_assert!(evaluate(&table, &mut ReferenceModel::new()).all_passed());
    }

    /// Inactive records expect BadState regardless of nonce length
    #[test]
    fn inactive_always_bad_state(mode in arb_mode(), nonce_length in 0usize..128, tag in 0u8..=20) {
        let alg = AeadAlgorithm::new(mode).with_shortened_tag(tag);
        prop_assert_eq!(
            expected_status(KeyType::Aes, alg, nonce_length, OperationState::Inactive),
            Status::BadState
        );
    }

    /// A valid tag-length modifier never changes the outcome
    #[test]
    fn tag_length_independence(mode in arb_mode(), nonce_length in 0usize..128, tag in 4u8..=16) {
        prop_assume!(is_valid_tag_length(mode, tag));
        let base = AeadAlgorithm::new(mode);
        prop_assert_eq!(
            expected_status(
                KeyType::Aes,
                base.with_shortened_tag(tag),
                nonce_length,
                OperationState::Active
            ),
            expected_status(KeyType::Aes, base, nonce_length, OperationState::Active)
        );
    }

    /// Active operations with a nonce outside the bounds expect InvalidArgument
    #[test]
    fn out_of_bounds_nonce_invalid(mode in arb_mode(), nonce_length in 0usize..128) {
        let alg = AeadAlgorithm::new(mode);
        let bounds = nonce_bounds(KeyType::Aes, alg).unwrap();
        let status = expected_status(KeyType::Aes, alg, nonce_length, OperationState::Active);
        if bounds.contains(&nonce_length) {
            prop_assert_eq!(status, Status::Success);
        } else {
            prop_assert_eq!(status, Status::InvalidArgument);
        }
    }

    /// Disabling an algorithm removes exactly its block and nothing else
    #[test]
    fn exclusion_removes_only_that_block(config in arb_config(), mode in arb_mode()) {
        let full = TableBuilder::new(config.clone()).build().unwrap();
        let reduced = TableBuilder::new(config.without_algorithm(mode)).build().unwrap();
        let kept: Vec<_> = full
            .iter()
            .filter(|case| case.algorithm.mode() != mode)
            .cloned()
            .collect();
        prop_assert_eq!(reduced.as_slice(), kept.as_slice());
    }
}

#[test]
fn required_length_succeeds_and_edges_fail() {
    for mode in AeadMode::ALL {
        let alg = AeadAlgorithm::new(mode);
        let required = default_nonce_length(KeyType::Aes, alg).unwrap();
        assert_eq!(
            expected_status(KeyType::Aes, alg, required, OperationState::Active),
            Status::Success
        );
        assert_eq!(
            expected_status(KeyType::Aes, alg, required - 1, OperationState::Active),
            Status::InvalidArgument
        );
        assert_eq!(
            expected_status(
                KeyType::Aes,
                alg,
                required * LARGE_NONCE_FACTOR,
                OperationState::Active
            ),
            Status::InvalidArgument
        );
    }
}
