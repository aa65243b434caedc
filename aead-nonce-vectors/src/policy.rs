#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Nonce and tag-length policy, and the expected-status decision function.
//!
//! Every record's expected status is a function of three inputs: whether the
//! setup algorithm is valid, whether the nonce length lies inside the bounds
//! for the key type and algorithm, and the operation state. The state is
//! checked first.

use crate::types::{AeadAlgorithm, AeadMode, KeyType, OperationState, Status};
use std::ops::RangeInclusive;

/// Nonce length used by baseline scenarios, for every mode.
pub const BASELINE_NONCE_LENGTH: usize = 13;

/// Multiplier applied to the required length for oversized-nonce scenarios.
pub const LARGE_NONCE_FACTOR: usize = 5;

/// Default nonce length for a key type and algorithm (`PSA_AEAD_NONCE_LENGTH`).
///
/// Returns `None` if the combination has no defined nonce length.
#[must_use]
pub const fn default_nonce_length(key_type: KeyType, alg: AeadAlgorithm) -> Option<usize> {
    match (key_type, alg.mode()) {
        (KeyType::Aes, AeadMode::Ccm) => Some(13),
        (KeyType::Aes, AeadMode::Gcm) => Some(12),
    }
}

/// Inclusive range of nonce lengths nonce setup accepts.
#[must_use]
pub fn nonce_bounds(key_type: KeyType, alg: AeadAlgorithm) -> Option<RangeInclusive<usize>> {
    match (key_type, alg.mode()) {
        (KeyType::Aes, AeadMode::Ccm) => Some(13..=13),
        (KeyType::Aes, AeadMode::Gcm) => Some(12..=16),
    }
}

/// Whether `length` is an acceptable tag length for `mode`.
///
/// CCM takes even lengths from 4 to 16; GCM takes 4, 8 and 12 to 16.
#[must_use]
pub const fn is_valid_tag_length(mode: AeadMode, length: u8) -> bool {
    match mode {
        AeadMode::Ccm => length >= 4 && length <= 16 && length % 2 == 0,
        AeadMode::Gcm => matches!(length, 4 | 8 | 12..=16),
    }
}

/// Whether an algorithm identifier is usable for operation setup.
#[must_use]
pub const fn is_valid_setup_algorithm(alg: AeadAlgorithm) -> bool {
    is_valid_tag_length(alg.mode(), alg.tag_length())
}

/// Expected status of nonce setup.
///
/// Inactive operations report `BadState` whatever the nonce. Otherwise an
/// invalid setup algorithm or a nonce outside the bounds reports
/// `InvalidArgument`.
#[must_use]
pub fn expected_status(
    key_type: KeyType,
    setup_algorithm: AeadAlgorithm,
    nonce_length: usize,
    state: OperationState,
) -> Status {
    if state == OperationState::Inactive {
        return Status::BadState;
    }
    if !is_valid_setup_algorithm(setup_algorithm) {
        return Status::InvalidArgument;
    }
    match nonce_bounds(key_type, setup_algorithm) {
        Some(bounds) if bounds.contains(&nonce_length) => Status::Success,
        _ => Status::InvalidArgument,
    }
}
