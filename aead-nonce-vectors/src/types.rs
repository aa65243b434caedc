#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Data model for nonce-setup test cases.
//!
//! A [`TestCase`] describes one invocation of AEAD nonce setup together with
//! the status a conforming implementation must return. Everything here is
//! plain, immutable data.

use crate::error::{Result, VectorError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default authentication tag length in bytes for both CCM and GCM.
pub const DEFAULT_TAG_LENGTH: u8 = 16;

/// Key family of the key used by a test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// AES block cipher key.
    Aes,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Aes => write!(f, "AES"),
        }
    }
}

bitflags::bitflags! {
    /// Operations a key may be used for.
    ///
    /// Bit values match the PSA Crypto key usage encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct KeyUsage: u32 {
        /// Key may be used to encrypt.
        const ENCRYPT = 0x0000_0100;
        /// Key may be used to decrypt.
        const DECRYPT = 0x0000_0200;
    }
}

/// Usage direction of an AEAD operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Encryption operation.
    Encrypt,
    /// Decryption operation.
    Decrypt,
}

impl Direction {
    /// Both directions in table order.
    pub const ALL: [Direction; 2] = [Direction::Encrypt, Direction::Decrypt];

    /// Usage flag a key needs for this direction.
    #[must_use]
    pub const fn usage(self) -> KeyUsage {
        match self {
            Direction::Encrypt => KeyUsage::ENCRYPT,
            Direction::Decrypt => KeyUsage::DECRYPT,
        }
    }

    /// Direction implied by a usage bitset, if exactly one direction is set.
    #[must_use]
    pub fn from_usage(usage: KeyUsage) -> Option<Self> {
        if usage == KeyUsage::ENCRYPT {
            Some(Direction::Encrypt)
        } else if usage == KeyUsage::DECRYPT {
            Some(Direction::Decrypt)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => write!(f, "Encrypt"),
            Direction::Decrypt => write!(f, "Decrypt"),
        }
    }
}

/// AEAD mode of operation, independent of tag length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AeadMode {
    /// Counter with CBC-MAC.
    Ccm,
    /// Galois/Counter Mode.
    Gcm,
}

impl AeadMode {
    /// All modes in table order.
    pub const ALL: [AeadMode; 2] = [AeadMode::Ccm, AeadMode::Gcm];
}

impl fmt::Display for AeadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AeadMode::Ccm => write!(f, "CCM"),
            AeadMode::Gcm => write!(f, "GCM"),
        }
    }
}

/// Tag-length modifier carried by an algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagLength {
    /// The mode's default tag length.
    Default,
    /// An explicitly shortened tag, in bytes.
    Shortened(u8),
}

/// AEAD algorithm identifier: a mode plus a tag-length modifier.
///
/// Mirrors the PSA convention where a shortened tag of the default length is
/// the same identifier as the unmodified algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AeadAlgorithm {
    mode: AeadMode,
    tag: TagLength,
}

impl AeadAlgorithm {
    /// CCM with the default tag length.
    pub const CCM: AeadAlgorithm = AeadAlgorithm::new(AeadMode::Ccm);
    /// GCM with the default tag length.
    pub const GCM: AeadAlgorithm = AeadAlgorithm::new(AeadMode::Gcm);

    /// Algorithm for `mode` with the default tag length.
    #[must_use]
    pub const fn new(mode: AeadMode) -> Self {
        Self { mode, tag: TagLength::Default }
    }

    /// Same algorithm with a shortened tag of `length` bytes.
    ///
    /// A length equal to [`DEFAULT_TAG_LENGTH`] yields the default identifier.
    /// The length is not checked here; see [`crate::policy::is_valid_tag_length`].
    #[must_use]
    pub const fn with_shortened_tag(self, length: u8) -> Self {
        let tag = if length == DEFAULT_TAG_LENGTH {
            TagLength::Default
        } else {
            TagLength::Shortened(length)
        };
        Self { mode: self.mode, tag }
    }

    /// Same algorithm with the default tag length.
    #[must_use]
    pub const fn with_default_length_tag(self) -> Self {
        Self::new(self.mode)
    }

    /// Mode of operation.
    #[must_use]
    pub const fn mode(&self) -> AeadMode {
        self.mode
    }

    /// Tag-length modifier.
    #[must_use]
    pub const fn tag(&self) -> TagLength {
        self.tag
    }

    /// Effective tag length in bytes.
    #[must_use]
    pub const fn tag_length(&self) -> u8 {
        match self.tag {
            TagLength::Default => DEFAULT_TAG_LENGTH,
            TagLength::Shortened(length) => length,
        }
    }

    /// Whether both identifiers name the same mode, ignoring tag length.
    #[must_use]
    pub fn same_base(&self, other: &AeadAlgorithm) -> bool {
        self.mode == other.mode
    }
}

impl fmt::Display for AeadAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            TagLength::Default => write!(f, "{}", self.mode),
            TagLength::Shortened(length) => write!(f, "{}(tag={})", self.mode, length),
        }
    }
}

/// Whether the operation object was set up before nonce setup is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationState {
    /// Operation not set up (flag value 0).
    Inactive,
    /// Operation set up for encryption or decryption (flag value 1).
    Active,
}

impl OperationState {
    /// Numeric flag used by table consumers.
    #[must_use]
    pub const fn as_flag(self) -> u32 {
        match self {
            OperationState::Inactive => 0,
            OperationState::Active => 1,
        }
    }

    /// Decode a numeric flag.
    ///
    /// # Errors
    /// Returns `VectorError::UnknownOperationState` for anything but 0 and 1.
    pub fn from_flag(flag: u32) -> Result<Self> {
        match flag {
            0 => Ok(OperationState::Inactive),
            1 => Ok(OperationState::Active),
            other => Err(VectorError::UnknownOperationState(other)),
        }
    }
}

/// Status returned by the API under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Call succeeded.
    Success,
    /// Key policy does not permit the requested operation.
    NotPermitted,
    /// Algorithm or parameter combination is not supported.
    NotSupported,
    /// A parameter is malformed or out of range.
    InvalidArgument,
    /// The call was made out of sequence.
    BadState,
}

impl Status {
    /// Whether this status denotes success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::NotPermitted => write!(f, "NOT_PERMITTED"),
            Status::NotSupported => write!(f, "NOT_SUPPORTED"),
            Status::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Status::BadState => write!(f, "BAD_STATE"),
        }
    }
}

/// One nonce-setup scenario and its expected outcome.
///
/// `key` and `nonce` borrow from the shared buffers in [`crate::fixtures`];
/// their lengths are the record's key and nonce lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Human-readable label, unique within a table.
    pub description: String,
    /// Key family.
    pub key_type: KeyType,
    /// Key material.
    pub key: &'static [u8],
    /// Permitted usage of the key.
    pub usage: KeyUsage,
    /// Algorithm the key is bound to.
    pub algorithm: AeadAlgorithm,
    /// Algorithm passed to operation setup.
    pub setup_algorithm: AeadAlgorithm,
    /// Nonce passed to nonce setup.
    pub nonce: &'static [u8],
    /// State the operation is in when nonce setup is invoked.
    pub operation_state: OperationState,
    /// Status a conforming implementation returns.
    pub expected_status: Status,
}

impl TestCase {
    /// Key length in bytes.
    #[must_use]
    pub fn key_length(&self) -> usize {
        self.key.len()
    }

    /// Nonce length in bytes.
    #[must_use]
    pub fn nonce_length(&self) -> usize {
        self.nonce.len()
    }

    /// Direction implied by the usage flags.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_usage(self.usage)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} {}-bit, setup={}, nonce={}B, state={}] -> {}",
            self.description,
            self.key_type,
            self.key.len() * 8,
            self.setup_algorithm,
            self.nonce.len(),
            self.operation_state.as_flag(),
            self.expected_status
        )
    }
}
