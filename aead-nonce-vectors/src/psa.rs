#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Numeric PSA Crypto encodings.
//!
//! Harnesses that drive a C implementation need the raw identifiers. These
//! conversions are exact in both directions; unknown values are errors.

use crate::error::{Result, VectorError};
use crate::types::{AeadAlgorithm, AeadMode, KeyType, KeyUsage, Status};

/// `PSA_ALG_CCM`
pub const PSA_ALG_CCM: u32 = 0x0550_0100;
/// `PSA_ALG_GCM`
pub const PSA_ALG_GCM: u32 = 0x0550_0200;
/// `PSA_ALG_AEAD_TAG_LENGTH_MASK`
pub const PSA_ALG_AEAD_TAG_LENGTH_MASK: u32 = 0x003f_0000;
/// Bit offset of the tag length inside an AEAD identifier.
pub const PSA_AEAD_TAG_LENGTH_OFFSET: u32 = 16;

/// `PSA_KEY_TYPE_AES`
pub const PSA_KEY_TYPE_AES: u16 = 0x2400;

/// `PSA_SUCCESS`
pub const PSA_SUCCESS: i32 = 0;
/// `PSA_ERROR_NOT_PERMITTED`
pub const PSA_ERROR_NOT_PERMITTED: i32 = -133;
/// `PSA_ERROR_NOT_SUPPORTED`
pub const PSA_ERROR_NOT_SUPPORTED: i32 = -134;
/// `PSA_ERROR_INVALID_ARGUMENT`
pub const PSA_ERROR_INVALID_ARGUMENT: i32 = -135;
/// `PSA_ERROR_BAD_STATE`
pub const PSA_ERROR_BAD_STATE: i32 = -137;

/// `PSA_ALG_AEAD_WITH_SHORTENED_TAG`
#[must_use]
pub const fn aead_with_shortened_tag(alg: u32, tag_length: u8) -> u32 {
    (alg & !PSA_ALG_AEAD_TAG_LENGTH_MASK)
        | (((tag_length as u32) << PSA_AEAD_TAG_LENGTH_OFFSET) & PSA_ALG_AEAD_TAG_LENGTH_MASK)
}

/// `PSA_ALG_AEAD_WITH_DEFAULT_LENGTH_TAG`
#[must_use]
pub const fn aead_with_default_length_tag(alg: u32) -> u32 {
    let base = alg & !PSA_ALG_AEAD_TAG_LENGTH_MASK;
    if base == PSA_ALG_CCM & !PSA_ALG_AEAD_TAG_LENGTH_MASK {
        PSA_ALG_CCM
    } else if base == PSA_ALG_GCM & !PSA_ALG_AEAD_TAG_LENGTH_MASK {
        PSA_ALG_GCM
    } else {
        alg
    }
}

/// Encode an algorithm identifier.
#[must_use]
pub const fn algorithm_to_psa(alg: AeadAlgorithm) -> u32 {
    let base = match alg.mode() {
        AeadMode::Ccm => PSA_ALG_CCM,
        AeadMode::Gcm => PSA_ALG_GCM,
    };
    aead_with_shortened_tag(base, alg.tag_length())
}

/// Decode an algorithm identifier.
///
/// # Errors
/// Returns `VectorError::UnknownAlgorithm` for anything other than CCM or GCM
/// with a tag length in `1..=16`.
pub fn algorithm_from_psa(value: u32) -> Result<AeadAlgorithm> {
    let mode = match aead_with_default_length_tag(value) {
        PSA_ALG_CCM => AeadMode::Ccm,
        PSA_ALG_GCM => AeadMode::Gcm,
        _ => return Err(VectorError::UnknownAlgorithm(value)),
    };
    let tag_length = u8::try_from(
        (value & PSA_ALG_AEAD_TAG_LENGTH_MASK) >> PSA_AEAD_TAG_LENGTH_OFFSET,
    )
    .map_err(|_err| VectorError::UnknownAlgorithm(value))?;
    if tag_length == 0 || tag_length > crate::types::DEFAULT_TAG_LENGTH {
        return Err(VectorError::UnknownAlgorithm(value));
    }
    Ok(AeadAlgorithm::new(mode).with_shortened_tag(tag_length))
}

/// Encode a status.
#[must_use]
pub const fn status_to_psa(status: Status) -> i32 {
    match status {
        Status::Success => PSA_SUCCESS,
        Status::NotPermitted => PSA_ERROR_NOT_PERMITTED,
        Status::NotSupported => PSA_ERROR_NOT_SUPPORTED,
        Status::InvalidArgument => PSA_ERROR_INVALID_ARGUMENT,
        Status::BadState => PSA_ERROR_BAD_STATE,
    }
}

/// Decode a status.
///
/// # Errors
/// Returns `VectorError::UnknownStatus` for codes outside the modelled set.
pub fn status_from_psa(code: i32) -> Result<Status> {
    match code {
        PSA_SUCCESS => Ok(Status::Success),
        PSA_ERROR_NOT_PERMITTED => Ok(Status::NotPermitted),
        PSA_ERROR_NOT_SUPPORTED => Ok(Status::NotSupported),
        PSA_ERROR_INVALID_ARGUMENT => Ok(Status::InvalidArgument),
        PSA_ERROR_BAD_STATE => Ok(Status::BadState),
        other => Err(VectorError::UnknownStatus(other)),
    }
}

/// Encode a key type.
#[must_use]
pub const fn key_type_to_psa(key_type: KeyType) -> u16 {
    match key_type {
        KeyType::Aes => PSA_KEY_TYPE_AES,
    }
}

/// Decode a key type.
///
/// # Errors
/// Returns `VectorError::UnknownKeyType` for anything but AES.
pub fn key_type_from_psa(value: u16) -> Result<KeyType> {
    match value {
        PSA_KEY_TYPE_AES => Ok(KeyType::Aes),
        other => Err(VectorError::UnknownKeyType(other)),
    }
}

/// Decode usage bits.
///
/// # Errors
/// Returns `VectorError::UnknownUsage` if bits outside ENCRYPT/DECRYPT are set.
pub fn usage_from_psa(bits: u32) -> Result<KeyUsage> {
    KeyUsage::from_bits(bits).ok_or(VectorError::UnknownUsage(bits))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shortened_tag_encoding() {
        assert_eq!(aead_with_shortened_tag(PSA_ALG_CCM, 4), 0x0544_0100);
        assert_eq!(aead_with_shortened_tag(PSA_ALG_GCM, 8), 0x0548_0200);
        assert_eq!(aead_with_shortened_tag(PSA_ALG_CCM, 16), PSA_ALG_CCM);
    }

    #[test]
    fn test_default_length_tag_encoding() {
        assert_eq!(
            aead_with_default_length_tag(aead_with_shortened_tag(PSA_ALG_CCM, 4)),
            PSA_ALG_CCM
        );
        assert_eq!(aead_with_default_length_tag(PSA_ALG_GCM), PSA_ALG_GCM);
    }

    #[test]
    fn test_algorithm_encoding_matches_model() {
        let short = AeadAlgorithm::CCM.with_shortened_tag(4);
        assert_eq!(algorithm_to_psa(short), aead_with_shortened_tag(PSA_ALG_CCM, 4));
        assert_eq!(algorithm_from_psa(algorithm_to_psa(short)).unwrap(), short);
        assert_eq!(algorithm_from_psa(PSA_ALG_GCM).unwrap(), AeadAlgorithm::GCM);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        // PSA_ALG_CHACHA20_POLY1305
        assert!(matches!(
            algorithm_from_psa(0x0550_0500),
            Err(VectorError::UnknownAlgorithm(0x0550_0500))
        ));
        // Zero tag length
        assert!(algorithm_from_psa(PSA_ALG_CCM & !PSA_ALG_AEAD_TAG_LENGTH_MASK).is_err());
        // Tag length 17
        assert!(algorithm_from_psa(aead_with_shortened_tag(PSA_ALG_CCM, 17)).is_err());
    }

    #[test]
    fn test_status_codes() {
        for status in [
            Status::Success,
            Status::NotPermitted,
            Status::NotSupported,
            Status::InvalidArgument,
            Status::BadState,
        ] {
            assert_eq!(status_from_psa(status_to_psa(status)).unwrap(), status);
        }
        assert_eq!(status_to_psa(Status::BadState), -137);
        assert!(matches!(status_from_psa(-1), Err(VectorError::UnknownStatus(-1))));
    }

    #[test]
    fn test_key_type_and_usage() {
        assert_eq!(key_type_from_psa(key_type_to_psa(KeyType::Aes)).unwrap(), KeyType::Aes);
        assert!(key_type_from_psa(0x1001).is_err());
        assert_eq!(usage_from_psa(0x100).unwrap(), KeyUsage::ENCRYPT);
        assert_eq!(usage_from_psa(0x300).unwrap(), KeyUsage::ENCRYPT | KeyUsage::DECRYPT);
        assert!(usage_from_psa(0x800).is_err());
    }
}
