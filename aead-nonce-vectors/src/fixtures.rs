#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Shared key and nonce buffers.
//!
//! Records borrow prefixes of these buffers. They are owned by no table.

use crate::error::{Result, VectorError};
use hex_literal::hex;

/// AES-128 key size in bytes.
pub const AES_16B_KEY_SIZE: usize = 16;

/// Key material shared by every record.
pub static KEY_DATA: [u8; 32] = hex!(
    "49 8e c7 7d 01 95 0d 94 2c 16 a5 3e 99 5f c9 d6"
    "fb 76 bf 1b b6 a4 d0 c4 9c e8 b4 5f 0a 5e 71 32"
);

/// Nonce bytes shared by every record. Long enough for the oversized-nonce
/// scenarios of every supported algorithm.
pub static NONCE: [u8; 80] = hex!(
    "48 c0 90 6f 07 63 cc 4a 1c f7 a8 1e 02 d4 9b 33"
    "bf 71 00 b6 33 e4 09 24 4a 1d 53 5c 8f 0e 79 2a"
    "d4 c3 58 fd 03 27 b5 18 d6 07 ac 91 4b e2 60 3c"
    "7a 05 9e d1 86 f2 2b 64 c9 3f e0 17 55 a8 0d 42"
    "bd 6e 31 f8 84 29 c7 0a 9b 52 e6 13 fa 45 70 8c"
);

/// Prefix of [`KEY_DATA`] of `length` bytes.
///
/// # Errors
/// Returns `VectorError::BufferTooShort` if the shared buffer is shorter.
pub fn key_material(length: usize) -> Result<&'static [u8]> {
    prefix("key_data", &KEY_DATA, length)
}

/// Prefix of [`NONCE`] of `length` bytes.
///
/// # Errors
/// Returns `VectorError::BufferTooShort` if the shared buffer is shorter.
pub fn nonce(length: usize) -> Result<&'static [u8]> {
    prefix("nonce", &NONCE, length)
}

/// Whether `slice` starts at the beginning of `buffer` and lies inside it.
#[must_use]
pub fn is_prefix_of(slice: &[u8], buffer: &'static [u8]) -> bool {
    slice.len() <= buffer.len() && std::ptr::eq(slice.as_ptr(), buffer.as_ptr())
}

fn prefix(name: &'static str, buffer: &'static [u8], length: usize) -> Result<&'static [u8]> {
    buffer.get(..length).ok_or(VectorError::BufferTooShort {
        name,
        needed: length,
        available: buffer.len(),
    })
}
