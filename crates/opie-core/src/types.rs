// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a folded one-time password key in bytes.
pub const OTP_KEY_LENGTH: usize = 8;
/// Length of an MD5 digest in bytes.
pub const MD5_DIGEST_LENGTH: usize = 16;
/// Number of words in an encoded response.
pub const RESPONSE_WORD_COUNT: usize = 6;
/// Number of dictionary index bits carried by each response word.
pub const WORD_BITS: usize = 11;
/// Number of entries in the six-word dictionary.
pub const DICTIONARY_SIZE: usize = 2048;
/// Number of parity bits appended to the key before word encoding.
pub const PARITY_BITS: usize = 2;
/// Length of a hexadecimal response in digits.
pub const HEX_RESPONSE_LENGTH: usize = 2 * OTP_KEY_LENGTH;
/// Minimum seed length in characters (RFC 2289 section 6.0).
pub const SEED_MIN_LENGTH: usize = 1;
/// Maximum seed length in characters (RFC 2289 section 6.0).
pub const SEED_MAX_LENGTH: usize = 16;

const _: () = assert!(DICTIONARY_SIZE == 1 << WORD_BITS);
const _: () = assert!(RESPONSE_WORD_COUNT * WORD_BITS == 8 * OTP_KEY_LENGTH + PARITY_BITS);
const _: () = assert!(MD5_DIGEST_LENGTH == 2 * OTP_KEY_LENGTH);

/// Enumerates all error conditions that can arise in the OTP engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    /// The seed is empty, too long, or contains non-alphanumeric characters.
    #[error("seed must be 1-16 alphanumeric characters")]
    InvalidSeed,
    /// The requested maximum sequence number is zero.
    #[error("sequence range is empty")]
    InvalidSequence,
    /// The response is neither a six-word phrase nor 16 hex digits.
    #[error("response is not a six-word phrase or a 16-digit hex string")]
    MalformedResponse,
    /// A response word is not in the dictionary.
    #[error("response contains a word outside the dictionary")]
    UnknownWord,
    /// The two parity bits of a six-word response do not match the key.
    #[error("response parity check failed")]
    ParityMismatch,
}

/// Convenience alias for `Result<T, OtpError>`.
pub type OtpResult<T> = Result<T, OtpError>;

/// A folded 64-bit one-time password key.
///
/// Zeroized on drop; equality is evaluated in constant time. The `Debug`
/// implementation redacts the contents.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct OtpKey([u8; OTP_KEY_LENGTH]);

impl OtpKey {
    /// Wraps an 8-byte key.
    pub fn from_bytes(bytes: [u8; OTP_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; OTP_KEY_LENGTH] {
        &self.0
    }

    /// Renders the key as 16 uppercase hex digits.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(HEX_RESPONSE_LENGTH);
        for b in &self.0 {
            out.push_str(&format!("{b:02X}"));
        }
        out
    }
}

impl PartialEq for OtpKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for OtpKey {}

impl std::fmt::Debug for OtpKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OtpKey([REDACTED])")
    }
}
