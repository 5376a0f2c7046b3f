// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! The otp-md5 computation of RFC 2289 section 6.0.
//!
//! The initial step hashes the lowercased seed concatenated with the
//! passphrase and folds the 16-byte digest to 8 bytes by XORing its two
//! halves. Each subsequent step hashes and folds the previous key. The
//! key for sequence `n` is the initial step followed by `n` iterations.

use md5::{Digest, Md5};
use zeroize::Zeroize;

use crate::challenge::validate_seed;
use crate::types::{OtpKey, OtpResult, MD5_DIGEST_LENGTH, OTP_KEY_LENGTH};

/// Folds a 16-byte MD5 digest into an 8-byte key by XORing the halves.
fn fold(digest: &[u8; MD5_DIGEST_LENGTH]) -> OtpKey {
    let mut key = [0u8; OTP_KEY_LENGTH];
    for i in 0..OTP_KEY_LENGTH {
        key[i] = digest[i] ^ digest[i + OTP_KEY_LENGTH];
    }
    OtpKey::from_bytes(key)
}

fn hash_and_fold(input: &[u8]) -> OtpKey {
    let mut digest = [0u8; MD5_DIGEST_LENGTH];
    digest.copy_from_slice(&Md5::digest(input));
    let key = fold(&digest);
    digest.zeroize();
    key
}

/// Computes the step-zero key from a passphrase and seed.
///
/// The seed is lowercased before hashing, so challenges are
/// case-insensitive in the seed as RFC 2289 requires.
///
/// # Errors
///
/// Returns [`crate::types::OtpError::InvalidSeed`] if the seed is not
/// 1-16 alphanumeric characters.
pub fn initial_key(passphrase: &str, seed: &str) -> OtpResult<OtpKey> {
    validate_seed(seed)?;
    let mut input = seed.to_ascii_lowercase().into_bytes();
    input.extend_from_slice(passphrase.as_bytes());
    let key = hash_and_fold(&input);
    input.zeroize();
    Ok(key)
}

/// Advances a key by one hash-and-fold step.
pub fn next_key(key: &OtpKey) -> OtpKey {
    hash_and_fold(key.as_bytes())
}

/// Computes the one-time password for the given sequence number.
///
/// Sequence 0 is the initial step itself.
///
/// # Errors
///
/// Returns [`crate::types::OtpError::InvalidSeed`] if the seed is invalid.
pub fn compute(passphrase: &str, seed: &str, sequence: u32) -> OtpResult<OtpKey> {
    let mut key = initial_key(passphrase, seed)?;
    for _ in 0..sequence {
        key = next_key(&key);
    }
    Ok(key)
}
