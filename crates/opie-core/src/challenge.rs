// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use rand::Rng;

use crate::types::{OtpError, OtpResult, SEED_MAX_LENGTH, SEED_MIN_LENGTH};

/// Alphabet used for generated seeds: digits then lowercase letters.
const SEED_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One otp-md5 challenge: a sequence number and a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Number of hash iterations the responder must perform.
    pub sequence: u32,
    /// Per-challenge seed, 1-16 alphanumeric characters.
    pub seed: String,
}

impl Challenge {
    /// Creates a challenge after validating the seed.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidSeed`] if the seed is not 1-16
    /// alphanumeric characters.
    pub fn new(sequence: u32, seed: impl Into<String>) -> OtpResult<Self> {
        let seed = seed.into();
        validate_seed(&seed)?;
        Ok(Self { sequence, seed })
    }

    /// Renders the challenge prompt shown to the user.
    ///
    /// The trailing `ext` advertises that extended responses
    /// (`hex:` / `word:`) are accepted.
    pub fn prompt(&self) -> String {
        format!("otp-md5 {} {} ext\nPassword: ", self.sequence, self.seed)
    }
}

/// Validates a seed against RFC 2289 section 6.0: 1-16 alphanumeric characters.
///
/// # Errors
///
/// Returns [`OtpError::InvalidSeed`] on any violation.
pub fn validate_seed(seed: &str) -> OtpResult<()> {
    if seed.len() < SEED_MIN_LENGTH || seed.len() > SEED_MAX_LENGTH {
        return Err(OtpError::InvalidSeed);
    }
    if !seed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(OtpError::InvalidSeed);
    }
    Ok(())
}

/// Generates a fresh challenge with a random sequence in `1..=max_sequence`
/// and a random seed of `seed_len` characters.
///
/// # Errors
///
/// Returns [`OtpError::InvalidSequence`] if `max_sequence` is zero and
/// [`OtpError::InvalidSeed`] if `seed_len` is outside the RFC bounds.
pub fn generate<R: Rng>(max_sequence: u32, seed_len: usize, rng: &mut R) -> OtpResult<Challenge> {
    if max_sequence == 0 {
        return Err(OtpError::InvalidSequence);
    }
    if !(SEED_MIN_LENGTH..=SEED_MAX_LENGTH).contains(&seed_len) {
        return Err(OtpError::InvalidSeed);
    }
    let sequence = rng.gen_range(1..=max_sequence);
    let seed: String = (0..seed_len)
        .map(|_| SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())] as char)
        .collect();
    Challenge::new(sequence, seed)
}
