// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! Encoding and parsing of one-time password responses.
//!
//! The six-word form of RFC 2289 appendix A carries the 64 key bits plus
//! two parity bits as six 11-bit dictionary indexes. The parity value is
//! the sum of the key's consecutive bit pairs, modulo 4, stored in the
//! lowest two bits of the final index. The hexadecimal form is the key
//! as 16 hex digits, with interior whitespace tolerated.

use crate::dict;
use crate::types::{
    OtpError, OtpKey, OtpResult, HEX_RESPONSE_LENGTH, OTP_KEY_LENGTH, PARITY_BITS,
    RESPONSE_WORD_COUNT, WORD_BITS,
};

/// Computes the two parity bits for a key: sum of bit pairs, modulo 4.
fn parity(key: &OtpKey) -> u64 {
    let n = u64::from_be_bytes(*key.as_bytes());
    let mut sum = 0u64;
    let mut shift = 62i32;
    while shift >= 0 {
        sum += (n >> shift) & 0x3;
        shift -= 2;
    }
    sum & 0x3
}

/// Encodes a key as its six-word response phrase.
pub fn encode_words(key: &OtpKey) -> String {
    let bits = (u128::from(u64::from_be_bytes(*key.as_bytes())) << PARITY_BITS)
        | u128::from(parity(key));
    let mut out = String::new();
    for i in 0..RESPONSE_WORD_COUNT {
        let shift = (RESPONSE_WORD_COUNT - 1 - i) * WORD_BITS;
        let index = ((bits >> shift) & 0x7FF) as usize;
        if i > 0 {
            out.push(' ');
        }
        out.push_str(dict::WORDS[index]);
    }
    out
}

/// Parses a response in six-word or hexadecimal form.
///
/// Matching is case-insensitive and interior whitespace is ignored in
/// the hex form. The explicit `word:` and `hex:` prefixes of OPIE
/// extended responses force the corresponding form.
///
/// # Errors
///
/// Returns [`OtpError::MalformedResponse`] if the input fits neither
/// form, [`OtpError::UnknownWord`] for an out-of-dictionary word, and
/// [`OtpError::ParityMismatch`] if the six-word parity check fails.
pub fn parse(response: &str) -> OtpResult<OtpKey> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(OtpError::MalformedResponse);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("word:") {
        return parse_words(&trimmed[trimmed.len() - rest.len()..]);
    }
    if let Some(rest) = lower.strip_prefix("hex:") {
        return parse_hex(&trimmed[trimmed.len() - rest.len()..]);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() == RESPONSE_WORD_COUNT && tokens.iter().all(|t| t.len() <= 4) {
        parse_words(trimmed)
    } else {
        parse_hex(trimmed)
    }
}

fn parse_words(phrase: &str) -> OtpResult<OtpKey> {
    let tokens: Vec<&str> = phrase.split_whitespace().collect();
    if tokens.len() != RESPONSE_WORD_COUNT {
        return Err(OtpError::MalformedResponse);
    }

    let mut bits: u128 = 0;
    for token in tokens {
        let word = token.to_ascii_uppercase();
        let index = dict::index_of(&word).ok_or(OtpError::UnknownWord)?;
        bits = (bits << WORD_BITS) | u128::from(index);
    }

    let key = OtpKey::from_bytes(((bits >> PARITY_BITS) as u64).to_be_bytes());
    if parity(&key) != (bits & 0x3) as u64 {
        return Err(OtpError::ParityMismatch);
    }
    Ok(key)
}

fn parse_hex(text: &str) -> OtpResult<OtpKey> {
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != HEX_RESPONSE_LENGTH || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(OtpError::MalformedResponse);
    }

    let mut bytes = [0u8; OTP_KEY_LENGTH];
    for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).map_err(|_| OtpError::MalformedResponse)?;
        bytes[i] = u8::from_str_radix(pair, 16).map_err(|_| OtpError::MalformedResponse)?;
    }
    Ok(OtpKey::from_bytes(bytes))
}
