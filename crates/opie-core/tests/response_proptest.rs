// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! Randomized invariants for the response codec.

use opie_core::types::OtpKey;
use opie_core::{dict, response};
use proptest::prelude::*;

proptest! {
    #[test]
    fn any_key_survives_word_encoding(bytes in any::<[u8; 8]>()) {
        let key = OtpKey::from_bytes(bytes);
        let phrase = response::encode_words(&key);
        prop_assert_eq!(response::parse(&phrase).unwrap(), key);
    }

    #[test]
    fn any_key_survives_hex_encoding(bytes in any::<[u8; 8]>()) {
        let key = OtpKey::from_bytes(bytes);
        prop_assert_eq!(response::parse(&key.to_hex()).unwrap(), key);
    }

    #[test]
    fn word_substitution_never_yields_same_key(
        bytes in any::<[u8; 8]>(),
        position in 0usize..6,
        replacement in 0usize..2048,
    ) {
        let key = OtpKey::from_bytes(bytes);
        let phrase = response::encode_words(&key);
        let mut words: Vec<&str> = phrase.split(' ').collect();
        prop_assume!(words[position] != dict::WORDS[replacement]);
        words[position] = dict::WORDS[replacement];
        let tampered = words.join(" ");

        // Either the parity check fires or the decoded key differs;
        // tampering must never round-trip to the original key.
        match response::parse(&tampered) {
            Ok(decoded) => prop_assert_ne!(decoded, key),
            Err(_) => {}
        }
    }
}
