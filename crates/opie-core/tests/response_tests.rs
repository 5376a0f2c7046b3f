// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use opie_core::types::{OtpError, OtpKey};
use opie_core::{dict, otp, response};

fn test_key() -> OtpKey {
    // otp-md5("This is a test.", "TeSt", 0) == 9E876134D90499DD
    otp::compute("This is a test.", "TeSt", 0).unwrap()
}

#[test]
fn encode_words_known_key() {
    assert_eq!(
        response::encode_words(&test_key()),
        "JUST SHE ARMY MEEK AKIN TONY"
    );
}

#[test]
fn parse_words_is_case_insensitive() {
    let key = response::parse("just she army meek akin tony").unwrap();
    assert_eq!(key, test_key());
}

#[test]
fn parse_hex_accepts_both_cases_and_spacing() {
    let expected = test_key();
    assert_eq!(response::parse("9E876134D90499DD").unwrap(), expected);
    assert_eq!(response::parse("9e876134d90499dd").unwrap(), expected);
    assert_eq!(response::parse("9E87 6134 D904 99DD").unwrap(), expected);
}

#[test]
fn parse_honors_extended_prefixes() {
    let expected = test_key();
    assert_eq!(response::parse("hex:9e876134d90499dd").unwrap(), expected);
    assert_eq!(
        response::parse("word:JUST SHE ARMY MEEK AKIN TONY").unwrap(),
        expected
    );
}

#[test]
fn parse_rejects_empty_and_garbage() {
    assert_eq!(response::parse(""), Err(OtpError::MalformedResponse));
    assert_eq!(response::parse("   "), Err(OtpError::MalformedResponse));
    assert_eq!(
        response::parse("not a valid otp reply at all"),
        Err(OtpError::MalformedResponse)
    );
    assert_eq!(response::parse("9E87"), Err(OtpError::MalformedResponse));
}

#[test]
fn parse_rejects_unknown_word() {
    assert_eq!(
        response::parse("JUST SHE ARMY MEEK AKIN QQQQ"),
        Err(OtpError::UnknownWord)
    );
}

#[test]
fn parse_detects_single_word_corruption() {
    // TOOK is the dictionary neighbor of TONY; the two parity bits no
    // longer match the decoded key.
    assert_eq!(
        response::parse("JUST SHE ARMY MEEK AKIN TOOK"),
        Err(OtpError::ParityMismatch)
    );
}

#[test]
fn words_round_trip() {
    let key = otp::compute("round trip pw", "seed9", 123).unwrap();
    let phrase = response::encode_words(&key);
    assert_eq!(response::parse(&phrase).unwrap(), key);
}

#[test]
fn dictionary_shape_holds() {
    let (short, long) = dict::WORDS.split_at(dict::SHORT_SECTION_LEN);
    assert!(short.iter().all(|w| (1..=3).contains(&w.len())));
    assert!(long.iter().all(|w| w.len() == 4));
    assert!(short.windows(2).all(|p| p[0] < p[1]));
    assert!(long.windows(2).all(|p| p[0] < p[1]));
    assert!(dict::WORDS
        .iter()
        .all(|w| w.chars().all(|c| c.is_ascii_uppercase())));
}
