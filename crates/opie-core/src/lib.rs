// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! One-time password engine for the pam-opie module.
//!
//! Implements the otp-md5 scheme of RFC 2289: a passphrase and a
//! per-challenge seed are hashed and folded to a 64-bit key, iterated
//! once per sequence step, and exchanged as either a six-word phrase or
//! 16 hex digits. This crate is pure computation; PAM types and the
//! conversation machinery live in `opie-conv` and `opie-auth`.
//!
//! # Crate layout
//!
//! * [`types`] -- shared constants, error type, and the zeroized key container.
//! * [`otp`] -- hash-and-fold key computation.
//! * [`dict`] -- the 2048-word response dictionary.
//! * [`response`] -- six-word and hexadecimal response codec.
//! * [`challenge`] -- challenge generation and seed validation.

/// Challenge generation and seed validation.
pub mod challenge;
/// The 2048-word dictionary for the six-word encoding.
pub mod dict;
/// The otp-md5 hash-and-fold computation.
pub mod otp;
/// Six-word and hexadecimal response encoding and parsing.
pub mod response;
/// Shared constants, error type, and the zeroized key container.
pub mod types;
