// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! Module policy for pam-opie.
//!
//! Sits between the OTP engine (`opie-core`) and the PAM service module
//! (`opie-pam`): resolves the authenticating user against the JSON
//! configuration file, generates a challenge, and drives the
//! prompt/verify loop over an injected [`opie_conv::Conversation`].

/// Configuration file loading and per-user resolution.
pub mod config;
/// PAM module argument parsing.
pub mod params;
/// The challenge/prompt/verify flow.
mod authenticate;

pub use authenticate::{authenticate, AuthError};
pub use config::{ConfigError, UserConfig};
pub use params::ModuleArgs;
