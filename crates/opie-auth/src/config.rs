// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! The module's JSON configuration file.
//!
//! ```json
//! {
//!     "defaults": { "maxseq": 499, "retries": 1, "seedlen": 6 },
//!     "users": [
//!         { "name": "alice", "passphrase": "correct horse battery staple" }
//!     ]
//! }
//! ```
//!
//! Each per-user field falls back to the file's `defaults` section and
//! then to the hardcoded defaults. A passphrase has no hardcoded
//! default; a user without one is unusable. The file holds secrets, so
//! it must be mode 0600.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default upper bound for generated sequence numbers.
pub const DEFAULT_MAX_SEQUENCE: u32 = 499;
/// Default number of prompt attempts per authentication.
pub const DEFAULT_RETRIES: u32 = 1;
/// Default generated seed length in characters.
pub const DEFAULT_SEED_LENGTH: usize = 6;

/// Required permission bits for the configuration file.
const REQUIRED_MODE: u32 = 0o600;

/// Enumerates configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is readable by more than its owner.
    #[error("config file mode {mode:03o} is too permissive, expected 0600")]
    TooPermissive {
        /// Observed permission bits.
        mode: u32,
    },
    /// The file is not valid JSON for the expected schema.
    #[error("config file could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    /// No entry exists for the authenticating user.
    #[error("user is not configured")]
    UnknownUser,
    /// The user's entry has no passphrase and no default supplies one.
    #[error("no passphrase configured")]
    MissingPassphrase,
}

#[derive(Debug, Default, Deserialize)]
struct RawDefaults {
    #[serde(default)]
    maxseq: u32,
    #[serde(default)]
    passphrase: String,
    #[serde(default)]
    retries: u32,
    #[serde(default)]
    seedlen: usize,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    name: String,
    #[serde(default)]
    maxseq: u32,
    #[serde(default)]
    passphrase: String,
    #[serde(default)]
    retries: u32,
    #[serde(default)]
    seedlen: usize,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    defaults: RawDefaults,
    #[serde(default)]
    users: Vec<RawUser>,
}

/// Fully resolved per-user settings. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserConfig {
    /// Account name the entry was resolved for.
    pub name: String,
    /// Upper bound for generated sequence numbers.
    pub max_sequence: u32,
    /// The user's secret passphrase.
    pub passphrase: String,
    /// Number of prompt attempts per authentication.
    pub retries: u32,
    /// Generated seed length in characters.
    pub seed_length: usize,
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
            .field("name", &self.name)
            .field("max_sequence", &self.max_sequence)
            .field("passphrase", &"[REDACTED]")
            .field("retries", &self.retries)
            .field("seed_length", &self.seed_length)
            .finish()
    }
}

fn pick(user_value: u32, default_value: u32, hardcoded: u32) -> u32 {
    if user_value > 0 {
        user_value
    } else if default_value > 0 {
        default_value
    } else {
        hardcoded
    }
}

/// Resolves `user` against already-loaded configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`], [`ConfigError::UnknownUser`], or
/// [`ConfigError::MissingPassphrase`].
pub fn user_config_from_str(user: &str, text: &str) -> Result<UserConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(text)?;

    let entry = raw
        .users
        .iter()
        .find(|u| u.name == user)
        .ok_or(ConfigError::UnknownUser)?;

    let passphrase = if !entry.passphrase.is_empty() {
        entry.passphrase.clone()
    } else if !raw.defaults.passphrase.is_empty() {
        raw.defaults.passphrase.clone()
    } else {
        return Err(ConfigError::MissingPassphrase);
    };

    Ok(UserConfig {
        name: entry.name.clone(),
        max_sequence: pick(entry.maxseq, raw.defaults.maxseq, DEFAULT_MAX_SEQUENCE),
        passphrase,
        retries: pick(entry.retries, raw.defaults.retries, DEFAULT_RETRIES),
        seed_length: pick(
            entry.seedlen as u32,
            raw.defaults.seedlen as u32,
            DEFAULT_SEED_LENGTH as u32,
        ) as usize,
    })
}

/// Loads and resolves `user` from the configuration file at `path`.
///
/// The file must exist, be regular-readable, and carry mode 0600.
///
/// # Errors
///
/// Any [`ConfigError`] variant. Failures are also logged, since in the
/// PAM context the error often surfaces only as a status code.
pub fn load_user_config(user: &str, path: &Path) -> Result<UserConfig, ConfigError> {
    let metadata = fs::metadata(path).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "could not access config file");
    })?;

    let mode = metadata.permissions().mode() & 0o777;
    if mode != REQUIRED_MODE {
        warn!(path = %path.display(), mode = format!("{mode:03o}"), "config file attributes too permissive");
        return Err(ConfigError::TooPermissive { mode });
    }

    let text = fs::read_to_string(path).inspect_err(|e| {
        warn!(path = %path.display(), error = %e, "could not read config file");
    })?;

    user_config_from_str(user, &text).inspect_err(|e| {
        warn!(path = %path.display(), user, error = %e, "could not resolve user config");
    })
}
