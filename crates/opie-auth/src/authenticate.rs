// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use opie_conv::{ConvError, Conversation};
use opie_core::types::OtpError;
use opie_core::{challenge, otp, response};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{self, ConfigError};
use crate::params::ModuleArgs;

/// Enumerates authentication outcomes other than success.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The `config=` module argument is missing.
    #[error("config file parameter not found")]
    MissingConfigParameter,
    /// No usable credentials exist for this user: unknown user, missing
    /// passphrase, or an unusable configuration file.
    #[error("credentials unavailable: {0}")]
    CredentialsUnavailable(#[source] ConfigError),
    /// The configured challenge parameters are unusable.
    #[error("could not build challenge: {0}")]
    Challenge(#[from] OtpError),
    /// Every round of conversation failed before a response was seen.
    #[error("conversation failed: {0}")]
    Conversation(#[from] ConvError),
    /// A response was obtained but no attempt verified.
    #[error("one-time password verification failed")]
    VerificationFailed,
}

/// Runs one OPIE authentication: challenge, prompt, verify.
///
/// A single challenge is generated and kept for all `retries` rounds,
/// so a mistyped response can be corrected against the same sequence
/// and seed. Responses are accepted in six-word or hex form and
/// compared in constant time against the computed key.
///
/// # Errors
///
/// [`AuthError::CredentialsUnavailable`] when the user has no usable
/// configuration (the PAM layer maps this to `PAM_CRED_UNAVAIL`);
/// other variants map to `PAM_AUTH_ERR`.
pub fn authenticate(
    conversation: &mut dyn Conversation,
    user: &str,
    args: &ModuleArgs,
) -> Result<(), AuthError> {
    let path = args.config_path.as_deref().ok_or_else(|| {
        warn!("config file parameter not found");
        AuthError::MissingConfigParameter
    })?;

    let cfg = config::load_user_config(user, path).map_err(AuthError::CredentialsUnavailable)?;

    let mut rng = rand::thread_rng();
    let chal = challenge::generate(cfg.max_sequence, cfg.seed_length, &mut rng)?;
    let expected = otp::compute(&cfg.passphrase, &chal.seed, chal.sequence)?;
    let prompt = chal.prompt();

    let mut saw_response = false;
    let mut last_conv_err = None;

    for attempt in 1..=cfg.retries {
        let reply = match conversation.prompt_echo_off(&prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(user, attempt, error = %e, "conversation round failed");
                last_conv_err = Some(e);
                continue;
            }
        };
        saw_response = true;

        match response::parse(reply.as_str()) {
            Ok(key) if key == expected => {
                info!(user, sequence = chal.sequence, "one-time password accepted");
                return Ok(());
            }
            Ok(_) => {
                debug!(user, attempt, "response did not verify");
            }
            Err(e) => {
                debug!(user, attempt, error = %e, "response not decodable");
            }
        }
    }

    match last_conv_err {
        Some(e) if !saw_response => Err(AuthError::Conversation(e)),
        _ => {
            info!(user, "one-time password verification failed");
            Err(AuthError::VerificationFailed)
        }
    }
}
