// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! `pam_opie.so` — the PAM service module.
//!
//! Exposes the `pam_sm_authenticate`/`pam_sm_setcred` entry points and
//! wires libpam's conversation into the policy layer:
//!
//! ```text
//! auth required pam_opie.so config=/etc/opie.json [debug]
//! ```
//!
//! This crate is the only one that touches the `pam_handle_t`; all
//! policy lives in `opie-auth` and all FFI conversation plumbing in
//! `opie-conv`, both of which are testable without libpam.

use std::ffi::{c_char, c_int, CStr};

use opie_auth::{authenticate, AuthError, ModuleArgs};
use opie_conv::raw::PAM_SUCCESS;
use opie_conv::PamConversation;
use tracing::{debug, info, warn};

mod handle;
mod log;

use handle::{PamHandle, PamHandleRaw};

/// Authentication failure unrelated to credential availability.
const PAM_AUTH_ERR: c_int = 7;
/// The module cannot retrieve credentials for this user.
const PAM_CRED_UNAVAIL: c_int = 15;

/// Copies the module argument vector out of C memory.
///
/// # Safety
///
/// `argv` must point to `argc` valid NUL-terminated strings, or be null
/// with `argc == 0`.
unsafe fn collect_args(argc: c_int, argv: *const *const c_char) -> Vec<String> {
    if argv.is_null() || argc <= 0 {
        return Vec::new();
    }
    let mut args = Vec::with_capacity(argc as usize);
    for i in 0..argc as usize {
        let ptr = *argv.add(i);
        if !ptr.is_null() {
            args.push(CStr::from_ptr(ptr).to_string_lossy().into_owned());
        }
    }
    args
}

/// PAM authentication entry point.
///
/// # Safety
///
/// Called by libpam with a live handle and the argument vector from the
/// module's configuration line.
#[no_mangle]
pub unsafe extern "C" fn pam_sm_authenticate(
    pamh: *mut PamHandleRaw,
    _flags: c_int,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    let args = ModuleArgs::parse(collect_args(argc, argv));
    log::init(args.debug);

    let Some(handle) = PamHandle::new(pamh) else {
        warn!("called with a null pam handle");
        return PAM_AUTH_ERR;
    };
    let Some(user) = handle.user() else {
        warn!("unable to determine the authenticating user");
        return PAM_AUTH_ERR;
    };
    let Some(conv) = handle.conversation() else {
        warn!(user = %user, "application provided no conversation");
        return PAM_AUTH_ERR;
    };
    if conv.conv.is_none() {
        warn!(user = %user, "application conversation has no callback");
        return PAM_AUTH_ERR;
    }
    let mut conversation = PamConversation::new(conv);

    match authenticate(&mut conversation, &user, &args) {
        Ok(()) => {
            info!(user = %user, "authentication succeeded");
            PAM_SUCCESS
        }
        Err(err @ AuthError::CredentialsUnavailable(_)) => {
            warn!(user = %user, error = %err, "credentials unavailable");
            PAM_CRED_UNAVAIL
        }
        Err(err) => {
            info!(user = %user, error = %err, "authentication failed");
            PAM_AUTH_ERR
        }
    }
}

/// Credential-establishment entry point. One-time passwords carry no
/// credentials to establish, so this always succeeds.
#[no_mangle]
pub unsafe extern "C" fn pam_sm_setcred(
    _pamh: *mut PamHandleRaw,
    _flags: c_int,
    _argc: c_int,
    _argv: *const *const c_char,
) -> c_int {
    debug!("setcred is a no-op for one-time passwords");
    PAM_SUCCESS
}
