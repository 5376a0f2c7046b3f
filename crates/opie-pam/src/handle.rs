// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use std::ffi::{c_char, c_int, c_void, CStr};
use std::ptr;

use opie_conv::raw::{PamConv, PAM_SUCCESS};

/// `pam_get_item` selector for the conversation structure.
const PAM_CONV: c_int = 5;

/// Opaque `pam_handle_t`.
#[repr(C)]
pub struct PamHandleRaw {
    _private: [u8; 0],
}

// Provided by the libpam already loaded into the hosting application;
// deliberately not linked at build time.
extern "C" {
    fn pam_get_user(
        pamh: *mut PamHandleRaw,
        user: *mut *const c_char,
        prompt: *const c_char,
    ) -> c_int;
    fn pam_get_item(
        pamh: *mut PamHandleRaw,
        item_type: c_int,
        item: *mut *const c_void,
    ) -> c_int;
}

/// Safe accessors over a `pam_handle_t` received from libpam.
pub struct PamHandle {
    raw: *mut PamHandleRaw,
}

impl PamHandle {
    /// Wraps a handle pointer, rejecting null.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must be the live handle libpam passed to the
    /// current service-module entry point.
    pub unsafe fn new(raw: *mut PamHandleRaw) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self { raw })
        }
    }

    /// Returns the authenticating user's name, if libpam can determine
    /// one. The empty name counts as undetermined.
    pub fn user(&self) -> Option<String> {
        let mut out: *const c_char = ptr::null();
        // SAFETY: handle validity is guaranteed by `new`; libpam owns
        // the returned string, which we copy before returning.
        let status = unsafe { pam_get_user(self.raw, &mut out, ptr::null()) };
        if status != PAM_SUCCESS || out.is_null() {
            return None;
        }
        let user = unsafe { CStr::from_ptr(out) }.to_string_lossy().into_owned();
        if user.is_empty() {
            None
        } else {
            Some(user)
        }
    }

    /// Returns the application's conversation structure, if one is
    /// configured.
    pub fn conversation(&self) -> Option<&PamConv> {
        let mut item: *const c_void = ptr::null();
        // SAFETY: handle validity is guaranteed by `new`. The PAM_CONV
        // item is owned by libpam and lives at least as long as the
        // handle, which outlives `self`.
        let status = unsafe { pam_get_item(self.raw, PAM_CONV, &mut item) };
        if status != PAM_SUCCESS || item.is_null() {
            return None;
        }
        Some(unsafe { &*(item as *const PamConv) })
    }
}
