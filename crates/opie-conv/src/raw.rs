// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! The raw PAM conversation ABI and the single-message bridge.
//!
//! PAM hands modules a `pam_conv`: a callback plus an opaque
//! application-data pointer. The callback takes an array of message
//! pointers and fills in an array of responses. This module declares
//! those C structures and provides the bridge that wraps one message in
//! the pointer-array form the callback expects; the array shape exists
//! only at the call site, never in the rest of the crate.

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::ptr;

use crate::conversation::{ConvError, Conversation, Prompt, Reply};

/// Status code for a successful PAM operation.
pub const PAM_SUCCESS: c_int = 0;
/// Message style: input prompt with echo suppressed.
pub const PAM_PROMPT_ECHO_OFF: c_int = 1;
/// Message style: input prompt with visible echo.
pub const PAM_PROMPT_ECHO_ON: c_int = 2;
/// Message style: error text, no input.
pub const PAM_ERROR_MSG: c_int = 3;
/// Message style: informational text, no input.
pub const PAM_TEXT_INFO: c_int = 4;

/// The conversation callback signature defined by `<security/pam_appl.h>`.
pub type ConvCallback = unsafe extern "C" fn(
    num_msg: c_int,
    msg: *const *const PamMessage,
    resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int;

/// `struct pam_message`: one request to the application.
#[repr(C)]
pub struct PamMessage {
    /// One of the `PAM_PROMPT_*` / `PAM_ERROR_MSG` / `PAM_TEXT_INFO` codes.
    pub msg_style: c_int,
    /// NUL-terminated prompt text.
    pub msg: *const c_char,
}

/// `struct pam_response`: one answer from the application.
///
/// `resp` is allocated by the application with `malloc` and owned by the
/// module once the callback returns.
#[repr(C)]
pub struct PamResponse {
    /// NUL-terminated answer text, or null.
    pub resp: *mut c_char,
    /// Unused by Linux-PAM; zero by convention.
    pub resp_retcode: c_int,
}

/// `struct pam_conv`: the conversation handle supplied by the application.
#[repr(C)]
pub struct PamConv {
    /// The conversation callback, or null if none is configured.
    pub conv: Option<ConvCallback>,
    /// Opaque application data, passed through to the callback unchanged.
    pub appdata_ptr: *mut c_void,
}

/// Asks the application one question and returns the raw answer.
///
/// Builds a single-element message array, wraps it in the pointer-array
/// form the callback requires, and invokes the callback synchronously.
/// On `PAM_SUCCESS` the text of the first (only) response is returned
/// and ownership of that allocation transfers to the caller, who must
/// release it with `free(3)`. The response array itself is released
/// here. On any failure the result is null.
///
/// The call blocks for as long as the callback blocks; no timeout is
/// imposed.
///
/// # Safety
///
/// `conv` must be null or point to a valid `pam_conv` whose callback
/// and application data live for the duration of the call.
pub unsafe fn get_challenge_response(
    conv: *const PamConv,
    style: c_int,
    message: &CStr,
) -> *mut c_char {
    if conv.is_null() {
        return ptr::null_mut();
    }
    let Some(callback) = (*conv).conv else {
        return ptr::null_mut();
    };

    let msg = PamMessage {
        msg_style: style,
        msg: message.as_ptr(),
    };
    let msg_ptrs: [*const PamMessage; 1] = [&msg];
    let mut resp: *mut PamResponse = ptr::null_mut();

    let status = callback(1, msg_ptrs.as_ptr(), &mut resp, (*conv).appdata_ptr);
    if status != PAM_SUCCESS || resp.is_null() {
        return ptr::null_mut();
    }

    let text = (*resp).resp;
    libc::free(resp as *mut c_void);
    text
}

/// Legacy form of [`get_challenge_response`]: answer text on success,
/// empty string on any failure.
///
/// A successful conversation whose answer is empty is indistinguishable
/// from a failed one here; callers that need the distinction use the
/// [`Conversation`] trait instead.
///
/// # Safety
///
/// Same contract as [`get_challenge_response`].
pub unsafe fn challenge_response_string(
    conv: *const PamConv,
    style: c_int,
    message: &CStr,
) -> String {
    let raw = get_challenge_response(conv, style, message);
    if raw.is_null() {
        return String::new();
    }
    let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
    libc::free(raw as *mut c_void);
    text
}

/// [`Conversation`] implementation over an application-supplied `pam_conv`.
pub struct PamConversation<'a> {
    conv: &'a PamConv,
}

impl<'a> PamConversation<'a> {
    /// Wraps a conversation handle.
    ///
    /// # Safety
    ///
    /// The handle's callback and application data must remain valid for
    /// the lifetime of the wrapper.
    pub unsafe fn new(conv: &'a PamConv) -> Self {
        Self { conv }
    }
}

impl Conversation for PamConversation<'_> {
    fn converse(&mut self, prompts: &[Prompt]) -> Result<Vec<Reply>, ConvError> {
        let mut replies = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let text =
                CString::new(prompt.text.as_str()).map_err(|_| ConvError::InvalidPrompt)?;
            // SAFETY: validity of the handle is guaranteed by `new`.
            let raw =
                unsafe { get_challenge_response(self.conv, prompt.style.to_raw(), &text) };

            if prompt.style.expects_input() {
                if raw.is_null() {
                    return Err(ConvError::Failed);
                }
                // SAFETY: non-null results point to a NUL-terminated
                // string owned by us.
                let reply = unsafe {
                    let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
                    libc::free(raw as *mut c_void);
                    Reply::new(text)
                };
                replies.push(reply);
            } else if !raw.is_null() {
                // Display-only round; any stray answer is discarded.
                // SAFETY: non-null results are owned allocations.
                unsafe { libc::free(raw as *mut c_void) };
            }
        }
        Ok(replies)
    }
}
