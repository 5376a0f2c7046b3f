// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! Exercises the raw conversation bridge against recording mock callbacks.

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::mem;
use std::ptr;

use opie_conv::raw::{
    self, PamConv, PamMessage, PamResponse, PAM_PROMPT_ECHO_OFF, PAM_PROMPT_ECHO_ON, PAM_SUCCESS,
    PAM_TEXT_INFO,
};
use opie_conv::{ConvError, Conversation, PamConversation};

/// What a mock callback observed, written through `appdata_ptr`.
#[derive(Default)]
struct Recorder {
    calls: usize,
    num_msg: c_int,
    style: c_int,
    msg: String,
    answer: Option<String>,
}

unsafe fn alloc_response(text: Option<&str>) -> *mut PamResponse {
    let arr = libc::calloc(1, mem::size_of::<PamResponse>()) as *mut PamResponse;
    if let Some(text) = text {
        let owned = CString::new(text).unwrap();
        (*arr).resp = libc::strdup(owned.as_ptr());
    }
    arr
}

/// Records the request, then succeeds with the answer stored in the recorder.
unsafe extern "C" fn answering_conv(
    num_msg: c_int,
    msg: *const *const PamMessage,
    resp: *mut *mut PamResponse,
    appdata_ptr: *mut c_void,
) -> c_int {
    let rec = &mut *(appdata_ptr as *mut Recorder);
    rec.calls += 1;
    rec.num_msg = num_msg;

    let first = *msg;
    rec.style = (*first).msg_style;
    rec.msg = CStr::from_ptr((*first).msg).to_string_lossy().into_owned();

    *resp = alloc_response(rec.answer.as_deref());
    PAM_SUCCESS
}

/// Always fails without producing a response array.
unsafe extern "C" fn refusing_conv(
    _num_msg: c_int,
    _msg: *const *const PamMessage,
    _resp: *mut *mut PamResponse,
    _appdata_ptr: *mut c_void,
) -> c_int {
    19 // PAM_CONV_ERR
}

fn conv_over(recorder: &mut Recorder) -> PamConv {
    PamConv {
        conv: Some(answering_conv),
        appdata_ptr: recorder as *mut Recorder as *mut c_void,
    }
}

fn take_string(raw: *mut c_char) -> String {
    assert!(!raw.is_null());
    unsafe {
        let text = CStr::from_ptr(raw).to_string_lossy().into_owned();
        libc::free(raw as *mut c_void);
        text
    }
}

#[test]
fn successful_callback_yields_answer_for_any_style() {
    for style in [PAM_PROMPT_ECHO_OFF, PAM_PROMPT_ECHO_ON, PAM_TEXT_INFO] {
        let mut rec = Recorder {
            answer: Some("secret123".into()),
            ..Recorder::default()
        };
        let conv = conv_over(&mut rec);
        let message = CString::new("Password: ").unwrap();

        let raw = unsafe { raw::get_challenge_response(&conv, style, &message) };
        assert_eq!(take_string(raw), "secret123");
    }
}

#[test]
fn failing_callback_yields_null_and_empty_string() {
    let conv = PamConv {
        conv: Some(refusing_conv),
        appdata_ptr: ptr::null_mut(),
    };
    let message = CString::new("Password: ").unwrap();

    let raw = unsafe { raw::get_challenge_response(&conv, PAM_PROMPT_ECHO_OFF, &message) };
    assert!(raw.is_null());

    let text =
        unsafe { raw::challenge_response_string(&conv, PAM_PROMPT_ECHO_OFF, &message) };
    assert_eq!(text, "");
}

#[test]
fn bridge_passes_exactly_one_message_with_caller_arguments() {
    let mut rec = Recorder {
        answer: Some("ok".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let message = CString::new("otp-md5 99 ke1235 ext\nPassword: ").unwrap();

    let raw = unsafe { raw::get_challenge_response(&conv, PAM_PROMPT_ECHO_OFF, &message) };
    take_string(raw);

    assert_eq!(rec.calls, 1);
    assert_eq!(rec.num_msg, 1);
    assert_eq!(rec.style, PAM_PROMPT_ECHO_OFF);
    assert_eq!(rec.msg, "otp-md5 99 ke1235 ext\nPassword: ");
}

#[test]
fn appdata_pointer_passes_through_unmodified() {
    // The callback mutates state reachable only through appdata_ptr;
    // observing the mutation proves the pointer arrived unchanged.
    let mut rec = Recorder {
        answer: Some("x".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let message = CString::new("?").unwrap();

    let raw = unsafe { raw::get_challenge_response(&conv, PAM_PROMPT_ECHO_ON, &message) };
    take_string(raw);
    assert_eq!(rec.calls, 1);
}

#[test]
fn empty_message_is_forwarded_verbatim() {
    let mut rec = Recorder {
        answer: Some("y".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let message = CString::new("").unwrap();

    let raw = unsafe { raw::get_challenge_response(&conv, PAM_PROMPT_ECHO_OFF, &message) };
    take_string(raw);
    assert_eq!(rec.msg, "");
}

#[test]
fn legacy_string_cannot_distinguish_empty_answer_from_failure() {
    // Expected current behavior, not a bug: the legacy contract maps
    // both a refusal and a successful empty answer to "".
    let mut rec = Recorder {
        answer: Some("".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let message = CString::new("Password: ").unwrap();

    let from_success =
        unsafe { raw::challenge_response_string(&conv, PAM_PROMPT_ECHO_OFF, &message) };

    let refusing = PamConv {
        conv: Some(refusing_conv),
        appdata_ptr: ptr::null_mut(),
    };
    let from_failure =
        unsafe { raw::challenge_response_string(&refusing, PAM_PROMPT_ECHO_OFF, &message) };

    assert_eq!(from_success, from_failure);
}

#[test]
fn null_handle_and_null_callback_fail_cleanly() {
    let message = CString::new("?").unwrap();
    let raw = unsafe { raw::get_challenge_response(ptr::null(), PAM_PROMPT_ECHO_OFF, &message) };
    assert!(raw.is_null());

    let no_callback = PamConv {
        conv: None,
        appdata_ptr: ptr::null_mut(),
    };
    let raw =
        unsafe { raw::get_challenge_response(&no_callback, PAM_PROMPT_ECHO_OFF, &message) };
    assert!(raw.is_null());
}

#[test]
fn trait_wrapper_distinguishes_empty_answer_from_failure() {
    let mut rec = Recorder {
        answer: Some("".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let mut wrapper = unsafe { PamConversation::new(&conv) };
    let reply = wrapper.prompt_echo_off("Password: ").unwrap();
    assert!(reply.is_empty());

    let refusing = PamConv {
        conv: Some(refusing_conv),
        appdata_ptr: ptr::null_mut(),
    };
    let mut wrapper = unsafe { PamConversation::new(&refusing) };
    assert_eq!(
        wrapper.prompt_echo_off("Password: ").unwrap_err(),
        ConvError::Failed
    );
}

#[test]
fn trait_wrapper_collects_input_replies_only() {
    let mut rec = Recorder {
        answer: Some("the answer".into()),
        ..Recorder::default()
    };
    let conv = conv_over(&mut rec);
    let mut wrapper = unsafe { PamConversation::new(&conv) };

    wrapper.info("challenge follows").unwrap();
    let reply = wrapper.prompt_echo_off("Password: ").unwrap();
    assert_eq!(reply.as_str(), "the answer");
    assert_eq!(rec.calls, 2);
}

#[test]
fn trait_wrapper_rejects_interior_nul() {
    let mut rec = Recorder::default();
    let conv = conv_over(&mut rec);
    let mut wrapper = unsafe { PamConversation::new(&conv) };
    assert_eq!(
        wrapper.prompt_echo_off("bad\0prompt").unwrap_err(),
        ConvError::InvalidPrompt
    );
}
