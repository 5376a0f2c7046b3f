// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

//! PAM conversation layer for the pam-opie module.
//!
//! PAM modules talk to the user through a callback the application
//! installs (`struct pam_conv`). This crate holds both views of that
//! mechanism: [`raw`] declares the C structures and the single-message
//! bridge that drives the callback directly, and [`Conversation`] is
//! the injected trait the authentication flow programs against, with
//! failure explicit in the result instead of encoded as an empty
//! string.

/// Prompt/reply types and the `Conversation` trait.
mod conversation;
/// The raw conversation ABI and the single-message bridge.
pub mod raw;

pub use conversation::{ConvError, Conversation, Prompt, PromptStyle, Reply};
pub use raw::PamConversation;
