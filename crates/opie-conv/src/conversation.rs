// Copyright (c) 2026 pam-opie contributors
// OPIE One-Time Password PAM Module
// Licensed under the MIT License

use std::ffi::c_int;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::raw;

/// How a prompt should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Input prompt with echo suppressed (passwords).
    EchoOff,
    /// Input prompt with visible echo.
    EchoOn,
    /// Error text, no input expected.
    ErrorMsg,
    /// Informational text, no input expected.
    TextInfo,
}

impl PromptStyle {
    /// Returns the PAM message style code for this variant.
    pub fn to_raw(self) -> c_int {
        match self {
            PromptStyle::EchoOff => raw::PAM_PROMPT_ECHO_OFF,
            PromptStyle::EchoOn => raw::PAM_PROMPT_ECHO_ON,
            PromptStyle::ErrorMsg => raw::PAM_ERROR_MSG,
            PromptStyle::TextInfo => raw::PAM_TEXT_INFO,
        }
    }

    /// Maps a PAM message style code back to a variant.
    pub fn from_raw(code: c_int) -> Option<Self> {
        match code {
            raw::PAM_PROMPT_ECHO_OFF => Some(PromptStyle::EchoOff),
            raw::PAM_PROMPT_ECHO_ON => Some(PromptStyle::EchoOn),
            raw::PAM_ERROR_MSG => Some(PromptStyle::ErrorMsg),
            raw::PAM_TEXT_INFO => Some(PromptStyle::TextInfo),
            _ => None,
        }
    }

    /// Returns `true` if this style solicits input from the user.
    pub fn expects_input(self) -> bool {
        matches!(self, PromptStyle::EchoOff | PromptStyle::EchoOn)
    }
}

/// One message presented through the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Presentation style.
    pub style: PromptStyle,
    /// Message text. Forwarded verbatim, including when empty.
    pub text: String,
}

impl Prompt {
    /// Creates a prompt with an explicit style.
    pub fn new(style: PromptStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    /// Hidden-input prompt.
    pub fn echo_off(text: impl Into<String>) -> Self {
        Self::new(PromptStyle::EchoOff, text)
    }

    /// Visible-input prompt.
    pub fn echo_on(text: impl Into<String>) -> Self {
        Self::new(PromptStyle::EchoOn, text)
    }

    /// Informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(PromptStyle::TextInfo, text)
    }

    /// Error message.
    pub fn error_msg(text: impl Into<String>) -> Self {
        Self::new(PromptStyle::ErrorMsg, text)
    }
}

/// Text entered by the user in answer to a prompt.
///
/// Replies are frequently passwords, so the buffer is zeroized on drop
/// and the `Debug` implementation redacts the contents.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Reply(String);

impl Reply {
    /// Wraps reply text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the reply text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the user entered nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reply([REDACTED; {}])", self.0.len())
    }
}

/// Enumerates conversation failures.
///
/// A failed conversation is distinct from a successful one that yielded
/// an empty answer; the latter is `Ok` with an empty [`Reply`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConvError {
    /// The callback reported a non-success status or produced no
    /// response for an input prompt.
    #[error("conversation callback failed")]
    Failed,
    /// The callback succeeded but returned fewer replies than prompts.
    #[error("conversation produced no reply")]
    MissingReply,
    /// A prompt contains an interior NUL byte and cannot cross the
    /// C boundary.
    #[error("prompt text contains an interior NUL byte")]
    InvalidPrompt,
}

/// An externally supplied capability for one round of prompt-in /
/// answer-out exchange.
///
/// Implementations must not impose a timeout of their own; a blocking
/// conversation (for example, one waiting on terminal input) blocks the
/// caller for as long as the underlying mechanism does.
pub trait Conversation {
    /// Presents `prompts` and collects the replies to those that expect
    /// input. Informational and error prompts yield no reply entry.
    fn converse(&mut self, prompts: &[Prompt]) -> Result<Vec<Reply>, ConvError>;

    /// Asks a single hidden-input question.
    fn prompt_echo_off(&mut self, text: &str) -> Result<Reply, ConvError> {
        let mut replies = self.converse(&[Prompt::echo_off(text)])?;
        if replies.is_empty() {
            return Err(ConvError::MissingReply);
        }
        Ok(replies.swap_remove(0))
    }

    /// Asks a single visible-input question.
    fn prompt_echo_on(&mut self, text: &str) -> Result<Reply, ConvError> {
        let mut replies = self.converse(&[Prompt::echo_on(text)])?;
        if replies.is_empty() {
            return Err(ConvError::MissingReply);
        }
        Ok(replies.swap_remove(0))
    }

    /// Shows an informational message.
    fn info(&mut self, text: &str) -> Result<(), ConvError> {
        self.converse(&[Prompt::info(text)]).map(|_| ())
    }

    /// Shows an error message.
    fn error_msg(&mut self, text: &str) -> Result<(), ConvError> {
        self.converse(&[Prompt::error_msg(text)]).map(|_| ())
    }
}
