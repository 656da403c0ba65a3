#![forbid(unsafe_code)]

//! Session error type.

use std::fmt;

/// Errors raised while routing frames or driving the transport.
#[derive(Debug)]
pub enum ShellError {
    /// A display frame looked like JSON but did not parse.
    Json(serde_json::Error),
    /// An `:upload:` control frame carried a malformed directive.
    Directive(serde_json::Error),
    /// A send was attempted with no open transport.
    NotConnected,
    /// The transport reported a failure.
    Transport(String),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed json frame: {err}"),
            Self::Directive(err) => write!(f, "malformed upload directive: {err}"),
            Self::NotConnected => write!(f, "socket not connected"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) | Self::Directive(err) => Some(err),
            Self::NotConnected | Self::Transport(_) => None,
        }
    }
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, ShellError>;
