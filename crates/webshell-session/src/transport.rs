#![forbid(unsafe_code)]

//! Transport seam.
//!
//! The browser adapter implements [`Transport`] over a `WebSocket`. Inbound
//! frames do not flow through the trait: the host calls
//! [`Session::on_message`](crate::session::Session::on_message) from its own
//! message callback.

use crate::error::{Result, ShellError};

/// Outbound half of a duplex text channel.
pub trait Transport {
    /// Send one text frame.
    fn send_text(&mut self, text: &str) -> Result<()>;

    /// Start closing the channel. The host reports completion through
    /// [`Session::on_close`](crate::session::Session::on_close).
    fn close(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_text(&mut self, text: &str) -> Result<()> {
        (**self).send_text(text)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// In-memory transport that records outbound frames.
///
/// Used by native hosts and tests in place of a socket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTransport {
    sent: Vec<String>,
    closed: bool,
}

impl MemoryTransport {
    /// Create an open transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Whether `close` was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for MemoryTransport {
    fn send_text(&mut self, text: &str) -> Result<()> {
        if self.closed {
            return Err(ShellError::Transport("send after close".into()));
        }
        self.sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
