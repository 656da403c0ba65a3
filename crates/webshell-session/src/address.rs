#![forbid(unsafe_code)]

//! Socket address derivation from the page location.

/// The parts of `window.location` the console cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLocation {
    /// Scheme including the colon, e.g. `https:`.
    pub protocol: String,
    /// Host with optional port.
    pub host: String,
    /// Path component, starting with `/`.
    pub pathname: String,
}

impl PageLocation {
    /// Build a location from its parts.
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        pathname: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            pathname: pathname.into(),
        }
    }

    /// Whether the page was served over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.protocol == "https:"
    }

    /// Socket address: `wss:` on `https:` pages, `ws:` otherwise, then
    /// `//host`, the page path, and `target`.
    #[must_use]
    pub fn socket_address(&self, target: &str) -> String {
        let scheme = if self.is_secure() { "wss:" } else { "ws:" };
        format!("{scheme}//{}{}{target}", self.host, self.pathname)
    }
}
