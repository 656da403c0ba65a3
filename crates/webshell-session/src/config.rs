#![forbid(unsafe_code)]

//! Shell configuration.
//!
//! The page hands `WebShell::new` a JSON options object; every field is
//! optional and falls back to [`ShellConfig::default`].

use serde::Deserialize;

/// Default multipart field name for uploads.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// Default indent width for text materialization.
pub const DEFAULT_TREE_INDENT: usize = 2;

/// Configuration for one console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Path suffix appended to the page path to form the socket address.
    pub console_target: String,
    /// Maximum retained output entries (`None` = unbounded).
    pub output_limit: Option<usize>,
    /// Multipart field name used when a directive does not name one.
    pub upload_field: String,
    /// Indent width for plain-text tree output.
    pub tree_indent: usize,
    /// Optional `tracing` filter directive.
    pub log_filter: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            console_target: String::new(),
            output_limit: None,
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            tree_indent: DEFAULT_TREE_INDENT,
            log_filter: None,
        }
    }
}

impl ShellConfig {
    /// Parse a JSON options object. `null` or an empty string yields defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let trimmed = json.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }
        serde_json::from_str(trimmed)
    }

    /// Set the socket path suffix.
    #[must_use]
    pub fn with_console_target(mut self, target: impl Into<String>) -> Self {
        self.console_target = target.into();
        self
    }

    /// Set the output entry limit.
    #[must_use]
    pub fn with_output_limit(mut self, limit: Option<usize>) -> Self {
        self.output_limit = limit;
        self
    }

    /// Set the default upload field name.
    #[must_use]
    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    /// Set the text indent width.
    #[must_use]
    pub fn with_tree_indent(mut self, indent: usize) -> Self {
        self.tree_indent = indent;
        self
    }

    /// Install the native `tracing` subscriber using [`log_filter`](Self::log_filter),
    /// falling back to `WEBSHELL_LOG` and then `info`.
    ///
    /// Returns `false` if a subscriber was already installed.
    #[cfg(feature = "tracing-json")]
    pub fn init_logging(&self, format: webshell_core::logging::LogFormat) -> bool {
        webshell_core::logging::init_subscriber(self.log_filter.as_deref(), format)
    }

    /// Set the tracing filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.console_target, "");
        assert_eq!(config.output_limit, None);
        assert_eq!(config.upload_field, "file");
        assert_eq!(config.tree_indent, 2);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = ShellConfig::from_json(r#"{"console_target": "/shell", "output_limit": 50}"#)
            .unwrap();
        assert_eq!(config.console_target, "/shell");
        assert_eq!(config.output_limit, Some(50));
        assert_eq!(config.upload_field, "file");
    }

    #[test]
    fn null_and_blank_are_defaults() {
        assert_eq!(ShellConfig::from_json("null").unwrap(), ShellConfig::default());
        assert_eq!(ShellConfig::from_json("  ").unwrap(), ShellConfig::default());
    }

    #[test]
    fn bad_json_is_error() {
        assert!(ShellConfig::from_json(r#"{"tree_indent": "wide"}"#).is_err());
    }

    #[test]
    fn builders() {
        let config = ShellConfig::default()
            .with_console_target("/c")
            .with_output_limit(Some(3))
            .with_upload_field("doc")
            .with_tree_indent(4)
            .with_log_filter("debug");
        assert_eq!(config.console_target, "/c");
        assert_eq!(config.output_limit, Some(3));
        assert_eq!(config.upload_field, "doc");
        assert_eq!(config.tree_indent, 4);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }
}
