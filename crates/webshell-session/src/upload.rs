#![forbid(unsafe_code)]

//! Server-triggered file upload.
//!
//! The server sends `:upload:<directive>`; the page opens its file picker and,
//! once a file is chosen, posts it as multipart form data. While the request
//! is in flight a status entry sits at the top of the output pane showing
//! progress. It is removed when the request finishes, and the response is
//! pushed in its place.

use serde::Deserialize;
use webshell_widgets::output::{EntryId, OutputEntry, OutputPane, Pushed};

use crate::error::Result;
use crate::frame;

/// Status text shown when an upload starts.
pub const UPLOAD_STARTED: &str = "Upload started";

/// Directive carried by an `:upload:` control frame.
///
/// Both fields are optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadDirective {
    /// Target URL.
    pub url: Option<String>,
    /// Multipart field name.
    #[serde(alias = "name")]
    pub field: Option<String>,
}

impl UploadDirective {
    /// Fill in defaults: the page path for the URL and `default_field` for
    /// the field name. Blank values count as missing.
    #[must_use]
    pub fn resolve(&self, page_path: &str, default_field: &str) -> UploadRequest {
        fn pick(value: Option<&str>, fallback: &str) -> String {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        }
        UploadRequest {
            url: pick(self.url.as_deref(), page_path),
            field: pick(self.field.as_deref(), default_field),
        }
    }
}

/// A resolved upload target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// POST target.
    pub url: String,
    /// Multipart field name for the file.
    pub field: String,
}

/// An in-flight upload and its status entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    status: EntryId,
    request: UploadRequest,
}

/// How an upload ended.
#[derive(Debug)]
pub struct UploadOutcome {
    /// The removed status entry.
    pub removed: EntryId,
    /// HTTP status reported by the host (0 for a network error).
    pub status: u16,
    /// The entry pushed for the response, or why nothing was pushed.
    pub pushed: Result<Pushed>,
}

impl UploadOutcome {
    /// Whether the server accepted the upload.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl Upload {
    /// Push the status entry and start tracking the upload.
    pub fn begin(pane: &mut OutputPane, request: UploadRequest) -> (Self, Pushed) {
        let pushed = pane.push(OutputEntry::Status(UPLOAD_STARTED.to_string()));
        webshell_core::info!(url = %request.url, field = %request.field, "upload started");
        (
            Self {
                status: pushed.id,
                request,
            },
            pushed,
        )
    }

    /// Id of the status entry.
    #[must_use]
    pub fn status_entry(&self) -> EntryId {
        self.status
    }

    /// Target of the upload.
    #[must_use]
    pub fn request(&self) -> &UploadRequest {
        &self.request
    }

    /// Update the status entry with byte progress. Returns the new text, or
    /// `None` if the entry is gone.
    pub fn progress(&self, pane: &mut OutputPane, loaded: u64, total: u64) -> Option<String> {
        let text = progress_text(loaded, total);
        pane.update_status(self.status, text.clone()).then_some(text)
    }

    /// Remove the status entry and push the result.
    ///
    /// Status 200 pushes `body` through the push contract; any other status
    /// pushes `Upload error: <status>`.
    pub fn finish(self, pane: &mut OutputPane, status: u16, body: &str) -> UploadOutcome {
        pane.remove(self.status);
        let pushed = if status == 200 {
            webshell_core::info!(url = %self.request.url, "upload finished");
            frame::push(pane, body)
        } else {
            webshell_core::warn!(url = %self.request.url, status, "upload failed");
            frame::push(pane, &error_text(status))
        };
        UploadOutcome {
            removed: self.status,
            status,
            pushed,
        }
    }
}

/// Progress line: `<loaded> / <total>`.
#[must_use]
pub fn progress_text(loaded: u64, total: u64) -> String {
    format!("{loaded} / {total}")
}

/// Failure line: `Upload error: <status>`.
#[must_use]
pub fn error_text(status: u16) -> String {
    format!("Upload error: {status}")
}
