#![forbid(unsafe_code)]

//! Markdown editor state, keyboard shortcuts, and save.
//!
//! The page swaps a rendered source block for an editor widget. This module
//! owns the open/closed state and decides what each shortcut does; the
//! browser adapter creates and destroys the widget and performs the request.

use serde_json::Value;
use webshell_core::event::{KeyCode, KeyEvent};

/// Content type sent with a save request.
pub const MARKDOWN_CONTENT_TYPE: &str = "application/markdown";

/// Whether the editor is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// Source block visible, editor hidden.
    #[default]
    Closed,
    /// Editor visible, source block hidden.
    Open,
}

/// What the host should do in response to a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Swallow the browser default (Ctrl+S key-down).
    SuppressDefault,
    /// Save the editor content.
    Save,
    /// The editor was opened; create the widget.
    Open,
    /// The editor was closed; tear the widget down.
    Close,
}

/// A save request for the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// POST target: the page path.
    pub url: String,
    /// Always [`MARKDOWN_CONTENT_TYPE`].
    pub content_type: &'static str,
    /// Markdown body.
    pub body: String,
}

/// Result of a completed save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server accepted the content; reload the page.
    Reload,
    /// Stay on the page.
    Stay,
}

/// Editor state machine.
///
/// `state` is what the user asked for; `shown` is what the page last
/// displayed successfully. [`settle`](Editor::settle) brings them together.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    state: EditorState,
    shown: EditorState,
}

impl Editor {
    /// Create a closed editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Whether the editor is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == EditorState::Open
    }

    /// Flip between open and closed. Returns the new state.
    pub fn toggle(&mut self) -> EditorState {
        self.state = match self.state {
            EditorState::Closed => EditorState::Open,
            EditorState::Open => EditorState::Closed,
        };
        webshell_core::debug!(state = ?self.state, "editor toggled");
        self.state
    }

    /// Close the editor if it is open. Returns `true` if it was.
    pub fn cancel(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.toggle();
        true
    }

    /// Decide what a document-level key event means.
    ///
    /// - Ctrl+S key-down: suppress the browser's save dialog.
    /// - Ctrl+S key-up: save, when open.
    /// - Ctrl+E key-up: open, when closed.
    /// - Escape key-up: close, when open.
    ///
    /// Open and close update the state before returning.
    pub fn handle_shortcut(&mut self, key: &KeyEvent) -> Option<ShortcutAction> {
        let ctrl_s = key.ctrl() && key.is_char('s');
        if key.is_press() {
            return ctrl_s.then_some(ShortcutAction::SuppressDefault);
        }

        if ctrl_s {
            return self.is_open().then_some(ShortcutAction::Save);
        }
        if key.ctrl() && key.is_char('e') {
            if self.is_open() {
                return None;
            }
            self.toggle();
            return Some(ShortcutAction::Open);
        }
        if key.code == KeyCode::Escape && self.is_open() {
            self.toggle();
            return Some(ShortcutAction::Close);
        }
        None
    }

    /// Apply a pending state change to the page with `apply`.
    ///
    /// Does nothing when the page already shows the current state. If
    /// `apply` fails the state reverts to what the page last showed.
    pub fn settle<E>(
        &mut self,
        apply: impl FnOnce(EditorState) -> Result<(), E>,
    ) -> Result<EditorState, E> {
        if self.state == self.shown {
            return Ok(self.state);
        }
        match apply(self.state) {
            Ok(()) => {
                self.shown = self.state;
                Ok(self.state)
            }
            Err(err) => {
                webshell_core::warn!(state = ?self.state, "editor transition failed");
                self.state = self.shown;
                Err(err)
            }
        }
    }

    /// Build the save request for `body`, posted to `page_path`.
    #[must_use]
    pub fn save_request(&self, page_path: &str, body: impl Into<String>) -> SaveRequest {
        SaveRequest {
            url: page_path.to_string(),
            content_type: MARKDOWN_CONTENT_TYPE,
            body: body.into(),
        }
    }
}

/// Interpret the server's answer to a save.
///
/// Only status 200 with a JSON body whose `OK` field is truthy reloads.
#[must_use]
pub fn handle_save_response(status: u16, body: &str) -> SaveOutcome {
    if status != 200 {
        webshell_core::warn!(status, "editor save rejected");
        return SaveOutcome::Stay;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(response) if response.get("OK").is_some_and(is_truthy) => {
            webshell_core::info!("editor content saved");
            SaveOutcome::Reload
        }
        Ok(_) => {
            webshell_core::info!("editor save not confirmed");
            SaveOutcome::Stay
        }
        Err(err) => {
            webshell_core::warn!(error = %err, "malformed editor save response");
            SaveOutcome::Stay
        }
    }
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0`, `-0`, `NaN` and `""` are falsy; everything else,
/// including empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
