#![forbid(unsafe_code)]

//! Line input control and the history key binding.
//!
//! [`HistoryBinding`] attaches a [`HistoryBuffer`] to anything implementing
//! [`LineControl`]: a DOM `<input>`, the native [`LineInput`], or a test
//! double. Up recalls older entries, Down recalls newer ones, Enter records a
//! non-empty value and hands the control to the submit callback. Clearing the
//! control after submit is the callback's job.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use webshell_core::event::{KeyCode, KeyEvent};

use crate::history::HistoryBuffer;

/// A text-input-like control the history binding can read and overwrite.
pub trait LineControl {
    /// Current text.
    fn value(&self) -> Cow<'_, str>;

    /// Replace the text.
    fn set_value(&mut self, value: &str);
}

/// What the binding did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOutcome {
    /// Up: the control now holds an older entry (or `""`).
    RecalledOlder,
    /// Down: the control now holds a newer entry (or `""`).
    RecalledNewer,
    /// Enter with text: recorded and passed to the submit callback.
    Submitted,
    /// Enter on an empty control: nothing recorded, callback not called.
    EmptySubmit,
    /// Not a history key; the host should apply its default handling.
    Ignored,
}

/// History navigation and submit handling for one control.
#[derive(Debug, Clone, Default)]
pub struct HistoryBinding {
    history: HistoryBuffer,
}

impl HistoryBinding {
    /// Create a binding with an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying history.
    #[must_use]
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Handle a key-down on `control`.
    ///
    /// Key-up events are ignored. Modifiers are not inspected.
    pub fn handle_key<C, F>(&mut self, key: &KeyEvent, control: &mut C, on_submit: F) -> BindingOutcome
    where
        C: LineControl + ?Sized,
        F: FnOnce(&mut C),
    {
        if !key.is_press() {
            return BindingOutcome::Ignored;
        }

        match key.code {
            KeyCode::Up => {
                control.set_value(self.history.recall_older());
                BindingOutcome::RecalledOlder
            }
            KeyCode::Down => {
                control.set_value(self.history.recall_newer());
                BindingOutcome::RecalledNewer
            }
            KeyCode::Enter => {
                let value = control.value().into_owned();
                if value.is_empty() {
                    return BindingOutcome::EmptySubmit;
                }
                self.history.add(value);
                on_submit(control);
                BindingOutcome::Submitted
            }
            _ => BindingOutcome::Ignored,
        }
    }
}

/// A native single-line input.
///
/// Grapheme-cluster aware: the cursor counts graphemes, so combining marks
/// and emoji sequences move and delete as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
}

impl LineInput {
    /// Create an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text value (builder). The cursor moves to the end.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.grapheme_count();
        self
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.value
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Clear all text.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key.
    ///
    /// Returns `true` if the key was consumed. Ctrl/Alt chords and key-up
    /// events are left to the caller.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !key.is_press() {
            return false;
        }
        match key.code {
            KeyCode::Char(c) if !key.ctrl() && !key.alt() => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.remove_grapheme(self.cursor - 1);
                    self.cursor -= 1;
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.grapheme_count() {
                    self.remove_grapheme(self.cursor);
                }
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.grapheme_count());
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.grapheme_count();
                true
            }
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) {
        let before = self.grapheme_count();
        let offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert(offset, c);
        // A combining mark merges into the previous grapheme instead of adding one.
        let added = self.grapheme_count().saturating_sub(before);
        self.cursor += added;
    }

    fn remove_grapheme(&mut self, index: usize) {
        let start = self.grapheme_byte_offset(index);
        let end = self.grapheme_byte_offset(index + 1);
        self.value.replace_range(start..end, "");
    }

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, index: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(index)
            .map_or(self.value.len(), |(offset, _)| offset)
    }
}

impl LineControl for LineInput {
    fn value(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.value)
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.grapheme_count();
    }
}
