#![forbid(unsafe_code)]

//! Append-only input history with cursor recall.
//!
//! The cursor lives in `[-1, len]`. `len` means "nothing selected, ready for a
//! fresh line"; `-1` means the user walked past the oldest entry. Both ends
//! yield an empty string and stay pinned; there is no wraparound.
//!
//! ```
//! use webshell_widgets::history::HistoryBuffer;
//!
//! let mut history = HistoryBuffer::new();
//! history.add("ls");
//! history.add("pwd");
//! assert_eq!(history.recall_older(), "pwd");
//! assert_eq!(history.recall_older(), "ls");
//! assert_eq!(history.recall_older(), "");
//! assert_eq!(history.recall_newer(), "ls");
//! ```

/// Command history for one input control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryBuffer {
    log: Vec<String>,
    cursor: isize,
}

impl HistoryBuffer {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and reset the cursor past the newest entry.
    ///
    /// No deduplication and no size cap.
    pub fn add(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
        self.cursor = self.len_isize();
    }

    /// Step towards older entries.
    ///
    /// Returns `""` on an empty log (cursor untouched) and once the cursor
    /// has moved past the oldest entry.
    pub fn recall_older(&mut self) -> &str {
        if self.log.is_empty() {
            return "";
        }
        if self.cursor <= 0 {
            self.cursor = -1;
            return "";
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step towards newer entries.
    ///
    /// Returns `""` on an empty log and once the cursor has moved past the
    /// newest entry.
    pub fn recall_newer(&mut self) -> &str {
        if self.log.is_empty() {
            return "";
        }
        if self.cursor >= self.len_isize() - 1 {
            self.cursor = self.len_isize();
            return "";
        }
        self.cursor += 1;
        self.current()
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.log
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn current(&self) -> &str {
        usize::try_from(self.cursor)
            .ok()
            .and_then(|idx| self.log.get(idx))
            .map_or("", String::as_str)
    }

    fn len_isize(&self) -> isize {
        isize::try_from(self.log.len()).unwrap_or(isize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_both_directions() {
        let mut h = HistoryBuffer::new();
        h.add("a");
        h.add("b");
        assert_eq!(h.recall_older(), "b");
        assert_eq!(h.recall_older(), "a");
        assert_eq!(h.recall_older(), "");
        assert_eq!(h.recall_newer(), "a");
        assert_eq!(h.recall_newer(), "b");
        assert_eq!(h.recall_newer(), "");
    }

    #[test]
    fn empty_log_leaves_cursor() {
        let mut h = HistoryBuffer::new();
        assert_eq!(h.cursor(), 0);
        assert_eq!(h.recall_older(), "");
        assert_eq!(h.cursor(), 0);
        assert_eq!(h.recall_newer(), "");
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn older_past_start_stays_empty() {
        let mut h = HistoryBuffer::new();
        h.add("only");
        assert_eq!(h.recall_older(), "only");
        for _ in 0..5 {
            assert_eq!(h.recall_older(), "");
            assert_eq!(h.cursor(), -1);
        }
        assert_eq!(h.recall_newer(), "only");
    }

    #[test]
    fn newer_past_end_stays_empty() {
        let mut h = HistoryBuffer::new();
        h.add("x");
        h.add("y");
        for _ in 0..5 {
            assert_eq!(h.recall_newer(), "");
            assert_eq!(h.cursor(), 2);
        }
        assert_eq!(h.recall_older(), "y");
    }

    #[test]
    fn add_resets_cursor() {
        let mut h = HistoryBuffer::new();
        h.add("a");
        h.add("b");
        h.recall_older();
        h.recall_older();
        h.add("c");
        assert_eq!(h.cursor(), 3);
        assert_eq!(h.recall_older(), "c");
    }

    #[test]
    fn duplicates_kept() {
        let mut h = HistoryBuffer::new();
        h.add("same");
        h.add("same");
        assert_eq!(h.len(), 2);
        assert_eq!(h.entries(), ["same", "same"]);
    }

    #[test]
    fn newer_from_fresh_state_is_empty() {
        let mut h = HistoryBuffer::new();
        h.add("a");
        assert_eq!(h.recall_newer(), "");
        assert_eq!(h.cursor(), 1);
    }
}
