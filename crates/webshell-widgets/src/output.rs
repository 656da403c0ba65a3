#![forbid(unsafe_code)]

//! Scrolling output pane model.
//!
//! Entries are kept newest first, matching the page where each push is
//! inserted at the top of the console. An optional limit evicts the oldest
//! entries; evicted ids are reported so a DOM materializer can drop the
//! matching elements.

use std::collections::VecDeque;

use crate::json_tree::RenderNode;

/// Stable identifier of a pushed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One entry in the output pane.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEntry {
    /// A rendered JSON value.
    Tree(RenderNode),
    /// Trusted markup, inserted verbatim.
    Markup(String),
    /// Plain text, already entity-escaped.
    Text(String),
    /// Transient progress line, updated in place and removed when done.
    Status(String),
}

impl OutputEntry {
    /// Whether this is a transient status entry.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

/// Result of [`OutputPane::push`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pushed {
    /// Id of the new entry.
    pub id: EntryId,
    /// Ids evicted to honour the limit, oldest first.
    pub evicted: Vec<EntryId>,
}

/// Newest-first list of output entries.
#[derive(Debug, Clone, Default)]
pub struct OutputPane {
    entries: VecDeque<(EntryId, OutputEntry)>,
    limit: Option<usize>,
    next_id: u64,
}

impl OutputPane {
    /// Create an unbounded pane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of retained entries (builder). `0` is treated as `1`.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self
    }

    /// Configured limit.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Insert an entry at the top.
    pub fn push(&mut self, entry: OutputEntry) -> Pushed {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push_front((id, entry));

        let mut evicted = Vec::new();
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                if let Some((old, _)) = self.entries.pop_back() {
                    evicted.push(old);
                }
            }
        }
        Pushed { id, evicted }
    }

    /// Replace the text of a status entry. Returns `false` if `id` is gone or
    /// is not a status entry.
    pub fn update_status(&mut self, id: EntryId, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(OutputEntry::Status(current)) => {
                *current = text.into();
                true
            }
            _ => false,
        }
    }

    /// Remove an entry by id.
    pub fn remove(&mut self, id: EntryId) -> Option<OutputEntry> {
        let pos = self.entries.iter().position(|(eid, _)| *eid == id)?;
        self.entries.remove(pos).map(|(_, entry)| entry)
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&OutputEntry> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, entry)| entry)
    }

    /// Look up an entry mutably (e.g. to toggle a tree node).
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut OutputEntry> {
        self.entries
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, entry)| entry)
    }

    /// Drop every entry. Ids keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &OutputEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pane is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> OutputEntry {
        OutputEntry::Text(s.to_string())
    }

    fn texts(pane: &OutputPane) -> Vec<String> {
        pane.iter()
            .map(|(_, e)| match e {
                OutputEntry::Text(t) | OutputEntry::Markup(t) | OutputEntry::Status(t) => t.clone(),
                OutputEntry::Tree(_) => "<tree>".to_string(),
            })
            .collect()
    }

    #[test]
    fn newest_first() {
        let mut pane = OutputPane::new();
        pane.push(text("one"));
        pane.push(text("two"));
        pane.push(text("three"));
        assert_eq!(texts(&pane), ["three", "two", "one"]);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut pane = OutputPane::new();
        let a = pane.push(text("a")).id;
        let b = pane.push(text("b")).id;
        assert!(b > a);
        pane.clear();
        let c = pane.push(text("c")).id;
        assert!(c > b);
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut pane = OutputPane::new().with_limit(Some(2));
        let first = pane.push(text("1")).id;
        pane.push(text("2"));
        let pushed = pane.push(text("3"));
        assert_eq!(pushed.evicted, vec![first]);
        assert_eq!(texts(&pane), ["3", "2"]);
    }

    #[test]
    fn zero_limit_keeps_newest() {
        let mut pane = OutputPane::new().with_limit(Some(0));
        pane.push(text("a"));
        pane.push(text("b"));
        assert_eq!(texts(&pane), ["b"]);
    }

    #[test]
    fn status_update_and_remove() {
        let mut pane = OutputPane::new();
        let id = pane.push(OutputEntry::Status("Upload started".into())).id;
        pane.push(text("other"));
        assert!(pane.update_status(id, "10 / 20"));
        assert_eq!(pane.get(id), Some(&OutputEntry::Status("10 / 20".into())));
        assert!(pane.remove(id).is_some_and(|e| e.is_status()));
        assert!(!pane.update_status(id, "gone"));
        assert_eq!(texts(&pane), ["other"]);
    }

    #[test]
    fn update_status_rejects_other_kinds() {
        let mut pane = OutputPane::new();
        let id = pane.push(text("plain")).id;
        assert!(!pane.update_status(id, "x"));
        assert_eq!(pane.get(id), Some(&text("plain")));
    }

    #[test]
    fn remove_missing_is_none() {
        let mut pane = OutputPane::new();
        let id = pane.push(text("a")).id;
        pane.clear();
        assert!(pane.remove(id).is_none());
        assert!(pane.is_empty());
    }
}
