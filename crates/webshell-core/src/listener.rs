#![forbid(unsafe_code)]

//! One-time registration slot for page-wide event listeners.
//!
//! A page needs exactly one document-level click listener for tree collapsers,
//! no matter how many renderers are created. The slot owns whatever handle
//! keeps the listener alive and runs the registration only on first use.
//!
//! ```
//! use webshell_core::listener::ListenerSlot;
//!
//! let slot: ListenerSlot<&'static str> = ListenerSlot::new();
//! assert!(slot.install_with(|| "click"));
//! assert!(!slot.install_with(|| "click again"));
//! assert_eq!(slot.get(), Some(&"click"));
//! ```

use std::cell::OnceCell;

/// Holds the handle of a listener registered at most once.
///
/// Intended to live in a `thread_local!` or a long-lived owner. Not `Sync`;
/// browser listeners are single-threaded by nature.
#[derive(Debug)]
pub struct ListenerSlot<T> {
    handle: OnceCell<T>,
}

impl<T> Default for ListenerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListenerSlot<T> {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handle: OnceCell::new(),
        }
    }

    /// Whether a listener has been installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.handle.get().is_some()
    }

    /// The installed handle, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.handle.get()
    }

    /// Run `install` if the slot is empty.
    ///
    /// Returns `true` when this call performed the registration.
    pub fn install_with(&self, install: impl FnOnce() -> T) -> bool {
        let mut fresh = false;
        self.handle.get_or_init(|| {
            fresh = true;
            install()
        });
        fresh
    }

    /// Fallible variant of [`install_with`](Self::install_with).
    ///
    /// A failed registration leaves the slot empty so a later call can retry.
    pub fn try_install_with<E>(&self, install: impl FnOnce() -> Result<T, E>) -> Result<bool, E> {
        if self.is_installed() {
            return Ok(false);
        }
        let handle = install()?;
        Ok(self.handle.set(handle).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn installs_once() {
        let slot = ListenerSlot::new();
        let calls = Cell::new(0);
        for _ in 0..5 {
            slot.install_with(|| calls.set(calls.get() + 1));
        }
        assert_eq!(calls.get(), 1);
        assert!(slot.is_installed());
    }

    #[test]
    fn empty_slot() {
        let slot: ListenerSlot<u8> = ListenerSlot::default();
        assert!(!slot.is_installed());
        assert!(slot.get().is_none());
    }

    #[test]
    fn failed_install_can_retry() {
        let slot: ListenerSlot<u32> = ListenerSlot::new();
        let err: Result<bool, &str> = slot.try_install_with(|| Err("no document"));
        assert_eq!(err, Err("no document"));
        assert!(!slot.is_installed());

        assert_eq!(slot.try_install_with::<&str>(|| Ok(7)), Ok(true));
        assert_eq!(slot.try_install_with::<&str>(|| Ok(8)), Ok(false));
        assert_eq!(slot.get(), Some(&7));
    }

    #[test]
    fn thread_local_slot() {
        thread_local! {
            static SLOT: ListenerSlot<&'static str> = const { ListenerSlot::new() };
        }
        let first = SLOT.with(|s| s.install_with(|| "a"));
        let second = SLOT.with(|s| s.install_with(|| "b"));
        assert!(first);
        assert!(!second);
    }
}
