#![forbid(unsafe_code)]

//! Canonical key events.
//!
//! Every host (the browser DOM, tests) converts its raw keyboard
//! input into [`KeyEvent`] before handing it to the history binding or the
//! editor shortcuts, so those components never see host-specific types.
//!
//! # Design Notes
//!
//! - `KeyEventKind` distinguishes key-down (`Press`) from key-up (`Release`);
//!   the editor shortcuts act on both phases.
//! - DOM `key` strings and legacy numeric `keyCode` values both normalize to
//!   the same [`KeyCode`].
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Whether the key went down or up.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with no modifiers and `Press` kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Build an event from the fields of a DOM `KeyboardEvent`.
    #[must_use]
    pub fn from_dom(key: &str, modifiers: Modifiers, kind: KeyEventKind) -> Self {
        Self {
            code: KeyCode::from_dom_key(key),
            modifiers,
            kind,
        }
    }

    /// Check if this is a specific character key, ignoring ASCII case.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&c))
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Key-down (or auto-repeat).
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press)
    }

    /// Key-up.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    /// A key with no canonical mapping, kept verbatim.
    Unidentified(Box<str>),
}

impl KeyCode {
    /// Normalize a DOM `KeyboardEvent.key` value.
    ///
    /// Both the standard (`ArrowUp`) and legacy (`Up`) spellings are accepted.
    /// Any value that is a single character maps to [`KeyCode::Char`].
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            "Tab" => Self::Tab,
            "Home" => Self::Home,
            "End" => Self::End,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Spacebar" => Self::Char(' '),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Unidentified(key.into()),
                }
            }
        }
    }

    /// Normalize a legacy numeric `keyCode` / `which` value.
    ///
    /// Letter codes map to lowercase characters; digits map to their
    /// characters. Unknown codes are kept as `Unidentified`.
    #[must_use]
    pub fn from_legacy(code: u32) -> Self {
        match code {
            8 => Self::Backspace,
            9 => Self::Tab,
            13 => Self::Enter,
            27 => Self::Escape,
            32 => Self::Char(' '),
            35 => Self::End,
            36 => Self::Home,
            37 => Self::Left,
            38 => Self::Up,
            39 => Self::Right,
            40 => Self::Down,
            46 => Self::Delete,
            48..=57 | 65..=90 => char::from_u32(code)
                .map(|c| Self::Char(c.to_ascii_lowercase()))
                .unwrap_or_else(|| Self::Unidentified(code.to_string().into())),
            _ => Self::Unidentified(code.to_string().into()),
        }
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Cmd key.
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Build from the four DOM modifier booleans.
    #[must_use]
    pub fn from_dom(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let mut mods = Self::NONE;
        mods.set(Self::SHIFT, shift);
        mods.set(Self::ALT, alt);
        mods.set(Self::CTRL, ctrl);
        mods.set(Self::SUPER, meta);
        mods
    }
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key went down (`keydown`). Auto-repeat is folded in here.
    #[default]
    Press,

    /// Key went up (`keyup`).
    Release,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_arrow_keys() {
        assert_eq!(KeyCode::from_dom_key("ArrowUp"), KeyCode::Up);
        assert_eq!(KeyCode::from_dom_key("Up"), KeyCode::Up);
        assert_eq!(KeyCode::from_dom_key("ArrowDown"), KeyCode::Down);
        assert_eq!(KeyCode::from_dom_key("Down"), KeyCode::Down);
    }

    #[test]
    fn dom_single_char() {
        assert_eq!(KeyCode::from_dom_key("s"), KeyCode::Char('s'));
        assert_eq!(KeyCode::from_dom_key("é"), KeyCode::Char('é'));
        assert_eq!(KeyCode::from_dom_key("Spacebar"), KeyCode::Char(' '));
    }

    #[test]
    fn dom_unknown_key_kept() {
        assert_eq!(
            KeyCode::from_dom_key("MediaPlayPause"),
            KeyCode::Unidentified("MediaPlayPause".into())
        );
        assert_eq!(KeyCode::from_dom_key(""), KeyCode::Unidentified("".into()));
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(KeyCode::from_legacy(38), KeyCode::Up);
        assert_eq!(KeyCode::from_legacy(40), KeyCode::Down);
        assert_eq!(KeyCode::from_legacy(13), KeyCode::Enter);
        assert_eq!(KeyCode::from_legacy(27), KeyCode::Escape);
        assert_eq!(KeyCode::from_legacy(83), KeyCode::Char('s'));
        assert_eq!(KeyCode::from_legacy(69), KeyCode::Char('e'));
        assert_eq!(KeyCode::from_legacy(50), KeyCode::Char('2'));
        assert_eq!(KeyCode::from_legacy(1000), KeyCode::Unidentified("1000".into()));
    }

    #[test]
    fn modifiers_from_dom() {
        let mods = Modifiers::from_dom(false, false, true, false);
        assert_eq!(mods, Modifiers::CTRL);
        let all = Modifiers::from_dom(true, true, true, true);
        assert!(all.contains(Modifiers::SHIFT | Modifiers::ALT | Modifiers::CTRL | Modifiers::SUPER));
        assert!(Modifiers::from_dom(false, false, false, false).is_empty());
    }

    #[test]
    fn key_event_helpers() {
        let ev = KeyEvent::from_dom("S", Modifiers::CTRL, KeyEventKind::Release);
        assert!(ev.ctrl());
        assert!(!ev.alt());
        assert!(!ev.shift());
        assert!(ev.is_char('s'));
        assert!(ev.is_release());
        assert!(!ev.is_press());
    }

    #[test]
    fn key_event_defaults_to_press() {
        let ev = KeyEvent::new(KeyCode::Enter);
        assert!(ev.is_press());
        assert_eq!(ev.modifiers, Modifiers::NONE);
    }
}
