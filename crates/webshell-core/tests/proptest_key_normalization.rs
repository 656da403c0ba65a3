//! Property-based tests for key normalization.
//!
//! 1. Any single-character DOM key maps to `KeyCode::Char` of that character.
//! 2. Multi-character DOM keys (other than the legacy `Spacebar`) never map to `KeyCode::Char`.
//! 3. Letter `keyCode` values map to the lowercase letter.
//! 4. Modifier flags built from DOM booleans round-trip through `contains`.

use proptest::prelude::*;
use webshell_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};

proptest! {
    #[test]
    fn single_char_key_is_char(c in any::<char>()) {
        let key = c.to_string();
        let code = KeyCode::from_dom_key(&key);
        prop_assert_eq!(code, KeyCode::Char(c));
    }

    #[test]
    fn multi_char_keys_are_not_chars(key in "[A-Za-z]{2,12}") {
        prop_assume!(key != "Spacebar");
        let code = KeyCode::from_dom_key(&key);
        prop_assert!(!matches!(code, KeyCode::Char(_)));
    }

    #[test]
    fn legacy_letters_are_lowercase(code in 65u32..=90) {
        let expected = char::from_u32(code).unwrap().to_ascii_lowercase();
        prop_assert_eq!(KeyCode::from_legacy(code), KeyCode::Char(expected));
    }

    #[test]
    fn dom_modifiers_round_trip(shift: bool, alt: bool, ctrl: bool, meta: bool) {
        let mods = Modifiers::from_dom(shift, alt, ctrl, meta);
        prop_assert_eq!(mods.contains(Modifiers::SHIFT), shift);
        prop_assert_eq!(mods.contains(Modifiers::ALT), alt);
        prop_assert_eq!(mods.contains(Modifiers::CTRL), ctrl);
        prop_assert_eq!(mods.contains(Modifiers::SUPER), meta);

        let ev = KeyEvent::from_dom("x", mods, KeyEventKind::Press);
        prop_assert_eq!(ev.ctrl(), ctrl);
        prop_assert_eq!(ev.alt(), alt);
    }
}
