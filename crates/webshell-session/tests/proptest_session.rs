//! Property tests for frame routing and copy normalisation.

use proptest::prelude::*;
use webshell_session::clipboard::normalize_code_copy;
use webshell_session::frame::{Inbound, PushContent, parse_inbound};
use webshell_widgets::text::escape_html;

proptest! {
    #[test]
    fn non_control_frames_are_display(frame in "[^:].*") {
        prop_assert_eq!(parse_inbound(&frame).unwrap(), Inbound::Display(frame.as_str()));
    }

    #[test]
    fn plain_text_is_escaped_verbatim(text in "[^{\\[<].*") {
        prop_assert_eq!(
            PushContent::classify(&text).unwrap(),
            PushContent::Text(escape_html(&text).into_owned())
        );
    }

    #[test]
    fn escaped_text_has_no_raw_angle_brackets(text in "[^{\\[<].*") {
        if let PushContent::Text(escaped) = PushContent::classify(&text).unwrap() {
            prop_assert!(!escaped.contains('<') && !escaped.contains('>'));
        }
    }

    #[test]
    fn markup_passes_unchanged(body in ".*") {
        let markup = format!("<{body}");
        prop_assert_eq!(
            PushContent::classify(&markup).unwrap(),
            PushContent::Markup(markup.clone())
        );
    }

    #[test]
    fn copy_normalisation_removes_tab_lines(lines in prop::collection::vec("[a-z]{1,6}", 1..8)) {
        let selected = lines.join("\n\t\n");
        prop_assert_eq!(normalize_code_copy(&selected), lines.join("\n"));
    }

    #[test]
    fn copy_normalisation_keeps_plain_text(text in "[a-z \n]{0,40}") {
        prop_assume!(!text.contains("\n \n"));
        prop_assert_eq!(normalize_code_copy(&text), text);
    }
}
