#![forbid(unsafe_code)]

//! Inbound frame routing and the push contract.
//!
//! A frame starting with `:` is a control frame; only `:upload:` is
//! understood. Anything else is a display frame, classified by its first
//! character:
//!
//! | first char | content |
//! |---|---|
//! | `{` or `[` | JSON, rendered as a tree |
//! | `<` | trusted markup, inserted verbatim |
//! | anything else | text, entity-escaped |

use serde_json::Value;
use webshell_widgets::json_tree::{self, RenderNode};
use webshell_widgets::output::{OutputEntry, OutputPane, Pushed};
use webshell_widgets::text::escape_html;

use crate::error::{Result, ShellError};
use crate::upload::UploadDirective;

/// Prefix shared by every control frame.
pub const CONTROL_PREFIX: char = ':';

/// Prefix of the upload control frame.
pub const UPLOAD_PREFIX: &str = ":upload:";

/// A routed inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// Content for the output pane.
    Display(&'a str),
    /// The server asks the user to pick a file to upload.
    Upload(UploadDirective),
    /// A control frame nobody handles.
    UnknownControl(&'a str),
}

/// Route an inbound frame.
///
/// An `:upload:` frame with an empty payload yields the default directive.
pub fn parse_inbound(frame: &str) -> Result<Inbound<'_>> {
    if !frame.starts_with(CONTROL_PREFIX) {
        return Ok(Inbound::Display(frame));
    }
    match frame.strip_prefix(UPLOAD_PREFIX) {
        Some(payload) if payload.trim().is_empty() => Ok(Inbound::Upload(UploadDirective::default())),
        Some(payload) => serde_json::from_str(payload)
            .map(Inbound::Upload)
            .map_err(ShellError::Directive),
        None => Ok(Inbound::UnknownControl(frame)),
    }
}

/// Classified display content.
#[derive(Debug, Clone, PartialEq)]
pub enum PushContent {
    /// Parsed JSON.
    Tree(RenderNode),
    /// Markup to insert verbatim.
    Markup(String),
    /// Entity-escaped text.
    Text(String),
}

impl PushContent {
    /// Apply the push contract to one display frame.
    pub fn classify(data: &str) -> Result<Self> {
        match data.as_bytes().first() {
            Some(b'{' | b'[') => {
                let value: Value = serde_json::from_str(data).map_err(ShellError::Json)?;
                Ok(Self::Tree(json_tree::render(&value)))
            }
            Some(b'<') => Ok(Self::Markup(data.to_string())),
            _ => Ok(Self::Text(escape_html(data).into_owned())),
        }
    }

    /// Short name of the content kind, for logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Tree(_) => "tree",
            Self::Markup(_) => "markup",
            Self::Text(_) => "text",
        }
    }

    /// Convert into an output pane entry.
    #[must_use]
    pub fn into_entry(self) -> OutputEntry {
        match self {
            Self::Tree(node) => OutputEntry::Tree(node),
            Self::Markup(markup) => OutputEntry::Markup(markup),
            Self::Text(text) => OutputEntry::Text(text),
        }
    }
}

/// Classify `data` and insert it at the top of `pane`.
///
/// Nothing is inserted when the data is malformed JSON.
pub fn push(pane: &mut OutputPane, data: &str) -> Result<Pushed> {
    let content = PushContent::classify(data)?;
    webshell_core::debug!(
        kind = content.kind_name(),
        len = data.len(),
        "push"
    );
    Ok(pane.push(content.into_entry()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use webshell_widgets::json_tree::NodeKind;

    #[test]
    fn json_object_becomes_tree() {
        let content = PushContent::classify(r#"{"a":1}"#).unwrap();
        let PushContent::Tree(node) = content else {
            panic!("expected tree, got {content:?}");
        };
        assert_eq!(node.kind(), NodeKind::Object);
        assert_eq!(node.children()[0].key(), Some("a"));
    }

    #[test]
    fn json_array_becomes_tree() {
        let content = PushContent::classify("[1, 2]").unwrap();
        assert!(matches!(content, PushContent::Tree(ref n) if n.children().len() == 2));
    }

    #[test]
    fn markup_passes_through() {
        assert_eq!(
            PushContent::classify("<b>hi</b>").unwrap(),
            PushContent::Markup("<b>hi</b>".into())
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            PushContent::classify("plain & text").unwrap(),
            PushContent::Text("plain &amp; text".into())
        );
        assert_eq!(
            PushContent::classify("a > b").unwrap(),
            PushContent::Text("a &gt; b".into())
        );
    }

    #[test]
    fn empty_frame_is_empty_text() {
        assert_eq!(PushContent::classify("").unwrap(), PushContent::Text(String::new()));
    }

    #[test]
    fn leading_whitespace_is_text() {
        assert!(matches!(
            PushContent::classify(" {\"a\":1}").unwrap(),
            PushContent::Text(_)
        ));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(PushContent::classify("{oops"), Err(ShellError::Json(_))));
        assert!(matches!(PushContent::classify("[1,"), Err(ShellError::Json(_))));
    }

    #[test]
    fn push_inserts_nothing_on_error() {
        let mut pane = OutputPane::new();
        assert!(push(&mut pane, "{oops").is_err());
        assert!(pane.is_empty());
        push(&mut pane, "ok").unwrap();
        assert_eq!(pane.len(), 1);
    }

    #[test]
    fn display_frames_route_as_display() {
        assert_eq!(parse_inbound("hello").unwrap(), Inbound::Display("hello"));
        assert_eq!(parse_inbound("").unwrap(), Inbound::Display(""));
    }

    #[test]
    fn upload_directive_parsed() {
        let inbound = parse_inbound(r#":upload:{"url":"/u","name":"doc"}"#).unwrap();
        let Inbound::Upload(directive) = inbound else {
            panic!("expected upload");
        };
        assert_eq!(directive.url.as_deref(), Some("/u"));
        assert_eq!(directive.field.as_deref(), Some("doc"));
    }

    #[test]
    fn empty_upload_payload_is_default() {
        assert_eq!(
            parse_inbound(":upload:").unwrap(),
            Inbound::Upload(UploadDirective::default())
        );
    }

    #[test]
    fn malformed_upload_directive_is_error() {
        assert!(matches!(parse_inbound(":upload:{"), Err(ShellError::Directive(_))));
    }

    #[test]
    fn unknown_control_frames() {
        assert_eq!(parse_inbound(":ping").unwrap(), Inbound::UnknownControl(":ping"));
        assert_eq!(parse_inbound(":").unwrap(), Inbound::UnknownControl(":"));
    }
}
