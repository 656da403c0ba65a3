#![forbid(unsafe_code)]

//! HTML materializer for render trees and output entries.
//!
//! The markup mirrors pretty-printed JSON and carries the classes the page
//! stylesheet and the collapse listener rely on:
//!
//! ```text
//! {<span class="ellipsis"></span><ul class="obj collapsible">
//!   <li><span class="property"><span class="quote">"</span>a<span class="quote">"</span></span>: <span class="type-number">1</span></li>
//! </ul>}
//! ```
//!
//! A container child is preceded by a `collapser` div. Clicking it toggles
//! `collapsed` on the `<li>` that owns the child list.

use std::fmt::Write as _;

use webshell_widgets::json_tree::{ELLIPSIS, RenderNode, ScalarKind};
use webshell_widgets::output::{OutputEntry, OutputPane};
use webshell_widgets::text::escape_html;

/// Class of the clickable collapse control.
pub const COLLAPSER: &str = "collapser";
/// Class of a container's child list.
pub const COLLAPSIBLE: &str = "collapsible";
/// Class added to the `<li>` whose child list is hidden.
pub const COLLAPSED: &str = "collapsed";

const QUOTE: &str = r#"<span class="quote">"</span>"#;

/// Whether a clicked element is a collapse control.
///
/// Matches the whole `className`, so an element carrying extra classes is
/// not a collapser.
#[must_use]
pub fn is_collapser(class_name: &str) -> bool {
    class_name == COLLAPSER
}

/// Markup for a render tree, without an enclosing element.
///
/// The root has no `<li>` to carry `collapsed`, so a collapsed root container
/// is written in its summary form, `{…}` or `[…]`, with no child list.
#[must_use]
pub fn tree_markup(root: &RenderNode) -> String {
    let mut out = String::new();
    if root.scalar().is_some() {
        write_scalar(&mut out, root);
    } else if root.is_collapsed() && root.has_child_list() {
        let kind = root.kind();
        let _ = write!(
            out,
            r#"{}<span class="ellipsis">{ELLIPSIS}</span>{}"#,
            kind.open(),
            kind.close()
        );
    } else {
        write_container(&mut out, root);
    }
    out
}

/// Inner markup of one output entry's `<p>`.
#[must_use]
pub fn entry_markup(entry: &OutputEntry) -> String {
    match entry {
        OutputEntry::Tree(root) => tree_markup(root),
        OutputEntry::Markup(markup) => markup.clone(),
        OutputEntry::Text(text) => text.clone(),
        OutputEntry::Status(status) => escape_html(status).into_owned(),
    }
}

/// Markup for a whole pane: one `<p>` per entry, newest first.
#[must_use]
pub fn pane_markup(pane: &OutputPane) -> String {
    let mut out = String::new();
    for (id, entry) in pane.iter() {
        let _ = write!(out, r#"<p data-entry="{}">"#, id.get());
        out.push_str(&entry_markup(entry));
        out.push_str("</p>");
    }
    out
}

fn write_container(out: &mut String, node: &RenderNode) {
    let kind = node.kind();
    out.push_str(kind.open());
    out.push_str(r#"<span class="ellipsis"></span>"#);
    if node.has_child_list() {
        out.push_str(r#"<ul class="obj collapsible">"#);
        for child in node.children() {
            write_item(out, child);
        }
        out.push_str("</ul>");
    }
    out.push_str(kind.close());
    out.push_str(node.separator());
}

fn write_item(out: &mut String, node: &RenderNode) {
    if node.is_collapsed() {
        let _ = write!(out, r#"<li class="{COLLAPSED}">"#);
    } else {
        out.push_str("<li>");
    }

    if let Some(key) = node.key() {
        let _ = write!(
            out,
            r#"<span class="property">{QUOTE}{}{QUOTE}</span>: "#,
            escape_html(key)
        );
    }

    if node.is_container() {
        let _ = write!(out, r#"<div class="{COLLAPSER}"></div>"#);
        write_container(out, node);
    } else {
        write_scalar(out, node);
        out.push_str(node.separator());
    }
    out.push_str("</li>");
}

fn write_scalar(out: &mut String, node: &RenderNode) {
    let Some(scalar) = node.scalar() else {
        return;
    };
    let text = escape_html(scalar.text());
    let _ = write!(out, r#"<span class="{}">"#, scalar.kind().class_name());
    if scalar.kind() == ScalarKind::String {
        let _ = write!(out, "{QUOTE}{text}{QUOTE}");
    } else {
        out.push_str(&text);
    }
    out.push_str("</span>");
}
