#![forbid(unsafe_code)]

//! JSON tree renderer.
//!
//! Converts a decoded JSON value into a tree of [`RenderNode`]s that mirrors
//! pretty-printed JSON: containers open with `[`/`{`, carry an ellipsis that
//! stands in for their contents when collapsed, list their children, and close
//! with `]`/`}`. Every node except the last of its siblings is followed by `,`.
//!
//! The tree is presentation-neutral. [`TreeLines`] turns it into plain text
//! lines; the web crate turns the same tree into markup or DOM nodes.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use webshell_widgets::json_tree::{NodeKind, RenderNode, TreeLines};
//!
//! let root = RenderNode::from_value(&json!({"name": "Alice", "tags": [1, 2]}));
//! assert_eq!(root.kind(), NodeKind::Object);
//! assert_eq!(root.children().len(), 2);
//!
//! let text = TreeLines::new().text(&root);
//! assert!(text.contains("\"name\": \"Alice\","));
//! ```

use serde_json::{Number, Value};

use crate::text::escape_string;

/// Summary shown in place of a collapsed container's children.
pub const ELLIPSIS: &str = "\u{2026}";

/// Structural kind of a render node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Null, boolean, number, or string.
    Scalar,
    /// Ordered sequence.
    Array,
    /// Key/value mapping in insertion order.
    Object,
}

impl NodeKind {
    /// Opening bracket (empty for scalars).
    #[must_use]
    pub const fn open(self) -> &'static str {
        match self {
            Self::Scalar => "",
            Self::Array => "[",
            Self::Object => "{",
        }
    }

    /// Closing bracket (empty for scalars).
    #[must_use]
    pub const fn close(self) -> &'static str {
        match self {
            Self::Scalar => "",
            Self::Array => "]",
            Self::Object => "}",
        }
    }
}

/// Style class of a scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Null,
    Boolean,
    Number,
    String,
}

impl ScalarKind {
    /// CSS class used by markup materializers.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Null => "type-null",
            Self::Boolean => "type-boolean",
            Self::Number => "type-number",
            Self::String => "type-string",
        }
    }
}

/// A scalar token: its style class and display text.
///
/// String text is stored escaped and without the surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    kind: ScalarKind,
    text: String,
}

impl Scalar {
    /// Style class.
    #[must_use]
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Display text without quotes.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display text as it appears in the tree (strings quoted).
    #[must_use]
    pub fn token(&self) -> String {
        match self.kind {
            ScalarKind::String => format!("\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Scalar(Scalar),
    Array(Vec<RenderNode>),
    Object(Vec<RenderNode>),
}

/// One JSON value's presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderNode {
    key: Option<String>,
    body: Body,
    collapsed: bool,
    is_last_sibling: bool,
}

impl RenderNode {
    /// Render a JSON value into a fresh, fully expanded tree.
    ///
    /// The root counts as the last (and only) sibling, so it carries no
    /// trailing separator.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let _span = webshell_core::debug_span!("json_tree_render").entered();
        let root = build(None, value, true);
        webshell_core::trace!(nodes = root.node_count(), "rendered json tree");
        root
    }

    /// Key label shown before the value, if any.
    ///
    /// Array elements and object entries whose key is a numeric literal have
    /// no label.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Structural kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self.body {
            Body::Scalar(_) => NodeKind::Scalar,
            Body::Array(_) => NodeKind::Array,
            Body::Object(_) => NodeKind::Object,
        }
    }

    /// The scalar token, for scalar nodes.
    #[must_use]
    pub fn scalar(&self) -> Option<&Scalar> {
        match &self.body {
            Body::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Child nodes in source order (empty for scalars).
    #[must_use]
    pub fn children(&self) -> &[RenderNode] {
        match &self.body {
            Body::Scalar(_) => &[],
            Body::Array(children) | Body::Object(children) => children,
        }
    }

    fn children_mut(&mut self) -> &mut [RenderNode] {
        match &mut self.body {
            Body::Scalar(_) => &mut [],
            Body::Array(children) | Body::Object(children) => children,
        }
    }

    /// Whether this node is an array or object.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !matches!(self.body, Body::Scalar(_))
    }

    /// Whether a child list is materialized.
    ///
    /// Empty containers emit their brackets but no list.
    #[must_use]
    pub fn has_child_list(&self) -> bool {
        self.is_container() && !self.children().is_empty()
    }

    /// Whether the subtree is collapsed.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether this node is the last of its siblings.
    #[must_use]
    pub fn is_last_sibling(&self) -> bool {
        self.is_last_sibling
    }

    /// Trailing separator: `,` unless this is the last sibling.
    #[must_use]
    pub fn separator(&self) -> &'static str {
        if self.is_last_sibling { "" } else { "," }
    }

    /// Flip the collapsed flag. Scalars have no collapser and are left alone.
    ///
    /// Returns `true` if the flag changed. Descendants keep their own flags.
    pub fn toggle_collapsed(&mut self) -> bool {
        if !self.is_container() {
            return false;
        }
        self.collapsed = !self.collapsed;
        true
    }

    /// Set the collapsed flag on a container.
    ///
    /// Returns `true` if the flag changed.
    pub fn set_collapsed(&mut self, collapsed: bool) -> bool {
        if !self.is_container() || self.collapsed == collapsed {
            return false;
        }
        self.collapsed = collapsed;
        true
    }

    /// Node at a child-index path (empty path = this node).
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&RenderNode> {
        let mut current = self;
        for &idx in path {
            current = current.children().get(idx)?;
        }
        Some(current)
    }

    /// Mutable node at a child-index path.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut RenderNode> {
        let mut current = self;
        for &idx in path {
            current = current.children_mut().get_mut(idx)?;
        }
        Some(current)
    }

    /// Toggle the node at `path`. Returns `true` if a flag changed.
    pub fn toggle_at(&mut self, path: &[usize]) -> bool {
        self.node_at_mut(path)
            .is_some_and(RenderNode::toggle_collapsed)
    }

    /// Total number of nodes in the subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(RenderNode::node_count).sum::<usize>()
    }

    /// Number of nodes currently visible, including this one.
    ///
    /// Children of a collapsed container are hidden regardless of their own
    /// flags.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        if self.collapsed {
            return 1;
        }
        1 + self
            .children()
            .iter()
            .map(RenderNode::visible_count)
            .sum::<usize>()
    }
}

/// Render a JSON value. Shorthand for [`RenderNode::from_value`].
#[must_use]
pub fn render(value: &Value) -> RenderNode {
    RenderNode::from_value(value)
}

fn build(key: Option<&str>, value: &Value, is_last_sibling: bool) -> RenderNode {
    let body = match value {
        Value::Null => scalar(ScalarKind::Null, "null".to_string()),
        Value::Bool(b) => scalar(ScalarKind::Boolean, b.to_string()),
        Value::Number(n) => scalar(ScalarKind::Number, number_token(n)),
        Value::String(s) => scalar(ScalarKind::String, escape_string(s).into_owned()),
        Value::Array(items) => Body::Array(build_children(
            items.iter().map(|item| (None, item)),
            items.len(),
        )),
        Value::Object(map) => Body::Object(build_children(
            map.iter().map(|(k, v)| (Some(k.as_str()), v)),
            map.len(),
        )),
    };

    RenderNode {
        key: key.filter(|k| !is_numeric_key(k)).map(str::to_owned),
        body,
        collapsed: false,
        is_last_sibling,
    }
}

fn build_children<'a>(
    entries: impl Iterator<Item = (Option<&'a str>, &'a Value)>,
    len: usize,
) -> Vec<RenderNode> {
    entries
        .enumerate()
        .map(|(i, (key, value))| build(key, value, i + 1 == len))
        .collect()
}

/// Number text as a browser prints it: integers verbatim, floats in the
/// shortest form that round-trips (`10`, `0.000001`, `1e+21`), with `-0`
/// shown as `0`.
fn number_token(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => {
            if f == 0.0 {
                "0".to_string()
            } else {
                ryu_js::Buffer::new().format(f).to_string()
            }
        }
        _ => n.to_string(),
    }
}

fn scalar(kind: ScalarKind, text: String) -> Body {
    Body::Scalar(Scalar { kind, text })
}

/// Whether an object key reads as a finite number.
///
/// Such keys are rendered without a label, which makes objects like
/// `{"0": .., "1": ..}` look like arrays. Legitimate numeric-string keys lose
/// their label too; the behavior is kept as-is.
///
/// Accepts what a browser's `Number()` accepts: surrounding whitespace,
/// optional sign, decimal and exponent forms, and unsigned `0x`/`0o`/`0b`
/// literals. Blank strings and non-finite values are rejected.
#[must_use]
pub fn is_numeric_key(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return false;
    }

    let radix_literal = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| trimmed.strip_prefix(prefix).map(|digits| (digits, radix)));
    if let Some((digits, radix)) = radix_literal {
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    // `f64::from_str` also accepts "inf" and "NaN"; both fail the finiteness check.
    trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Plain-text materializer.
///
/// Produces pretty-printed lines that honor collapse state: a collapsed
/// container prints on one line as `[…]` or `{…}`.
#[derive(Debug, Clone)]
pub struct TreeLines {
    indent: usize,
}

impl Default for TreeLines {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeLines {
    /// Create a materializer with two-space indentation.
    #[must_use]
    pub fn new() -> Self {
        Self { indent: 2 }
    }

    /// Set the indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Render the tree into lines.
    #[must_use]
    pub fn lines(&self, root: &RenderNode) -> Vec<String> {
        let mut out = Vec::with_capacity(root.visible_count() * 2);
        self.write_node(root, 0, &mut out);
        out
    }

    /// Render the tree into a single newline-joined string.
    #[must_use]
    pub fn text(&self, root: &RenderNode) -> String {
        self.lines(root).join("\n")
    }

    fn write_node(&self, node: &RenderNode, depth: usize, out: &mut Vec<String>) {
        let pad = " ".repeat(depth * self.indent);
        let label = node
            .key()
            .map(|key| format!("\"{key}\": "))
            .unwrap_or_default();
        let sep = node.separator();
        let kind = node.kind();

        if let Some(scalar) = node.scalar() {
            out.push(format!("{pad}{label}{}{sep}", scalar.token()));
            return;
        }

        let (open, close) = (kind.open(), kind.close());
        if !node.has_child_list() {
            out.push(format!("{pad}{label}{open}{close}{sep}"));
        } else if node.is_collapsed() {
            out.push(format!("{pad}{label}{open}{ELLIPSIS}{close}{sep}"));
        } else {
            out.push(format!("{pad}{label}{open}"));
            for child in node.children() {
                self.write_node(child, depth + 1, out);
            }
            out.push(format!("{pad}{close}{sep}"));
        }
    }
}
