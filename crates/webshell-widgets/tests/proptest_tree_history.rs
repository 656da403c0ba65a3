//! Property tests for the JSON tree renderer, string escaping, and the
//! history buffer state machine.

use proptest::prelude::*;
use serde_json::{Map, Value};
use webshell_widgets::history::HistoryBuffer;
use webshell_widgets::json_tree::{NodeKind, RenderNode, TreeLines, is_numeric_key};
use webshell_widgets::text::{escape_string, unescape_string};

// =============================================================================
// Strategies
// =============================================================================

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("finite", |f| f.is_finite())
            .prop_map(Value::from),
        ".{0,12}".prop_map(Value::String),
    ]
}

/// JSON values whose object keys never read as numbers.
fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z_]{1,8}", inner), 0..6).prop_map(|entries| {
                Value::Object(entries.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    })
}

fn count_values(value: &Value) -> usize {
    1 + match value {
        Value::Array(items) => items.iter().map(count_values).sum(),
        Value::Object(map) => map.values().map(count_values).sum(),
        _ => 0,
    }
}

fn check_structure(node: &RenderNode, value: &Value) -> Result<(), TestCaseError> {
    match value {
        Value::Array(items) => {
            prop_assert_eq!(node.kind(), NodeKind::Array);
            prop_assert_eq!(node.children().len(), items.len());
            for (child, item) in node.children().iter().zip(items) {
                prop_assert!(child.key().is_none());
                check_structure(child, item)?;
            }
        }
        Value::Object(map) => {
            prop_assert_eq!(node.kind(), NodeKind::Object);
            prop_assert_eq!(node.children().len(), map.len());
            for (child, (key, item)) in node.children().iter().zip(map) {
                prop_assert_eq!(child.key(), Some(key.as_str()));
                check_structure(child, item)?;
            }
        }
        _ => prop_assert_eq!(node.kind(), NodeKind::Scalar),
    }
    Ok(())
}

fn check_separators(node: &RenderNode) -> Result<(), TestCaseError> {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        prop_assert_eq!(child.is_last_sibling(), last);
        prop_assert_eq!(child.separator(), if last { "" } else { "," });
        check_separators(child)?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum HistoryOp {
    Add(String),
    Older,
    Newer,
}

fn history_op() -> impl Strategy<Value = HistoryOp> {
    prop_oneof![
        "[a-z]{1,4}".prop_map(HistoryOp::Add),
        Just(HistoryOp::Older),
        Just(HistoryOp::Newer),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn children_mirror_value(value in json_value()) {
        let root = RenderNode::from_value(&value);
        check_structure(&root, &value)?;
        prop_assert_eq!(root.node_count(), count_values(&value));
    }

    #[test]
    fn only_last_sibling_lacks_separator(value in json_value()) {
        let root = RenderNode::from_value(&value);
        prop_assert!(root.is_last_sibling());
        check_separators(&root)?;
    }

    #[test]
    fn escape_roundtrip(s in any::<String>()) {
        prop_assert_eq!(unescape_string(&escape_string(&s)), s);
    }

    #[test]
    fn toggling_twice_restores_lines(value in json_value(), pick in any::<prop::sample::Index>()) {
        let mut root = RenderNode::from_value(&value);
        let before = TreeLines::new().lines(&root);
        let top = root.children().len();
        let path: Vec<usize> = if top == 0 { Vec::new() } else { vec![pick.index(top)] };
        let changed = root.toggle_at(&path);
        root.toggle_at(&path);
        prop_assert_eq!(TreeLines::new().lines(&root), before);
        let target_is_container = root.node_at(&path).is_some_and(RenderNode::is_container);
        prop_assert_eq!(changed, target_is_container);
    }

    #[test]
    fn collapsed_root_hides_everything(value in json_value()) {
        let mut root = RenderNode::from_value(&value);
        if root.set_collapsed(true) {
            prop_assert_eq!(root.visible_count(), 1);
            prop_assert_eq!(TreeLines::new().lines(&root).len(), 1);
        }
    }

    #[test]
    fn alphabetic_keys_are_never_numeric(key in "[a-zA-Z_]{1,12}") {
        prop_assert!(!is_numeric_key(&key));
    }

    #[test]
    fn integer_keys_are_numeric(n in any::<i64>()) {
        prop_assert!(is_numeric_key(&n.to_string()));
    }

    #[test]
    fn history_cursor_stays_in_bounds(ops in prop::collection::vec(history_op(), 0..64)) {
        let mut history = HistoryBuffer::new();
        for op in ops {
            let recalled = match op {
                HistoryOp::Add(entry) => {
                    history.add(entry);
                    prop_assert_eq!(history.cursor(), history.len() as isize);
                    continue;
                }
                HistoryOp::Older => history.recall_older().to_string(),
                HistoryOp::Newer => history.recall_newer().to_string(),
            };
            let cursor = history.cursor();
            prop_assert!(cursor >= -1 && cursor <= history.len() as isize);
            let expected = usize::try_from(cursor)
                .ok()
                .and_then(|i| history.entries().get(i))
                .cloned()
                .unwrap_or_default();
            prop_assert_eq!(recalled, expected);
        }
    }

    #[test]
    fn walking_back_replays_newest_first(entries in prop::collection::vec("[a-z]{1,4}", 1..10)) {
        let mut history = HistoryBuffer::new();
        for entry in &entries {
            history.add(entry.clone());
        }
        for entry in entries.iter().rev() {
            prop_assert_eq!(history.recall_older(), entry.as_str());
        }
        prop_assert_eq!(history.recall_older(), "");
        for entry in &entries {
            prop_assert_eq!(history.recall_newer(), entry.as_str());
        }
        prop_assert_eq!(history.recall_newer(), "");
    }
}
