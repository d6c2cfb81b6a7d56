//! Structural comparison of syntax trees, ignoring source positions.
//!
//! Two parses of differently formatted text produce different spans, so
//! tree equality for round-trip checks goes through the JSON form with every
//! `span` field removed.

use crate::ast::SourceFile;

/// Remove every `span` key, recursively.
pub fn strip_spans(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.remove("span");
            for v in map.values_mut() {
                strip_spans(v);
            }
        }
        serde_json::Value::Array(items) => {
            for v in items {
                strip_spans(v);
            }
        }
        _ => {}
    }
}

/// The tree as JSON without positions.
pub fn shape(file: &SourceFile) -> serde_json::Value {
    let mut value = serde_json::to_value(file).unwrap_or(serde_json::Value::Null);
    strip_spans(&mut value);
    value
}

pub fn same_tree(a: &SourceFile, b: &SourceFile) -> bool {
    shape(a) == shape(b)
}

/// Panics with both shapes pretty-printed when the trees differ.
pub fn assert_same_tree(a: &SourceFile, b: &SourceFile) {
    let (left, right) = (shape(a), shape(b));
    if left != right {
        panic!(
            "trees differ\n--- left ---\n{}\n--- right ---\n{}",
            serde_json::to_string_pretty(&left).unwrap_or_default(),
            serde_json::to_string_pretty(&right).unwrap_or_default()
        );
    }
}
