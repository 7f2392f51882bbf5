//! Flattening of nested skill containers
//!
//! A character's skill data may group skills into categories, sub-lists and
//! keyed maps to any depth. Flattening walks that tree depth-first and keeps
//! every node that carries a `system` record section, in document order.

use serde_json::{Map, Value};
use tracing::warn;

/// Field whose presence (as an object) marks a node as a skill leaf
pub const RECORD_MARKER: &str = "system";

/// A skill leaf found in the container, before projection
#[derive(Debug, Clone, PartialEq)]
pub struct RawSkillEntry {
    leaf: Value,
}

impl RawSkillEntry {
    /// The internal record section of the leaf
    pub fn system(&self) -> Option<&Map<String, Value>> {
        self.leaf.get(RECORD_MARKER).and_then(Value::as_object)
    }

    /// Read one field of the record section
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.system().and_then(|s| s.get(key))
    }

    /// The whole leaf node as it appeared in the container
    pub fn as_value(&self) -> &Value {
        &self.leaf
    }
}

/// How a single container node is treated by the walk
enum Node<'a> {
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Leaf,
    Ignored,
}

fn classify(value: &Value) -> Node<'_> {
    match value {
        Value::Array(items) => Node::Sequence(items),
        Value::Object(map) => {
            if map.get(RECORD_MARKER).is_some_and(Value::is_object) {
                Node::Leaf
            } else {
                Node::Mapping(map)
            }
        }
        _ => Node::Ignored,
    }
}

/// Whether `value` can hold skills at all
pub fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Flatten a skill container into its leaves, depth-first, in order
///
/// Never fails: an absent or scalar container yields an empty sequence.
pub fn flatten(container: &Value) -> Vec<RawSkillEntry> {
    if !is_container(container) {
        warn!("Skill container is not a sequence or mapping; no skills extracted");
        return Vec::new();
    }

    let mut out = Vec::new();
    // Explicit stack: adversarial nesting cannot exhaust the call stack
    let mut stack: Vec<&Value> = vec![container];

    while let Some(node) = stack.pop() {
        match classify(node) {
            Node::Leaf => out.push(RawSkillEntry { leaf: node.clone() }),
            Node::Sequence(items) => stack.extend(items.iter().rev()),
            Node::Mapping(map) => stack.extend(map.values().rev()),
            Node::Ignored => {}
        }
    }

    out
}
