//! Construction and collection of delta objects.
//!
//! A delta is the smallest object that situates one observation in the
//! document: single-key objects nested along the field path down to
//! `{field: value}`, or, for a field inside an array element,
//! `{array_field: [{"index": i, field: value}]}` so the consumer can route
//! the fragment to the right element.

use crate::value::{Map, Value};

/// One incremental observation about the streaming document: a minimal
/// nested object mirroring the document's shape down to a single changed
/// field.
pub type Delta = Value;

/// Builds deltas and collects them in arrival order for the duration of one
/// fed chunk.
#[derive(Debug, Default)]
pub(crate) struct DeltaBuilder {
    deltas: Vec<Delta>,
}

impl DeltaBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drops anything collected for the previous chunk.
    pub(crate) fn clear(&mut self) {
        self.deltas.clear();
    }

    /// Hands the chunk's deltas to the caller, leaving the builder empty.
    pub(crate) fn take(&mut self) -> Vec<Delta> {
        core::mem::take(&mut self.deltas)
    }

    /// Records `{.. path ..{field: value}}`.
    pub(crate) fn add(&mut self, field: &str, value: Value, path: &[String]) {
        let mut leaf = Map::new();
        leaf.insert(field.to_string(), value);
        self.deltas.push(wrap_in_path(leaf, path));
    }

    /// Records `{.. path ..{array_field: [{"index": index, field: value}]}}`.
    pub(crate) fn add_array_element(
        &mut self,
        field: &str,
        value: Value,
        path: &[String],
        array_field: &str,
        index: i64,
    ) {
        let mut element = Map::new();
        element.insert("index".to_string(), Value::Integer(index));
        element.insert(field.to_string(), value);

        let mut leaf = Map::new();
        leaf.insert(
            array_field.to_string(),
            Value::Array(vec![Value::Object(element)]),
        );
        self.deltas.push(wrap_in_path(leaf, path));
    }
}

/// Wraps `leaf` under each path segment, innermost last, producing the
/// single-branch nesting shared by both delta shapes.
fn wrap_in_path(leaf: Map, path: &[String]) -> Delta {
    let mut current = leaf;
    for segment in path.iter().rev() {
        let mut outer = Map::new();
        outer.insert(segment.clone(), Value::Object(current));
        current = outer;
    }
    Value::Object(current)
}
