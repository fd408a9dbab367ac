//! Reconstruction of the full document value as tokens arrive.
//!
//! Containers under construction live on a stack of frames; the bottom frame
//! is the root object until it closes. A nested object remembers the field
//! name it will be attached under; an array-element object carries no name
//! and is appended into the array's field in the root container when it
//! completes (one array scope — see [`crate::array_track`]).

use crate::value::{Map, Value};

#[derive(Debug)]
struct Frame {
    /// Field under which this object attaches to its parent; `None` for the
    /// root and for array elements.
    field: Option<String>,
    map: Map,
}

#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    stack: Vec<Frame>,
    /// Set once the outermost object has closed.
    root: Option<Map>,
}

impl Accumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently open.
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the document has been opened and fully closed again.
    pub(crate) fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.root.is_some()
    }

    /// The root container, whether still open or already closed.
    pub(crate) fn root(&self) -> Option<&Map> {
        self.root.as_ref().or_else(|| self.stack.first().map(|f| &f.map))
    }

    /// Opens a new object. `field` is the name it will attach under when it
    /// closes; the root and array elements pass `None`.
    pub(crate) fn begin_object(&mut self, field: Option<String>) {
        self.stack.push(Frame {
            field,
            map: Map::new(),
        });
    }

    /// Sets a scalar (or completed string) in the innermost open object.
    pub(crate) fn set_field(&mut self, field: &str, value: Value) {
        if let Some(frame) = self.stack.last_mut() {
            frame.map.insert(field.to_string(), value);
        }
    }

    /// Closes a nested object and attaches it to its parent under the name
    /// remembered at `begin_object`.
    pub(crate) fn attach_nested(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if let (Some(field), Some(parent)) = (frame.field, self.stack.last_mut()) {
            parent.map.insert(field, Value::Object(frame.map));
        }
    }

    /// Closes the outermost object; afterwards [`Accumulator::is_complete`]
    /// holds.
    pub(crate) fn close_root(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.root = Some(frame.map);
        }
    }

    /// Closes an array-element object, returning it for appending.
    pub(crate) fn pop_element(&mut self) -> Option<Map> {
        self.stack.pop().map(|frame| frame.map)
    }

    /// Appends a completed element to the array stored under `field` in the
    /// root container, creating the array on first use.
    pub(crate) fn append_element(&mut self, field: &str, element: Map) {
        let Some(root) = self.stack.first_mut().map(|f| &mut f.map) else {
            return;
        };
        let slot = root
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = slot {
            items.push(Value::Object(element));
        }
    }
}
