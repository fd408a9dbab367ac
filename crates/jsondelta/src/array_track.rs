//! Index bookkeeping for the single active array scope.
//!
//! One scope is tracked at a time: the innermost array the stream is
//! currently inside. Elements are objects; each either carries an explicit
//! integer `index` field or receives the next automatic index when it
//! closes. After an explicit index, automatic numbering continues from the
//! explicit value plus one.

#[derive(Debug, Default)]
pub(crate) struct ArrayTracker {
    in_array: bool,
    field_name: Option<String>,
    auto_index: i64,
    current_element_index: Option<i64>,
    in_element: bool,
}

impl ArrayTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_array(&self) -> bool {
        self.in_array
    }

    pub(crate) fn in_element(&self) -> bool {
        self.in_element
    }

    pub(crate) fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// Index to attach to the current element: the explicit one if it has
    /// been seen, else the next automatic value.
    pub(crate) fn current_index(&self) -> i64 {
        self.current_element_index.unwrap_or(self.auto_index)
    }

    pub(crate) fn start_array(&mut self, field_name: Option<String>) {
        self.in_array = true;
        self.field_name = field_name;
        self.auto_index = 0;
    }

    pub(crate) fn end_array(&mut self) {
        self.in_array = false;
        self.field_name = None;
        self.auto_index = 0;
        self.current_element_index = None;
    }

    pub(crate) fn start_element(&mut self) {
        self.in_element = true;
        self.current_element_index = None;
    }

    /// Closes the element, assigning the automatic index if no explicit one
    /// was recorded, and advancing the automatic counter past whichever
    /// index the element ended up with.
    pub(crate) fn end_element(&mut self) {
        self.in_element = false;
        match self.current_element_index {
            None => {
                self.current_element_index = Some(self.auto_index);
                self.auto_index += 1;
            }
            Some(explicit) => {
                self.auto_index = explicit + 1;
            }
        }
    }

    /// Records an explicit index observed inside the current element.
    pub(crate) fn set_index(&mut self, index: i64) {
        self.current_element_index = Some(index);
    }

    /// Whether `field` is the element's explicit-index carrier.
    pub(crate) fn is_index_field(&self, field: Option<&str>) -> bool {
        self.in_element && field == Some("index")
    }
}
