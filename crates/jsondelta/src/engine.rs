//! The stream-driving state machine.
//!
//! [`DeltaStream`] owns every piece of per-document state and coordinates
//! the two views of the incoming text: the raw buffer scanned for string
//! increments, and the tokenizer that reports structural truth. Each fed
//! chunk runs to completion synchronously and returns the deltas it
//! produced, in token arrival order.

use tracing::{debug, trace};

use crate::accumulator::Accumulator;
use crate::array_track::ArrayTracker;
use crate::delta::{Delta, DeltaBuilder};
use crate::error::StreamError;
use crate::increments::StringIncrements;
use crate::schema::SchemaValidator;
use crate::tokenizer::{JsonTokenizer, StructuralToken, TokenSource, TokenizeError};
use crate::value::Value;

/// Incremental JSON-to-delta decoder for a single document.
///
/// Construct one per document, [`feed`](DeltaStream::feed) chunks as they
/// arrive, then [`flush`](DeltaStream::flush) once to validate the completed
/// value against the schema supplied at construction. The instance is
/// single-use; `flush` consumes it.
///
/// # Examples
///
/// ```
/// use jsondelta::DeltaStream;
///
/// let schema = r#"{"type":"object","properties":{"content":{"type":"string"}}}"#;
/// let mut stream = DeltaStream::new(schema)?;
///
/// let deltas = stream.feed(r#"{"content":"Hel"#)?;
/// assert_eq!(deltas[0].to_string(), r#"{"content":"Hel"}"#);
///
/// let deltas = stream.feed(r#"lo"}"#)?;
/// assert_eq!(deltas[0].to_string(), r#"{"content":"lo"}"#);
///
/// stream.flush()?;
/// # Ok::<(), jsondelta::StreamError>(())
/// ```
#[derive(Debug)]
pub struct DeltaStream<S: TokenSource = JsonTokenizer> {
    validator: SchemaValidator,
    source: S,

    increments: StringIncrements,
    arrays: ArrayTracker,
    deltas: DeltaBuilder,
    accumulator: Accumulator,

    /// Field names from the root to the innermost open non-element object.
    field_path: Vec<String>,
    /// The member whose value is being read or streamed.
    current_field: Option<String>,
    /// A field's `:` has gone by and no value token has arrived yet.
    awaiting_value: bool,

    /// First tokenizer fault, latched; the instance refuses further input.
    failed: Option<TokenizeError>,
}

impl DeltaStream {
    /// Creates an engine backed by the built-in tokenizer.
    ///
    /// # Errors
    ///
    /// [`StreamError::Configuration`] when `schema_source` is blank or does
    /// not compile as a JSON Schema.
    pub fn new(schema_source: &str) -> Result<Self, StreamError> {
        Self::with_source(schema_source, JsonTokenizer::new())
    }
}

impl<S: TokenSource> DeltaStream<S> {
    /// Creates an engine reading structural tokens from `source`.
    ///
    /// # Errors
    ///
    /// [`StreamError::Configuration`] when `schema_source` is blank or does
    /// not compile as a JSON Schema.
    pub fn with_source(schema_source: &str, source: S) -> Result<Self, StreamError> {
        let validator = SchemaValidator::new(schema_source)?;
        debug!("schema compiled, engine ready");
        Ok(Self {
            validator,
            source,
            increments: StringIncrements::new(),
            arrays: ArrayTracker::new(),
            deltas: DeltaBuilder::new(),
            accumulator: Accumulator::new(),
            field_path: Vec::new(),
            current_field: None,
            awaiting_value: false,
            failed: None,
        })
    }

    /// Feeds one chunk and returns the deltas it produced, in order.
    ///
    /// An empty chunk is a no-op. Partial or incomplete-looking JSON is
    /// never an error — the engine simply reports what it can determine so
    /// far.
    ///
    /// # Errors
    ///
    /// [`StreamError::Decoding`] when the tokenizer rejects the text as
    /// malformed. The error is latched: every later call reports it again.
    pub fn feed(&mut self, chunk: &str) -> Result<Vec<Delta>, StreamError> {
        if chunk.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(err) = &self.failed {
            return Err(err.clone().into());
        }

        self.deltas.clear();

        let chunk_start = self.increments.begin_chunk(chunk);
        if self.increments.in_string() {
            self.emit_increment(chunk_start);
        }

        self.source.feed(chunk);
        self.drain_tokens().map_err(|err| {
            self.failed = Some(err.clone());
            StreamError::from(err)
        })?;

        let deltas = self.deltas.take();
        trace!(chunk_len = chunk.len(), deltas = deltas.len(), "chunk processed");
        Ok(deltas)
    }

    /// Ends the stream: drains whatever tokens remain and, if the document
    /// is structurally complete, validates it against the schema.
    ///
    /// The returned list is always empty on success; deltas are only ever
    /// reported from [`feed`](DeltaStream::feed).
    ///
    /// # Errors
    ///
    /// [`StreamError::Validation`] when the completed document violates the
    /// schema, [`StreamError::Decoding`] when the trailing input was
    /// malformed (a merely truncated document is not an error — validation
    /// is skipped for it).
    pub fn flush(mut self) -> Result<Vec<Delta>, StreamError> {
        if let Some(err) = self.failed {
            return Err(err.into());
        }

        self.deltas.clear();
        self.source.finish();

        match self.drain_tokens() {
            Ok(()) => {}
            Err(err) if err.is_unexpected_eof() => {
                debug!(error = %err, "stream ended before the document completed");
            }
            Err(err) => return Err(err.into()),
        }

        if self.accumulator.is_complete() {
            if let Some(root) = self.accumulator.root() {
                self.validator.validate(&Value::Object(root.clone()))?;
            }
            debug!("document complete, schema validation passed");
        } else {
            debug!("document structurally incomplete at flush, validation skipped");
        }

        Ok(Vec::new())
    }

    /// The document as reconstructed so far: the root object, whether still
    /// open or already closed. `None` before the first `{` has been read.
    #[must_use]
    pub fn document(&self) -> Option<&crate::value::Map> {
        self.accumulator.root()
    }

    fn drain_tokens(&mut self) -> Result<(), TokenizeError> {
        while let Some(token) = self.source.next_token()? {
            self.handle_token(token);
        }

        // The tokenizer has gone quiet. If a value is due and no string has
        // been noticed yet, the raw buffer may already hold its opening
        // quote and first characters.
        if self.awaiting_value && !self.increments.in_string() {
            if let Some(start) = self.increments.detect_string_start() {
                self.emit_increment(start);
            }
        }

        Ok(())
    }

    fn handle_token(&mut self, token: StructuralToken) {
        match token {
            StructuralToken::ObjectBegin => self.handle_object_begin(),
            StructuralToken::ObjectEnd => self.handle_object_end(),
            StructuralToken::FieldName { name } => {
                self.current_field = Some(name);
                self.awaiting_value = true;
            }
            StructuralToken::String(value) => {
                self.handle_string_complete(value);
                self.awaiting_value = false;
            }
            StructuralToken::Integer(n) => {
                if self.arrays.is_index_field(self.current_field.as_deref()) {
                    self.arrays.set_index(n);
                }
                self.emit_delta(Value::Integer(n));
                self.store_field(Value::Integer(n));
                self.awaiting_value = false;
            }
            StructuralToken::Float(n) => {
                self.emit_delta(Value::Float(n));
                self.store_field(Value::Float(n));
                self.awaiting_value = false;
            }
            StructuralToken::Boolean(b) => {
                self.emit_delta(Value::Boolean(b));
                self.store_field(Value::Boolean(b));
                self.awaiting_value = false;
            }
            StructuralToken::Null => {
                self.emit_delta(Value::Null);
                self.store_field(Value::Null);
                self.awaiting_value = false;
            }
            StructuralToken::ArrayBegin { name } => {
                let name = name.or_else(|| self.current_field.clone());
                self.arrays.start_array(name);
                self.awaiting_value = false;
            }
            StructuralToken::ArrayEnd => self.arrays.end_array(),
        }
    }

    fn handle_object_begin(&mut self) {
        if self.accumulator.depth() == 0 && !self.accumulator.is_complete() {
            // The root object, created exactly once.
            self.accumulator.begin_object(None);
        } else if self.arrays.in_array() {
            self.arrays.start_element();
            self.accumulator.begin_object(None);
        } else {
            self.field_path
                .push(self.current_field.clone().unwrap_or_default());
            self.accumulator.begin_object(self.current_field.clone());
        }
        self.awaiting_value = false;
    }

    fn handle_object_end(&mut self) {
        if self.arrays.in_element() {
            self.arrays.end_element();
            if let Some(element) = self.accumulator.pop_element() {
                if let Some(field) = self.arrays.field_name() {
                    self.accumulator.append_element(field, element);
                }
            }
        } else if self.accumulator.depth() > 1 {
            self.accumulator.attach_nested();
            self.field_path.pop();
        } else {
            self.accumulator.close_root();
        }
    }

    fn handle_string_complete(&mut self, full_value: String) {
        if let Some(remaining) = self.increments.complete(&full_value) {
            self.emit_delta(Value::String(remaining));
        }
        self.store_field(Value::String(full_value));
    }

    fn emit_increment(&mut self, from: usize) {
        if let Some(increment) = self.increments.extract_increment(from) {
            self.emit_delta(Value::String(increment));
        }
    }

    fn emit_delta(&mut self, value: Value) {
        let Some(field) = self.current_field.clone() else {
            return;
        };

        if self.arrays.in_element() {
            if let Some(array_field) = self.arrays.field_name() {
                let index = self.arrays.current_index();
                self.deltas
                    .add_array_element(&field, value, &self.field_path, array_field, index);
                return;
            }
        }

        self.deltas.add(&field, value, &self.field_path);
    }

    fn store_field(&mut self, value: Value) {
        if let Some(field) = self.current_field.as_deref() {
            self.accumulator.set_field(field, value);
        }
    }
}
