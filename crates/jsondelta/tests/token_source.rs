//! Drives the engine with a scripted token source, exercising dispatch and
//! delta construction independently of the built-in tokenizer.

mod common;

use std::collections::VecDeque;

use common::rendered;
use jsondelta::tokenizer::{StructuralToken, TokenSource, TokenizeError};
use jsondelta::{DeltaStream, Value};

/// Replays a fixed token script, one batch per fed chunk.
struct ScriptedSource {
    batches: VecDeque<Vec<StructuralToken>>,
    current: VecDeque<StructuralToken>,
    finished: bool,
}

impl ScriptedSource {
    fn new(batches: Vec<Vec<StructuralToken>>) -> Self {
        Self {
            batches: batches.into(),
            current: VecDeque::new(),
            finished: false,
        }
    }
}

impl TokenSource for ScriptedSource {
    fn feed(&mut self, _text: &str) {
        if let Some(batch) = self.batches.pop_front() {
            self.current.extend(batch);
        }
    }

    fn next_token(&mut self) -> Result<Option<StructuralToken>, TokenizeError> {
        Ok(self.current.pop_front())
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn field(name: &str) -> StructuralToken {
    StructuralToken::FieldName { name: name.into() }
}

#[test]
fn scripted_tokens_drive_the_same_delta_shapes() {
    use StructuralToken::{ArrayBegin, ArrayEnd, Integer, ObjectBegin, ObjectEnd, String};

    let script = vec![vec![
        ObjectBegin,
        field("meta"),
        ObjectBegin,
        field("kind"),
        String("report".into()),
        ObjectEnd,
        field("rows"),
        ArrayBegin {
            name: Some("rows".into()),
        },
        ObjectBegin,
        field("value"),
        String("A".into()),
        ObjectEnd,
        ArrayEnd,
        field("total"),
        Integer(1),
        ObjectEnd,
    ]];

    let mut stream =
        DeltaStream::with_source(common::SIMPLE_SCHEMA, ScriptedSource::new(script)).unwrap();

    // The chunk text is irrelevant here; only the scripted tokens matter.
    let deltas = stream.feed("ignored").unwrap();
    assert_eq!(
        rendered(&deltas),
        [
            r#"{"meta":{"kind":"report"}}"#,
            r#"{"rows":[{"index":0,"value":"A"}]}"#,
            r#"{"total":1}"#,
        ]
    );

    let doc = stream.document().unwrap();
    assert_eq!(
        doc.get("meta")
            .and_then(Value::as_object)
            .and_then(|m| m.get("kind"))
            .and_then(Value::as_str),
        Some("report")
    );
    assert_eq!(doc.get("total").and_then(Value::as_i64), Some(1));

    stream.flush().unwrap();
}

#[test]
fn explicit_index_from_scripted_tokens_rebases_numbering() {
    use StructuralToken::{ArrayBegin, ArrayEnd, Integer, ObjectBegin, ObjectEnd, String};

    let script = vec![vec![
        ObjectBegin,
        field("items"),
        ArrayBegin {
            name: Some("items".into()),
        },
        ObjectBegin,
        field("index"),
        Integer(3),
        field("value"),
        String("A".into()),
        ObjectEnd,
        ObjectBegin,
        field("value"),
        String("B".into()),
        ObjectEnd,
        ArrayEnd,
        ObjectEnd,
    ]];

    let mut stream =
        DeltaStream::with_source(common::SIMPLE_SCHEMA, ScriptedSource::new(script)).unwrap();
    let deltas = stream.feed("ignored").unwrap();

    assert_eq!(
        rendered(&deltas),
        [
            r#"{"items":[{"index":3}]}"#,
            r#"{"items":[{"index":3,"value":"A"}]}"#,
            r#"{"items":[{"index":4,"value":"B"}]}"#,
        ]
    );
}
