//! # Evaluation Stack
//!
//! Tracks where the validation engine currently is: the path into the
//! instance, and a stack of schema frames. A frame is pushed for the root
//! schema and for every `$ref` followed; each frame holds its document URI
//! and the path into that document.
//!
//! Pushes and pops are strictly paired around every descent. The stack is
//! only read when a violation is reported.

use jsv_core::JsonPointer;

use crate::result::ValidationError;

#[derive(Debug)]
struct Frame {
    uri: String,
    tokens: Vec<String>,
}

/// Per-call location tracker.
#[derive(Debug, Default)]
pub struct EvalStack {
    instance: Vec<String>,
    frames: Vec<Frame>,
}

impl EvalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schema frames, i.e. one plus the current `$ref` depth.
    pub fn schema_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_instance_token(&mut self, token: impl Into<String>) {
        self.instance.push(token.into());
    }

    pub fn pop_instance_token(&mut self) {
        self.instance.pop();
    }

    pub fn push_schema(&mut self, uri: impl Into<String>, tokens: Vec<String>) {
        self.frames.push(Frame {
            uri: uri.into(),
            tokens,
        });
    }

    pub fn pop_schema(&mut self) {
        self.frames.pop();
    }

    pub fn push_schema_token(&mut self, token: impl Into<String>) {
        debug_assert!(!self.frames.is_empty(), "schema token pushed without a frame");
        if let Some(frame) = self.frames.last_mut() {
            frame.tokens.push(token.into());
        }
    }

    pub fn pop_schema_token(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.tokens.pop();
        }
    }

    /// A violation at the current location.
    pub fn error(&self) -> ValidationError {
        let (schema_uri, schema_path) = match self.frames.last() {
            Some(frame) => (
                frame.uri.clone(),
                JsonPointer::from_tokens(frame.tokens.iter().cloned()),
            ),
            None => (String::new(), JsonPointer::root()),
        };
        ValidationError {
            instance_path: JsonPointer::from_tokens(self.instance.iter().cloned()),
            schema_path,
            schema_uri,
        }
    }
}
