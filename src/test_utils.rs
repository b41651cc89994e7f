//! Utilities to help writing tests.
//!
//! This module is only compiled for test runs.

use std::fmt;
use std::ops::Deref;

use crate::config::Config;
use crate::context::Context;
use crate::document::{Document, Line, TextDocument};
use crate::events::{EventEmitter, EventType};

/// A [`Context`] with in-memory preferences and a tracker for its events.
pub(crate) struct TestContext {
    pub ctx: Context,
    evtracker: EventEmitter,
}

impl fmt::Debug for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestContext")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl TestContext {
    /// Creates a new [`TestContext`] with default configuration.
    pub fn new() -> Self {
        let ctx = Context::default();
        let evtracker = ctx.get_event_emitter();
        Self { ctx, evtracker }
    }

    /// Creates a new [`TestContext`] with the given configuration values.
    ///
    /// Panics if a value is rejected.
    pub fn with_config(values: &[(Config, &str)]) -> Self {
        let t = Self::new();
        for (key, value) in values {
            t.set_config(*key, Some(value))
                .unwrap_or_else(|err| panic!("cannot set {key}: {err:#}"));
        }
        t
    }

    /// Drains all events emitted so far.
    pub fn take_events(&self) -> Vec<EventType> {
        let mut events = Vec::new();
        while let Some(event) = self.evtracker.try_recv() {
            events.push(event.typ);
        }
        events
    }
}

impl Deref for TestContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.ctx
    }
}

/// Builds a plain-text document from lines in their rendered form, e.g. `"> > quoted"`.
pub(crate) fn text_document(lines: &[&str]) -> TextDocument {
    TextDocument::new(lines.iter().map(|line| Line::parse(line)).collect())
}

/// Renders all document lines back to text.
pub(crate) fn rendered_lines(doc: &impl Document) -> Vec<String> {
    (0..doc.line_count())
        .filter_map(|index| doc.line(index).map(|line| line.to_string()))
        .collect()
}
