use alloc::{string::String, vec::Vec};

use crate::{error::ParserError, tokenizer::TokenSink};

/// A tokenizer event, captured for equality assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    ObjectStart(usize),
    ObjectEnd(usize),
    ArrayStart(usize),
    ArrayEnd(usize),
    Comma(usize),
    String(String),
}

/// Records the tokenizer's event stream.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) events: Vec<Event>,
}

impl TokenSink for RecordingSink {
    fn on_object_start(&mut self, pos: usize) -> Result<(), ParserError> {
        self.events.push(Event::ObjectStart(pos));
        Ok(())
    }

    fn on_object_end(&mut self, pos: usize) -> Result<(), ParserError> {
        self.events.push(Event::ObjectEnd(pos));
        Ok(())
    }

    fn on_array_start(&mut self, pos: usize) -> Result<(), ParserError> {
        self.events.push(Event::ArrayStart(pos));
        Ok(())
    }

    fn on_array_end(&mut self, pos: usize) -> Result<(), ParserError> {
        self.events.push(Event::ArrayEnd(pos));
        Ok(())
    }

    fn on_comma(&mut self, pos: usize) -> Result<(), ParserError> {
        self.events.push(Event::Comma(pos));
        Ok(())
    }

    fn on_string(&mut self, value: String) -> Result<(), ParserError> {
        self.events.push(Event::String(value));
        Ok(())
    }
}
