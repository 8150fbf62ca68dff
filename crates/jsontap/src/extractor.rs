//! The public streaming surface: feed chunks, register taps, finish.

use alloc::{boxed::Box, string::String, vec::Vec};

use log::{debug, trace};

use crate::{
    accumulator::Accumulator,
    error::{CallbackError, ParserError},
    options::ExtractorOptions,
    pattern::Segment,
    tokenizer::{TokenSink, Tokenizer},
    tracker::PathTracker,
};

/// An incremental JSON parser that delivers the raw text of registered
/// structures as they close.
///
/// Feed input with [`write`](Self::write) as it arrives, in chunks of any
/// size and alignment; register interest in paths with
/// [`on_structure`](Self::on_structure); call [`finish`](Self::finish)
/// once the stream ends. Callbacks run synchronously inside the `write`
/// call in which their structure closes.
///
/// Each instance is fully independent and single-threaded; any error
/// poisons the instance, which must then be discarded.
///
/// # Examples
///
/// ```rust
/// use jsontap::{StreamingExtractor, pattern};
///
/// let mut parser = StreamingExtractor::default();
/// parser.on_structure(pattern!["user"], |text, _path| {
///     assert_eq!(text, r#"{"name": "ada"}"#);
///     Ok(())
/// });
/// parser.write(br#"{"user": {"name": "ada"}}"#)?;
/// parser.finish()?;
/// # Ok::<(), jsontap::ParserError>(())
/// ```
#[derive(Debug)]
pub struct StreamingExtractor {
    tokenizer: Tokenizer,
    tracker: PathTracker,
    buffer: Accumulator,
}

impl Default for StreamingExtractor {
    fn default() -> Self {
        Self::new(ExtractorOptions::default())
    }
}

impl StreamingExtractor {
    /// Creates a new extractor with the given options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsontap::{ExtractorOptions, StreamingExtractor};
    ///
    /// let parser = StreamingExtractor::new(ExtractorOptions {
    ///     max_depth: Some(128),
    ///     initial_buffer_capacity: 16 * 1024,
    /// });
    /// ```
    #[must_use]
    pub fn new(options: ExtractorOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            tracker: PathTracker::new(options.max_depth),
            buffer: Accumulator::with_capacity(options.initial_buffer_capacity),
        }
    }

    /// Registers `callback` for every structure whose path matches
    /// `pattern`, returning `&mut Self` for chaining.
    ///
    /// A pattern is anything iterable over segment-convertible items:
    /// string literals (`"*"` is the wildcard), owned strings, integers
    /// (stringified, as array indices appear in paths), or
    /// [`Segment`] values; the [`pattern!`](macro@crate::pattern) macro builds
    /// mixed lists. An empty pattern matches the document root structure.
    ///
    /// The callback receives the structure's raw text (the exact bytes
    /// between its delimiters, inclusive) and its path. Registering the
    /// same pattern again appends to that pattern's callback list; when a
    /// structure satisfies several patterns, every list runs, patterns in
    /// first-registration order and each list in registration order. There
    /// is no unregistration.
    ///
    /// A callback error aborts the `write` that triggered it and poisons
    /// the parser.
    pub fn on_structure<P, F>(&mut self, pattern: P, callback: F) -> &mut Self
    where
        P: IntoIterator,
        P::Item: Into<Segment>,
        F: FnMut(&str, &[String]) -> Result<(), CallbackError> + 'static,
    {
        let pattern: Vec<Segment> = pattern.into_iter().map(Into::into).collect();
        self.tracker.register(pattern, Box::new(callback));
        self
    }

    /// Feeds one chunk of the JSON byte stream.
    ///
    /// The chunk is retained until [`finish`](Self::finish) so that
    /// structures spanning many chunks can be sliced when they close.
    /// Callbacks for structures closing within this chunk run before
    /// `write` returns.
    ///
    /// # Errors
    ///
    /// Any lexical, UTF-8, depth, or callback error; all are fatal to the
    /// instance.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), ParserError> {
        let base = self.buffer.append(chunk);
        trace!("write: {} bytes at offset {base}", chunk.len());
        let mut sink = Dispatch {
            tracker: &mut self.tracker,
            buffer: &self.buffer,
        };
        self.tokenizer.advance(chunk, &mut sink)
    }

    /// Signals end of input, consuming the parser.
    ///
    /// A number still open at this point is closed first, since numbers have no
    /// terminating byte of their own. Consuming `self` releases the
    /// retained input; no structure can close after `finish`, so nothing
    /// can still need it.
    ///
    /// # Errors
    ///
    /// [`ParserError::UnexpectedEndOfInput`] when the document is
    /// incomplete: the stream ends inside a string, literal, or escape, or
    /// structures remain unclosed.
    pub fn finish(mut self) -> Result<(), ParserError> {
        self.tokenizer.end()?;
        if self.tracker.open_frames() > 0 {
            return Err(ParserError::UnexpectedEndOfInput);
        }
        debug!("stream finished after {} bytes", self.buffer.len());
        Ok(())
    }
}

/// Routes tokenizer events into the path tracker, lending it read access
/// to the retained bytes for slicing on close.
struct Dispatch<'a> {
    tracker: &'a mut PathTracker,
    buffer: &'a Accumulator,
}

impl TokenSink for Dispatch<'_> {
    fn on_object_start(&mut self, pos: usize) -> Result<(), ParserError> {
        self.tracker.open_object(pos)
    }

    fn on_object_end(&mut self, pos: usize) -> Result<(), ParserError> {
        self.tracker.close(pos, self.buffer)
    }

    fn on_array_start(&mut self, pos: usize) -> Result<(), ParserError> {
        self.tracker.open_array(pos)
    }

    fn on_array_end(&mut self, pos: usize) -> Result<(), ParserError> {
        self.tracker.close(pos, self.buffer)
    }

    fn on_comma(&mut self, _pos: usize) -> Result<(), ParserError> {
        self.tracker.comma();
        Ok(())
    }

    fn on_string(&mut self, value: String) -> Result<(), ParserError> {
        self.tracker.string_completed(value);
        Ok(())
    }
}
