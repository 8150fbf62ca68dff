//! Structure paths, pattern matching, and callback dispatch.
//!
//! The tracker sits on top of the tokenizer's event stream. It assigns a
//! name to every structure as it opens (the pending object key, or the
//! owning array's running index) and on close matches the resulting path
//! against every registered pattern, slicing the structure's raw text out
//! of the retained input for each match.

use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use log::trace;

use crate::{
    accumulator::Accumulator,
    error::{CallbackError, ParserError},
    pattern::Segment,
};

/// Callback invoked with the raw text and path of a matched structure.
pub(crate) type Callback = Box<dyn FnMut(&str, &[String]) -> Result<(), CallbackError>>;

/// One open structure: its assigned name and the absolute offset of its
/// opening delimiter. Array frames also carry the index awaiting their
/// next child.
#[derive(Debug)]
enum Frame {
    Object {
        name: Option<String>,
        start: usize,
    },
    Array {
        name: Option<String>,
        start: usize,
        next_index: usize,
    },
}

impl Frame {
    fn name(&self) -> Option<&String> {
        match self {
            Frame::Object { name, .. } | Frame::Array { name, .. } => name.as_ref(),
        }
    }

    fn start(&self) -> usize {
        match self {
            Frame::Object { start, .. } | Frame::Array { start, .. } => *start,
        }
    }
}

/// A registered pattern and its callbacks, both in registration order.
struct Registration {
    pattern: Vec<Segment>,
    callbacks: Vec<Callback>,
}

pub(crate) struct PathTracker {
    frames: Vec<Frame>,
    /// The most recently completed string literal. Claimed, and cleared,
    /// as the name of the next structure opening in a non-array context.
    pending_key: Option<String>,
    registrations: Vec<Registration>,
    max_depth: Option<usize>,
}

impl core::fmt::Debug for PathTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PathTracker")
            .field("frames", &self.frames)
            .field("pending_key", &self.pending_key)
            .field("registrations", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

impl PathTracker {
    pub(crate) fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            pending_key: None,
            registrations: Vec::new(),
            max_depth,
        }
    }

    /// Adds `callback` under `pattern`. Callbacks registered for an
    /// already-known pattern join its list; match dispatch runs patterns in
    /// first-registration order and each pattern's callbacks in
    /// registration order.
    pub(crate) fn register(&mut self, pattern: Vec<Segment>, callback: Callback) {
        if let Some(existing) = self
            .registrations
            .iter_mut()
            .find(|registration| registration.pattern == pattern)
        {
            existing.callbacks.push(callback);
        } else {
            self.registrations.push(Registration {
                pattern,
                callbacks: vec![callback],
            });
        }
    }

    pub(crate) fn open_object(&mut self, pos: usize) -> Result<(), ParserError> {
        let name = self.claim_name();
        self.check_depth(pos)?;
        trace!("object opens at {pos} as {name:?}");
        self.frames.push(Frame::Object { name, start: pos });
        Ok(())
    }

    pub(crate) fn open_array(&mut self, pos: usize) -> Result<(), ParserError> {
        let name = self.claim_name();
        self.check_depth(pos)?;
        trace!("array opens at {pos} as {name:?}");
        self.frames.push(Frame::Array {
            name,
            start: pos,
            next_index: 0,
        });
        Ok(())
    }

    /// The name for a structure opening now: the owning array's running
    /// index, or the pending key, or nothing (the document root).
    fn claim_name(&mut self) -> Option<String> {
        match self.frames.last() {
            Some(Frame::Array { next_index, .. }) => Some(next_index.to_string()),
            _ => self.pending_key.take(),
        }
    }

    fn check_depth(&self, pos: usize) -> Result<(), ParserError> {
        match self.max_depth {
            Some(limit) if self.frames.len() >= limit => Err(ParserError::DepthLimitExceeded {
                limit,
                position: pos,
            }),
            _ => Ok(()),
        }
    }

    /// A comma in an array context moves that array's running index past
    /// the element that just completed.
    pub(crate) fn comma(&mut self) {
        if let Some(Frame::Array { next_index, .. }) = self.frames.last_mut() {
            *next_index += 1;
        }
    }

    /// Records a completed string literal as the candidate name for the
    /// next structure. Overwrites any unconsumed predecessor.
    pub(crate) fn string_completed(&mut self, value: String) {
        self.pending_key = Some(value);
    }

    /// Handles a closing delimiter at absolute offset `end`: matches the
    /// closing structure's path against every registration, delivers the
    /// sliced text to each match's callbacks, then pops the frame.
    ///
    /// A stray closer with no open frame is ignored; the tracker follows
    /// structure boundaries but does not validate them.
    pub(crate) fn close(&mut self, end: usize, buffer: &Accumulator) -> Result<(), ParserError> {
        let Some(innermost) = self.frames.last() else {
            return Ok(());
        };
        let start = innermost.start();

        let path_len = self
            .frames
            .iter()
            .filter(|frame| frame.name().is_some())
            .count();
        if self
            .registrations
            .iter()
            .any(|registration| registration.pattern.len() == path_len)
        {
            let path: Vec<String> = self
                .frames
                .iter()
                .filter_map(|frame| frame.name().cloned())
                .collect();
            self.dispatch(start, end, &path, buffer)?;
        }

        self.frames.pop();
        Ok(())
    }

    fn dispatch(
        &mut self,
        start: usize,
        end: usize,
        path: &[String],
        buffer: &Accumulator,
    ) -> Result<(), ParserError> {
        let mut sliced: Option<&str> = None;
        for index in 0..self.registrations.len() {
            let matched = {
                let pattern = &self.registrations[index].pattern;
                pattern.len() == path.len()
                    && pattern
                        .iter()
                        .zip(path)
                        .all(|(segment, name)| segment.matches(name))
            };
            if !matched {
                continue;
            }

            let text = match sliced {
                Some(text) => text,
                None => {
                    trace!("structure [{start}, {end}] matched at {path:?}");
                    *sliced.insert(buffer.slice(start, end)?)
                }
            };
            for callback in &mut self.registrations[index].callbacks {
                callback(text, path).map_err(ParserError::Callback)?;
            }
        }
        Ok(())
    }

    /// Number of structures still open.
    pub(crate) fn open_frames(&self) -> usize {
        self.frames.len()
    }
}
