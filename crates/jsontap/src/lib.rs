//! Incremental extraction of nested structures from streaming JSON.
//!
//! `jsontap` tokenizes a JSON byte stream chunk by chunk and hands the raw
//! text of caller-selected substructures to callbacks the moment those
//! structures close, without ever building a document tree or re-scanning
//! bytes it has already seen. Chunks may split the input anywhere,
//! including inside a string escape, a number, or a `true`/`false`/`null`
//! literal, which makes it a good fit for chunked HTTP bodies and other
//! continuously arriving JSON.
//!
//! Structures are selected by path patterns: a sequence of member names
//! and stringified array indices, where `"*"` matches any single name at
//! its depth.
//!
//! ```rust
//! use std::{cell::RefCell, rc::Rc};
//!
//! use jsontap::{ExtractorOptions, StreamingExtractor, pattern};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let mut parser = StreamingExtractor::new(ExtractorOptions::default());
//! parser.on_structure(pattern!["items", "*"], move |text, path| {
//!     sink.borrow_mut().push((text.to_owned(), path.to_vec()));
//!     Ok(())
//! });
//!
//! // Chunk boundaries may fall anywhere, even inside a token.
//! parser.write(br#"{"items": [{"id"#)?;
//! parser.write(br#"": 1}, {"id": 2}]}"#)?;
//! parser.finish()?;
//!
//! assert_eq!(seen.borrow().len(), 2);
//! assert_eq!(seen.borrow()[0].0, r#"{"id": 1}"#);
//! assert_eq!(seen.borrow()[1].1, ["items", "1"]);
//! # Ok::<(), jsontap::ParserError>(())
//! ```
//!
//! The whole input is retained in one growing buffer until
//! [`StreamingExtractor::finish`], so that a structure opened many chunks
//! ago can still be sliced out when it closes. This trades memory for
//! constant-overhead extraction and is intended for moderately sized
//! streamed documents.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod accumulator;
mod error;
mod escape_buffer;
mod extractor;
mod options;
mod pattern;
mod tokenizer;
mod tracker;

#[cfg(test)]
mod tests;

pub use error::{CallbackError, ParserError};
pub use extractor::StreamingExtractor;
pub use options::ExtractorOptions;
pub use pattern::{Segment, SegmentFrom};

#[doc(hidden)]
pub use alloc::vec;

/// Macro to build a `Vec<Segment>` pattern from a heterogeneous list of
/// names, indices, and wildcards.
///
/// String segments convert with [`Segment::from`], so `"*"` becomes a
/// wildcard; integer segments become their stringified form, matching how
/// array indices appear in paths.
///
/// ```rust
/// # use jsontap::{Segment, pattern};
/// let p = pattern!["items", 0, "*"];
/// assert_eq!(
///     p,
///     vec![
///         Segment::Key("items".into()),
///         Segment::Key("0".into()),
///         Segment::Wildcard,
///     ]
/// );
/// ```
#[macro_export]
macro_rules! pattern {
    ( $( $segment:expr ),* $(,)? ) => {{
        use $crate::SegmentFrom;
        $crate::vec![$($crate::Segment::from_segment($segment)),*]
    }};
}
