use alloc::{boxed::Box, format, string::String};

use thiserror::Error;

/// Error type a structure callback may return.
///
/// A callback error aborts the `write` or `finish` call that triggered the
/// dispatch and is surfaced as [`ParserError::Callback`].
pub type CallbackError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Errors produced while feeding or finishing a JSON stream.
///
/// Every variant is fatal to the parser instance: no resynchronization is
/// attempted, and further writes keep failing. The caller owns the stream
/// and must discard the instance.
#[derive(Debug, Error)]
pub enum ParserError {
    /// A byte had no valid transition from the current tokenizer state.
    ///
    /// Covers malformed escapes, invalid literal spellings, and invalid
    /// number continuations.
    #[error("unexpected byte {} at position {position}", display_byte(.byte))]
    UnexpectedByte {
        /// The offending byte.
        byte: u8,
        /// Absolute position of the byte within the stream.
        position: usize,
    },

    /// The input ended mid-token or with structures still open.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// A `\uXXXX` escape named a code point that is not a Unicode scalar
    /// value (for example a surrogate half).
    #[error("invalid unicode escape \\u{code:04X} at position {position}")]
    InvalidUnicodeEscape {
        /// The decoded code point.
        code: u32,
        /// Absolute position of the escape's final hex digit.
        position: usize,
    },

    /// A completed string literal or an extracted byte range was not valid
    /// UTF-8.
    #[error("invalid UTF-8 at position {position}")]
    InvalidUtf8 {
        /// Absolute position at which decoding was attempted.
        position: usize,
    },

    /// Opening one more structure would exceed the configured
    /// [`max_depth`](crate::ExtractorOptions::max_depth).
    #[error("maximum structure depth {limit} exceeded at position {position}")]
    DepthLimitExceeded {
        /// The configured depth limit.
        limit: usize,
        /// Absolute position of the opening delimiter that was rejected.
        position: usize,
    },

    /// A structure callback returned an error.
    #[error("structure callback failed: {0}")]
    Callback(#[source] CallbackError),
}

/// Renders a byte the way it would appear in JSON source where possible,
/// falling back to hex for non-printable values.
fn display_byte(byte: &u8) -> String {
    match *byte {
        b'\n' => String::from("'\\n'"),
        b'\r' => String::from("'\\r'"),
        b'\t' => String::from("'\\t'"),
        0x08 => String::from("'\\b'"),
        0x0C => String::from("'\\f'"),
        b'\\' => String::from("'\\\\'"),
        b'\'' => String::from("'\\''"),
        printable @ 0x20..=0x7E => format!("'{}'", printable as char),
        other => format!("{other:#04x}"),
    }
}
