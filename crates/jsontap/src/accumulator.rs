use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::error::ParserError;

/// Retains every byte ever written to the parser so that closed structures
/// can be sliced out by the absolute offsets captured when they opened.
///
/// The buffer grows monotonically for the life of the parser: structures
/// nest arbitrarily, so the bytes backing an open-time offset must stay
/// addressable until that structure closes, potentially many chunks later.
/// Everything is released at once when the parser is finished.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    bytes: Vec<u8>,
}

impl Accumulator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Appends a chunk and returns the offset base: the absolute position
    /// of the chunk's first byte.
    pub(crate) fn append(&mut self, chunk: &[u8]) -> usize {
        let base = self.bytes.len();
        self.bytes.extend_from_slice(chunk);
        base
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Decodes the inclusive absolute byte range `[start, end]`.
    ///
    /// The range must lie within bytes appended so far.
    pub(crate) fn slice(&self, start: usize, end: usize) -> Result<&str, ParserError> {
        debug_assert!(start <= end && end < self.bytes.len());
        self.bytes[start..=end]
            .to_str()
            .map_err(|_| ParserError::InvalidUtf8 { position: start })
    }
}

#[cfg(test)]
mod tests {
    use super::Accumulator;
    use crate::error::ParserError;

    #[test]
    fn append_returns_offset_base() {
        let mut buffer = Accumulator::with_capacity(0);
        assert_eq!(buffer.append(b"abc"), 0);
        assert_eq!(buffer.append(b"defg"), 3);
        assert_eq!(buffer.append(b""), 7);
        assert_eq!(buffer.len(), 7);
    }

    #[test]
    fn slice_is_inclusive_and_spans_chunks() {
        let mut buffer = Accumulator::with_capacity(8);
        buffer.append(b"{\"a\":");
        buffer.append(b" [1]}");
        assert_eq!(buffer.slice(6, 8).unwrap(), "[1]");
        assert_eq!(buffer.slice(0, 9).unwrap(), "{\"a\": [1]}");
    }

    #[test]
    fn slice_rejects_invalid_utf8() {
        let mut buffer = Accumulator::default();
        buffer.append(b"a\xFFb");
        assert!(matches!(
            buffer.slice(0, 2),
            Err(ParserError::InvalidUtf8 { position: 0 })
        ));
    }
}
