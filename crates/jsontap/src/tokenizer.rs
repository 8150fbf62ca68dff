//! The byte-level JSON tokenizer.
//!
//! A character-class state machine that consumes input one byte at a time
//! and emits structural events through a [`TokenSink`]. Because the state
//! (plus the in-flight string buffers) is the only thing carried between
//! calls, chunk boundaries may fall anywhere: inside a string escape, a
//! number, or a keyword literal.
//!
//! Numbers and the `true`/`false`/`null` literals emit no events of their
//! own; the machine walks them only so their bytes are not mistaken for
//! structure. A number has no terminating byte in the grammar, so the
//! machine closes it lazily: on the first byte that cannot extend it, the
//! state returns to [`State::Start`] and that same byte is re-examined
//! against `Start`'s dispatch table.

use alloc::{string::String, vec::Vec};

use log::trace;

use crate::{error::ParserError, escape_buffer::UnicodeEscapeBuffer};

/// Receiver for the tokenizer's structural events.
///
/// Events are delivered synchronously, in input order, with the absolute
/// stream offset of the delimiter byte. An error return aborts the current
/// `advance` call and latches the tokenizer.
pub(crate) trait TokenSink {
    fn on_object_start(&mut self, pos: usize) -> Result<(), ParserError>;
    fn on_object_end(&mut self, pos: usize) -> Result<(), ParserError>;
    fn on_array_start(&mut self, pos: usize) -> Result<(), ParserError>;
    fn on_array_end(&mut self, pos: usize) -> Result<(), ParserError>;
    fn on_comma(&mut self, pos: usize) -> Result<(), ParserError>;
    /// A string literal completed; `value` has all escapes resolved.
    fn on_string(&mut self, value: String) -> Result<(), ParserError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Inside `true`/`false`/`null`, holding the bytes still expected.
    Literal(&'static [u8]),
    /// After a leading `-`.
    Sign,
    /// After a leading zero. Terminal: a non-continuation byte closes the
    /// number.
    Zero,
    /// Integer digits. Terminal.
    DecimalInteger,
    /// After the decimal point.
    DecimalPoint,
    /// Fraction digits. Terminal.
    DecimalFraction,
    /// After `e`/`E`.
    DecimalExponent,
    /// After an exponent sign.
    DecimalExponentSign,
    /// Exponent digits. Terminal.
    DecimalExponentInteger,
    /// Inside a string literal.
    String,
    /// After a backslash inside a string.
    StringEscape,
    /// Inside the four hex digits of a `\uXXXX` escape.
    StringEscapeUnicode,
    /// A previous byte errored; every further byte errors too.
    Failed,
}

impl State {
    /// States in which the bytes seen so far already form a complete
    /// number.
    fn closes_number(self) -> bool {
        matches!(
            self,
            State::Zero | State::DecimalInteger | State::DecimalFraction | State::DecimalExponentInteger
        )
    }
}

#[derive(Debug)]
pub(crate) struct Tokenizer {
    state: State,
    /// Absolute position of the next byte to be consumed.
    pos: usize,
    /// Unescaped bytes of the string literal in flight.
    string: Vec<u8>,
    unicode: UnicodeEscapeBuffer,
}

impl Tokenizer {
    pub(crate) fn new() -> Self {
        Self {
            state: State::Start,
            pos: 0,
            string: Vec::new(),
            unicode: UnicodeEscapeBuffer::new(),
        }
    }

    /// Absolute position of the next byte to be consumed; equals the total
    /// number of bytes accepted so far.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Consumes one chunk, emitting events into `sink` as tokens complete.
    ///
    /// On error the tokenizer latches into a failed state and the instance
    /// must be discarded.
    pub(crate) fn advance<S: TokenSink>(
        &mut self,
        chunk: &[u8],
        sink: &mut S,
    ) -> Result<(), ParserError> {
        for &byte in chunk {
            if let Err(err) = self.step(byte, sink) {
                self.state = State::Failed;
                return Err(err);
            }
            self.pos += 1;
        }
        Ok(())
    }

    /// Signals end of input: force-closes a lazily terminated number, then
    /// requires that no token is left open.
    pub(crate) fn end(&mut self) -> Result<(), ParserError> {
        if self.state.closes_number() {
            self.state = State::Start;
        }
        if self.state == State::Start {
            trace!("tokenizer finished after {} bytes", self.pos);
            Ok(())
        } else {
            self.state = State::Failed;
            Err(ParserError::UnexpectedEndOfInput)
        }
    }

    fn step<S: TokenSink>(&mut self, byte: u8, sink: &mut S) -> Result<(), ParserError> {
        loop {
            return match self.state {
                State::Start => match byte {
                    b'{' => sink.on_object_start(self.pos),
                    b'}' => sink.on_object_end(self.pos),
                    b'[' => sink.on_array_start(self.pos),
                    b']' => sink.on_array_end(self.pos),
                    b',' => sink.on_comma(self.pos),
                    b':' => Ok(()),
                    b' ' | b'\t' | b'\n' | b'\r' => Ok(()),
                    b'"' => {
                        self.string.clear();
                        self.state = State::String;
                        Ok(())
                    }
                    b't' => {
                        self.state = State::Literal(b"rue");
                        Ok(())
                    }
                    b'f' => {
                        self.state = State::Literal(b"alse");
                        Ok(())
                    }
                    b'n' => {
                        self.state = State::Literal(b"ull");
                        Ok(())
                    }
                    b'-' => {
                        self.state = State::Sign;
                        Ok(())
                    }
                    b'0' => {
                        self.state = State::Zero;
                        Ok(())
                    }
                    b'1'..=b'9' => {
                        self.state = State::DecimalInteger;
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::Literal(rest) => match rest.split_first() {
                    Some((&expected, tail)) if byte == expected => {
                        self.state = if tail.is_empty() {
                            State::Start
                        } else {
                            State::Literal(tail)
                        };
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::Sign => match byte {
                    b'0' => {
                        self.state = State::Zero;
                        Ok(())
                    }
                    b'1'..=b'9' => {
                        self.state = State::DecimalInteger;
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::Zero => match byte {
                    b'.' => {
                        self.state = State::DecimalPoint;
                        Ok(())
                    }
                    b'e' | b'E' => {
                        self.state = State::DecimalExponent;
                        Ok(())
                    }
                    _ => {
                        // Lazy termination: re-examine this byte in Start.
                        self.state = State::Start;
                        continue;
                    }
                },

                State::DecimalInteger => match byte {
                    b'0'..=b'9' => Ok(()),
                    b'.' => {
                        self.state = State::DecimalPoint;
                        Ok(())
                    }
                    b'e' | b'E' => {
                        self.state = State::DecimalExponent;
                        Ok(())
                    }
                    _ => {
                        self.state = State::Start;
                        continue;
                    }
                },

                State::DecimalPoint => match byte {
                    b'0'..=b'9' => {
                        self.state = State::DecimalFraction;
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::DecimalFraction => match byte {
                    b'0'..=b'9' => Ok(()),
                    b'e' | b'E' => {
                        self.state = State::DecimalExponent;
                        Ok(())
                    }
                    _ => {
                        self.state = State::Start;
                        continue;
                    }
                },

                State::DecimalExponent => match byte {
                    b'+' | b'-' => {
                        self.state = State::DecimalExponentSign;
                        Ok(())
                    }
                    b'0'..=b'9' => {
                        self.state = State::DecimalExponentInteger;
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::DecimalExponentSign => match byte {
                    b'0'..=b'9' => {
                        self.state = State::DecimalExponentInteger;
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::DecimalExponentInteger => match byte {
                    b'0'..=b'9' => Ok(()),
                    _ => {
                        self.state = State::Start;
                        continue;
                    }
                },

                State::String => match byte {
                    b'"' => {
                        let value = self.take_string()?;
                        self.state = State::Start;
                        sink.on_string(value)
                    }
                    b'\\' => {
                        self.state = State::StringEscape;
                        Ok(())
                    }
                    // JSON allows 0x20..=0x10FFFF unescaped; multi-byte
                    // sequences pass through and are validated on close.
                    0x20.. => {
                        self.string.push(byte);
                        Ok(())
                    }
                    _ => Err(self.unexpected(byte)),
                },

                State::StringEscape => {
                    let unescaped = match byte {
                        b'"' => b'"',
                        b'\\' => b'\\',
                        b'/' => b'/',
                        b'b' => 0x08,
                        b'f' => 0x0C,
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'u' => {
                            self.unicode.reset();
                            self.state = State::StringEscapeUnicode;
                            return Ok(());
                        }
                        _ => return Err(self.unexpected(byte)),
                    };
                    self.string.push(unescaped);
                    self.state = State::String;
                    Ok(())
                }

                State::StringEscapeUnicode => match byte {
                    b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => match self.unicode.feed(byte) {
                        None => Ok(()),
                        Some(Ok(ch)) => {
                            let mut utf8 = [0u8; 4];
                            self.string
                                .extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
                            self.state = State::String;
                            Ok(())
                        }
                        Some(Err(code)) => Err(ParserError::InvalidUnicodeEscape {
                            code,
                            position: self.pos,
                        }),
                    },
                    _ => Err(self.unexpected(byte)),
                },

                State::Failed => Err(self.unexpected(byte)),
            };
        }
    }

    fn take_string(&mut self) -> Result<String, ParserError> {
        let bytes = core::mem::take(&mut self.string);
        String::from_utf8(bytes).map_err(|_| ParserError::InvalidUtf8 { position: self.pos })
    }

    fn unexpected(&self, byte: u8) -> ParserError {
        ParserError::UnexpectedByte {
            byte,
            position: self.pos,
        }
    }
}
