// SPDX-License-Identifier: Apache-2.0

//! A SAX-style JSON parser.
//!
//! The parser pulls bytes from a [`ReadStream`] and pushes events into a
//! [`Handler`]. Beyond RFC 8259 it accepts `NaN`, `Infinity` and `-Infinity`
//! as doubles, and `i32` / `i64` suffixes on integer literals.

use alloc::vec::Vec;

use crate::handler::Handler;
use crate::input::{ReadStream, StringReadStream};
use crate::int_parser::{from_ascii_i32, from_ascii_i64, IntError};
use crate::parse_error::{ErrorKind, ParseError};

/// Returns `UserStopped` from the enclosing function when a handler call returns `false`.
macro_rules! call {
    ($is:expr, $event:expr) => {
        if !$event {
            return Err(ParseError::new(ErrorKind::UserStopped, $is.position()));
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Container {
    Array,
    Object,
}

/// The width a number literal will be delivered as.
#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberKind {
    /// Integral text without a suffix: `int32` if it fits, else `int64`.
    Integer,
    Int32,
    Int64,
    Double,
}

/// Which literal word is being matched.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Literal {
    Null,
    True,
    False,
    NaN,
    Infinity,
    NegInfinity,
}

impl Literal {
    fn text(self) -> &'static [u8] {
        match self {
            Literal::Null => b"null",
            Literal::True => b"true",
            Literal::False => b"false",
            Literal::NaN => b"NaN",
            Literal::Infinity | Literal::NegInfinity => b"Infinity",
        }
    }
}

/// A streaming JSON parser.
///
/// Nesting is tracked on an explicit stack rather than by recursion, so deep
/// documents cost heap, not call stack. String bodies are decoded into a
/// scratch buffer that is reused across strings and across parses.
#[derive(Debug, Default)]
pub struct Parser {
    /// Open containers, innermost last
    stack: Vec<Container>,
    /// Decoded bytes of the string being read
    scratch: Vec<u8>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses exactly one JSON value from `is`, surrounded by optional
    /// whitespace, and reports it to `handler`.
    ///
    /// The first error ends the parse; events already delivered stay delivered.
    ///
    /// A finite literal too large for `f64` is [`ErrorKind::NumberTooBig`],
    /// while one too small rounds toward zero and parses.
    pub fn parse<R, H>(&mut self, is: &mut R, handler: &mut H) -> Result<(), ParseError>
    where
        R: ReadStream + ?Sized,
        H: Handler + ?Sized,
    {
        self.stack.clear();
        let result = self.parse_document(is, handler);
        if let Err(e) = &result {
            log::debug!("parse failed: {} (depth {})", e, self.stack.len());
        }
        result
    }

    fn parse_document<R, H>(&mut self, is: &mut R, handler: &mut H) -> Result<(), ParseError>
    where
        R: ReadStream + ?Sized,
        H: Handler + ?Sized,
    {
        skip_whitespace(is);
        self.parse_value(is, handler)?;
        skip_whitespace(is);
        if is.has_next() {
            return Err(ParseError::new(ErrorKind::RootNotSingular, is.position()));
        }
        Ok(())
    }

    /// Parses one complete value, including everything nested inside it.
    fn parse_value<R, H>(&mut self, is: &mut R, handler: &mut H) -> Result<(), ParseError>
    where
        R: ReadStream + ?Sized,
        H: Handler + ?Sized,
    {
        'value: loop {
            if !is.has_next() {
                return Err(ParseError::new(ErrorKind::ExpectValue, is.position()));
            }
            match is.peek() {
                b'[' => {
                    call!(is, handler.start_array());
                    is.assert_next(b'[');
                    skip_whitespace(is);
                    if is.peek() == b']' {
                        is.next();
                        call!(is, handler.end_array());
                    } else {
                        self.stack.push(Container::Array);
                        continue 'value;
                    }
                }
                b'{' => {
                    call!(is, handler.start_object());
                    is.assert_next(b'{');
                    skip_whitespace(is);
                    if is.peek() == b'}' {
                        is.next();
                        call!(is, handler.end_object());
                    } else {
                        self.stack.push(Container::Object);
                        self.parse_member_key(is, handler)?;
                        continue 'value;
                    }
                }
                b'"' => self.parse_string(is, handler, false)?,
                b'n' => parse_literal(is, handler, Literal::Null)?,
                b't' => parse_literal(is, handler, Literal::True)?,
                b'f' => parse_literal(is, handler, Literal::False)?,
                b'N' => parse_literal(is, handler, Literal::NaN)?,
                b'I' => parse_literal(is, handler, Literal::Infinity)?,
                _ => parse_number(is, handler)?,
            }

            // A value just ended: close every container it completes, or move
            // on to the next element or member.
            while let Some(&top) = self.stack.last() {
                skip_whitespace(is);
                let pos = is.position();
                match (top, is.next()) {
                    (Container::Array, b',') => {
                        skip_whitespace(is);
                        continue 'value;
                    }
                    (Container::Array, b']') => {
                        self.stack.pop();
                        call!(is, handler.end_array());
                    }
                    (Container::Array, _) => {
                        return Err(ParseError::new(ErrorKind::MissCommaOrSquareBracket, pos));
                    }
                    (Container::Object, b',') => {
                        skip_whitespace(is);
                        self.parse_member_key(is, handler)?;
                        continue 'value;
                    }
                    (Container::Object, b'}') => {
                        self.stack.pop();
                        call!(is, handler.end_object());
                    }
                    (Container::Object, _) => {
                        return Err(ParseError::new(ErrorKind::MissCommaOrCurlyBracket, pos));
                    }
                }
            }
            return Ok(());
        }
    }

    /// Reads `"key"`, the colon, and the whitespace up to the member's value.
    fn parse_member_key<R, H>(&mut self, is: &mut R, handler: &mut H) -> Result<(), ParseError>
    where
        R: ReadStream + ?Sized,
        H: Handler + ?Sized,
    {
        if is.peek() != b'"' {
            return Err(ParseError::new(ErrorKind::MissKey, is.position()));
        }
        self.parse_string(is, handler, true)?;
        skip_whitespace(is);
        let pos = is.position();
        if is.next() != b':' {
            return Err(ParseError::new(ErrorKind::MissColon, pos));
        }
        skip_whitespace(is);
        Ok(())
    }

    fn parse_string<R, H>(
        &mut self,
        is: &mut R,
        handler: &mut H,
        is_key: bool,
    ) -> Result<(), ParseError>
    where
        R: ReadStream + ?Sized,
        H: Handler + ?Sized,
    {
        let start = is.position();
        is.assert_next(b'"');
        self.scratch.clear();

        while is.has_next() {
            let pos = is.position();
            match is.next() {
                b'"' => {
                    let s = core::str::from_utf8(&self.scratch)
                        .map_err(|_| ParseError::new(ErrorKind::BadStringChar, start))?;
                    if is_key {
                        call!(is, handler.key(s));
                    } else {
                        call!(is, handler.string(s));
                    }
                    return Ok(());
                }
                0x01..=0x1F => return Err(ParseError::new(ErrorKind::BadStringChar, pos)),
                b'\\' => {
                    let escape_pos = is.position();
                    let unescaped = match is.next() {
                        b'"' => b'"',
                        b'\\' => b'\\',
                        b'/' => b'/',
                        b'b' => 0x08,
                        b'f' => 0x0C,
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'u' => {
                            let scalar = parse_unicode_escape(is)?;
                            encode_utf8(&mut self.scratch, scalar);
                            continue;
                        }
                        _ => return Err(ParseError::new(ErrorKind::BadStringEscape, escape_pos)),
                    };
                    self.scratch.push(unescaped);
                }
                byte => self.scratch.push(byte),
            }
        }
        Err(ParseError::new(ErrorKind::MissQuotationMark, is.position()))
    }
}

/// Parses one JSON value from `is` into `handler` with a fresh [`Parser`].
pub fn parse<R, H>(is: &mut R, handler: &mut H) -> Result<(), ParseError>
where
    R: ReadStream + ?Sized,
    H: Handler + ?Sized,
{
    Parser::new().parse(is, handler)
}

/// Parses JSON text held in memory.
pub fn parse_str<H: Handler + ?Sized>(json: &str, handler: &mut H) -> Result<(), ParseError> {
    parse(&mut StringReadStream::from(json), handler)
}

fn skip_whitespace<R: ReadStream + ?Sized>(is: &mut R) {
    while matches!(is.peek(), b' ' | b'\t' | b'\n' | b'\r') {
        is.next();
    }
}

fn parse_literal<R, H>(is: &mut R, handler: &mut H, literal: Literal) -> Result<(), ParseError>
where
    R: ReadStream + ?Sized,
    H: Handler + ?Sized,
{
    for &expected in literal.text() {
        if is.peek() != expected {
            return Err(ParseError::new(ErrorKind::BadValue, is.position()));
        }
        is.next();
    }
    match literal {
        Literal::Null => call!(is, handler.null()),
        Literal::True => call!(is, handler.bool(true)),
        Literal::False => call!(is, handler.bool(false)),
        Literal::NaN => call!(is, handler.double(f64::NAN)),
        Literal::Infinity => call!(is, handler.double(f64::INFINITY)),
        Literal::NegInfinity => call!(is, handler.double(f64::NEG_INFINITY)),
    }
    Ok(())
}

fn consume_digits<R: ReadStream + ?Sized>(is: &mut R) {
    while is.peek().is_ascii_digit() {
        is.next();
    }
}

fn parse_number<R, H>(is: &mut R, handler: &mut H) -> Result<(), ParseError>
where
    R: ReadStream + ?Sized,
    H: Handler + ?Sized,
{
    let start = is.position();
    let bad_value = |pos| ParseError::new(ErrorKind::BadValue, pos);

    if is.peek() == b'-' {
        is.next();
        if is.peek() == b'I' {
            return parse_literal(is, handler, Literal::NegInfinity);
        }
    }

    match is.peek() {
        b'0' => {
            is.next();
            if is.peek().is_ascii_digit() {
                return Err(bad_value(is.position()));
            }
        }
        b'1'..=b'9' => {
            is.next();
            consume_digits(is);
        }
        _ => return Err(bad_value(is.position())),
    }

    let mut kind = NumberKind::Integer;

    if is.peek() == b'.' {
        kind = NumberKind::Double;
        is.next();
        if !is.peek().is_ascii_digit() {
            return Err(bad_value(is.position()));
        }
        consume_digits(is);
    }

    if matches!(is.peek(), b'e' | b'E') {
        kind = NumberKind::Double;
        is.next();
        if matches!(is.peek(), b'+' | b'-') {
            is.next();
        }
        if !is.peek().is_ascii_digit() {
            return Err(bad_value(is.position()));
        }
        consume_digits(is);
    }

    let end = is.position();

    if is.peek() == b'i' {
        let suffix_pos = is.position();
        is.next();
        if kind == NumberKind::Double {
            return Err(bad_value(suffix_pos));
        }
        kind = match (is.next(), is.next()) {
            (b'3', b'2') => NumberKind::Int32,
            (b'6', b'4') => NumberKind::Int64,
            _ => return Err(bad_value(suffix_pos)),
        };
    }

    let text = is.slice(start, end);
    let int_error = |e: IntError| match e {
        IntError::Overflow => ParseError::new(ErrorKind::NumberTooBig, start),
        IntError::NoDigits | IntError::InvalidDigit => bad_value(start),
    };

    match kind {
        NumberKind::Double => {
            let d = core::str::from_utf8(text)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| bad_value(start))?;
            if d.is_infinite() {
                return Err(ParseError::new(ErrorKind::NumberTooBig, start));
            }
            call!(is, handler.double(d));
        }
        NumberKind::Int32 => {
            let i = from_ascii_i32(text).map_err(int_error)?;
            call!(is, handler.int32(i));
        }
        NumberKind::Int64 => {
            let i = from_ascii_i64(text).map_err(int_error)?;
            call!(is, handler.int64(i));
        }
        NumberKind::Integer => {
            let i = from_ascii_i64(text).map_err(int_error)?;
            match i32::try_from(i) {
                Ok(small) => call!(is, handler.int32(small)),
                Err(_) => call!(is, handler.int64(i)),
            }
        }
    }
    Ok(())
}

fn parse_hex4<R: ReadStream + ?Sized>(is: &mut R) -> Result<u32, ParseError> {
    let mut code = 0u32;
    for _ in 0..4 {
        let pos = is.position();
        let digit = char::from(is.next())
            .to_digit(16)
            .ok_or(ParseError::new(ErrorKind::BadUnicodeHex, pos))?;
        code = (code << 4) | digit;
    }
    Ok(code)
}

/// Reads the `XXXX` after `\u`, plus a trailing `\uXXXX` low surrogate when
/// the first unit is a high surrogate, and returns the scalar value.
fn parse_unicode_escape<R: ReadStream + ?Sized>(is: &mut R) -> Result<u32, ParseError> {
    let surrogate_error = |pos| ParseError::new(ErrorKind::BadUnicodeSurrogate, pos);
    let pos = is.position();
    let high = parse_hex4(is)?;
    match high {
        0xD800..=0xDBFF => {
            let low_pos = is.position();
            if is.next() != b'\\' || is.next() != b'u' {
                return Err(surrogate_error(low_pos));
            }
            let low = parse_hex4(is)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(surrogate_error(low_pos));
            }
            Ok(0x10000 + (high - 0xD800) * 0x400 + (low - 0xDC00))
        }
        // A low surrogate with no high surrogate in front of it
        0xDC00..=0xDFFF => Err(surrogate_error(pos)),
        _ => Ok(high),
    }
}

/// Appends the UTF-8 encoding of a scalar value.
fn encode_utf8(buf: &mut Vec<u8>, u: u32) {
    match u {
        0x00..=0x7F => buf.push(u as u8),
        0x80..=0x7FF => {
            buf.push(0xC0 | (u >> 6) as u8);
            buf.push(0x80 | (u & 0x3F) as u8);
        }
        0x800..=0xFFFF => {
            buf.push(0xE0 | (u >> 12) as u8);
            buf.push(0x80 | ((u >> 6) & 0x3F) as u8);
            buf.push(0x80 | (u & 0x3F) as u8);
        }
        _ => {
            debug_assert!(u <= 0x10FFFF, "scalar out of range");
            buf.push(0xF0 | (u >> 18) as u8);
            buf.push(0x80 | ((u >> 12) & 0x3F) as u8);
            buf.push(0x80 | ((u >> 6) & 0x3F) as u8);
            buf.push(0x80 | (u & 0x3F) as u8);
        }
    }
}
