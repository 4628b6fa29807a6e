// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use crate::handler::Handler;
use crate::number_format::{
    format_f64, format_i32, format_i64, F64_MAX_LEN, I32_MAX_LEN, I64_MAX_LEN,
};
use crate::output::WriteStream;
use crate::value::ValueType;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// One open container.
#[derive(Debug, Clone, Copy)]
struct Level {
    in_array: bool,
    /// Events received inside this container; keys count too
    value_count: usize,
}

/// A [`Handler`] that serializes the events it receives as compact JSON.
///
/// Separators are inserted automatically: `,` between array elements and
/// object members, `:` between a key and its value. Feeding it an event
/// sequence that is not a single well-formed value is a programming error and
/// panics.
///
/// ```
/// use duojson::{Handler, StringWriteStream, Writer};
///
/// let mut writer = Writer::new(StringWriteStream::new());
/// writer.start_array();
/// writer.int32(1);
/// writer.string("two");
/// writer.end_array();
/// assert_eq!(writer.into_inner().as_str(), r#"[1,"two"]"#);
/// ```
#[derive(Debug)]
pub struct Writer<W: WriteStream> {
    os: W,
    stack: Vec<Level>,
    seen_value: bool,
}

impl<W: WriteStream> Writer<W> {
    pub fn new(os: W) -> Self {
        Self {
            os,
            stack: Vec::new(),
            seen_value: false,
        }
    }

    /// Whether one complete root value has been written.
    pub fn is_complete(&self) -> bool {
        self.seen_value && self.stack.is_empty()
    }

    pub fn into_inner(self) -> W {
        self.os
    }

    /// Emits whatever separator must precede a value of type `ty`.
    ///
    /// # Panics
    /// On a second root value, or a non-string at an object key position.
    fn prefix(&mut self, ty: ValueType) {
        if self.seen_value {
            assert!(!self.stack.is_empty(), "root not singular");
        } else {
            self.seen_value = true;
        }

        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if top.in_array {
            if top.value_count > 0 {
                self.os.put_byte(b',');
            }
        } else if top.value_count % 2 == 1 {
            self.os.put_byte(b':');
        } else {
            assert!(ty == ValueType::String, "miss quotation mark");
            if top.value_count > 0 {
                self.os.put_byte(b',');
            }
        }
        top.value_count += 1;
    }

    fn write_string(&mut self, s: &str) {
        self.os.put_byte(b'"');
        let bytes = s.as_bytes();
        let mut unicode = *b"\\u0000";
        let mut run_start = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            let escape: &[u8] = match byte {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                0x08 => b"\\b",
                0x0C => b"\\f",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x00..=0x1F => {
                    unicode[4] = HEX_DIGITS[(byte >> 4) as usize];
                    unicode[5] = HEX_DIGITS[(byte & 0xF) as usize];
                    &unicode
                }
                _ => continue,
            };
            self.os.put(&bytes[run_start..i]);
            self.os.put(escape);
            run_start = i + 1;
        }
        self.os.put(&bytes[run_start..]);
        self.os.put_byte(b'"');
    }

    fn end_level(&mut self, in_array: bool) {
        match self.stack.pop() {
            Some(level) => {
                assert_eq!(
                    level.in_array, in_array,
                    "closing bracket does not match the open container"
                );
                assert!(level.in_array || level.value_count % 2 == 0, "key has no value");
            }
            None => panic!("no open container to close"),
        }
    }
}

impl<W: WriteStream> Handler for Writer<W> {
    fn null(&mut self) -> bool {
        self.prefix(ValueType::Null);
        self.os.put(b"null");
        true
    }

    fn bool(&mut self, b: bool) -> bool {
        self.prefix(ValueType::Bool);
        let text: &[u8] = if b { b"true" } else { b"false" };
        self.os.put(text);
        true
    }

    fn int32(&mut self, i: i32) -> bool {
        self.prefix(ValueType::Int32);
        let mut buf = [0u8; I32_MAX_LEN];
        self.os.put(format_i32(i, &mut buf));
        true
    }

    fn int64(&mut self, i: i64) -> bool {
        self.prefix(ValueType::Int64);
        let mut buf = [0u8; I64_MAX_LEN];
        self.os.put(format_i64(i, &mut buf));
        true
    }

    fn double(&mut self, d: f64) -> bool {
        self.prefix(ValueType::Double);
        let mut buf = [0u8; F64_MAX_LEN];
        self.os.put(format_f64(d, &mut buf));
        true
    }

    fn string(&mut self, s: &str) -> bool {
        self.prefix(ValueType::String);
        self.write_string(s);
        true
    }

    fn key(&mut self, s: &str) -> bool {
        self.prefix(ValueType::String);
        self.write_string(s);
        true
    }

    fn start_object(&mut self) -> bool {
        self.prefix(ValueType::Object);
        self.stack.push(Level {
            in_array: false,
            value_count: 0,
        });
        self.os.put_byte(b'{');
        true
    }

    fn end_object(&mut self) -> bool {
        self.end_level(false);
        self.os.put_byte(b'}');
        true
    }

    fn start_array(&mut self) -> bool {
        self.prefix(ValueType::Array);
        self.stack.push(Level {
            in_array: true,
            value_count: 0,
        });
        self.os.put_byte(b'[');
        true
    }

    fn end_array(&mut self) -> bool {
        self.end_level(true);
        self.os.put_byte(b']');
        true
    }
}
