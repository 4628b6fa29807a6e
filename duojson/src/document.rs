// SPDX-License-Identifier: Apache-2.0

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::handler::Handler;
use crate::input::{ReadStream, StringReadStream};
use crate::parse_error::ParseError;
use crate::parser::Parser;
use crate::value::{Member, Value};

/// A container whose closing event has not arrived yet.
#[derive(Debug)]
enum Frame {
    Array(Vec<Value>),
    Object {
        members: Vec<Member>,
        /// Key waiting for its value
        key: Option<Arc<str>>,
    },
}

impl Frame {
    /// Whether the next event must be an object key.
    fn wants_key(&self) -> bool {
        matches!(self, Frame::Object { key: None, .. })
    }

    fn push(&mut self, value: Value) {
        match self {
            Frame::Array(elements) => elements.push(value),
            Frame::Object { members, key } => match key.take() {
                Some(k) => members.push(Member::new(k, value)),
                None => match &value {
                    Value::String(s) => *key = Some(Arc::clone(s)),
                    _ => panic!("miss quotation mark"),
                },
            },
        }
    }
}

/// Tree-building state, kept apart from the parser so both can be borrowed
/// at once.
#[derive(Debug, Default)]
struct Builder {
    root: Value,
    stack: Vec<Frame>,
    seen_root: bool,
}

impl Builder {
    fn reset(&mut self) {
        self.root = Value::Null;
        self.stack.clear();
        self.seen_root = false;
    }

    fn claim_root(&mut self) {
        assert!(!self.seen_root, "root not singular");
        self.seen_root = true;
    }

    fn add(&mut self, value: Value) -> bool {
        match self.stack.last_mut() {
            Some(frame) => frame.push(value),
            None => {
                self.claim_root();
                self.root = value;
            }
        }
        true
    }

    fn open(&mut self, frame: Frame) -> bool {
        match self.stack.last() {
            Some(top) => assert!(!top.wants_key(), "miss quotation mark"),
            None => self.claim_root(),
        }
        self.stack.push(frame);
        log::trace!("opened container at depth {}", self.stack.len());
        true
    }

    fn close(&mut self, value: Value) -> bool {
        log::trace!("closed container at depth {}", self.stack.len() + 1);
        match self.stack.last_mut() {
            Some(parent) => parent.push(value),
            None => self.root = value,
        }
        true
    }
}

impl Handler for Builder {
    fn null(&mut self) -> bool {
        self.add(Value::Null)
    }

    fn bool(&mut self, b: bool) -> bool {
        self.add(Value::Bool(b))
    }

    fn int32(&mut self, i: i32) -> bool {
        self.add(Value::Int32(i))
    }

    fn int64(&mut self, i: i64) -> bool {
        self.add(Value::Int64(i))
    }

    fn double(&mut self, d: f64) -> bool {
        self.add(Value::Double(d))
    }

    fn string(&mut self, s: &str) -> bool {
        self.add(Value::from(s))
    }

    fn key(&mut self, s: &str) -> bool {
        self.add(Value::from(s))
    }

    fn start_object(&mut self) -> bool {
        self.open(Frame::Object {
            members: Vec::new(),
            key: None,
        })
    }

    fn end_object(&mut self) -> bool {
        match self.stack.pop() {
            Some(Frame::Object { members, key: None }) => {
                self.close(Value::Object(Arc::new(members)))
            }
            Some(Frame::Object { key: Some(k), .. }) => panic!("key {k:?} has no value"),
            Some(Frame::Array(_)) => panic!("end_object closes an array"),
            None => panic!("end_object without start_object"),
        }
    }

    fn start_array(&mut self) -> bool {
        self.open(Frame::Array(Vec::new()))
    }

    fn end_array(&mut self) -> bool {
        match self.stack.pop() {
            Some(Frame::Array(elements)) => self.close(Value::Array(Arc::new(elements))),
            Some(Frame::Object { .. }) => panic!("end_array closes an object"),
            None => panic!("end_array without start_array"),
        }
    }
}

/// A [`Value`] tree that can be filled from JSON text or from handler events.
///
/// `Document` dereferences to its root [`Value`], so the whole tree API is
/// available on it directly. As a [`Handler`] it accepts exactly one root
/// value; containers are built bottom-up and attached to their parent when
/// they close.
///
/// ```
/// use duojson::Document;
///
/// let mut doc = Document::new();
/// doc.parse(r#"{"a":1,"b":[true,null]}"#).unwrap();
/// assert_eq!(doc["a"].get_int32(), 1);
/// assert_eq!(doc["b"].get_size(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Document {
    builder: Builder,
    parser: Parser,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with the value parsed from `json`.
    pub fn parse(&mut self, json: &str) -> Result<(), ParseError> {
        self.parse_stream(&mut StringReadStream::from(json))
    }

    pub fn parse_bytes(&mut self, json: &[u8]) -> Result<(), ParseError> {
        self.parse_stream(&mut StringReadStream::new(json))
    }

    /// Replaces the contents with the value parsed from `is`.
    ///
    /// On error the document is left `null`.
    pub fn parse_stream<R: ReadStream + ?Sized>(&mut self, is: &mut R) -> Result<(), ParseError> {
        self.builder.reset();
        match self.parser.parse(is, &mut self.builder) {
            Ok(()) => {
                log::debug!("document built, root is {:?}", self.builder.root.get_type());
                Ok(())
            }
            Err(e) => {
                self.builder.reset();
                Err(e)
            }
        }
    }

    pub fn into_value(self) -> Value {
        self.builder.root
    }
}

impl Deref for Document {
    type Target = Value;

    fn deref(&self) -> &Value {
        &self.builder.root
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Value {
        &mut self.builder.root
    }
}

/// Building directly from events continues the tree started by earlier
/// events; call [`Document::parse`] or start from [`Document::new`] for a
/// fresh one.
impl Handler for Document {
    fn null(&mut self) -> bool {
        self.builder.null()
    }

    fn bool(&mut self, b: bool) -> bool {
        self.builder.bool(b)
    }

    fn int32(&mut self, i: i32) -> bool {
        self.builder.int32(i)
    }

    fn int64(&mut self, i: i64) -> bool {
        self.builder.int64(i)
    }

    fn double(&mut self, d: f64) -> bool {
        self.builder.double(d)
    }

    fn string(&mut self, s: &str) -> bool {
        self.builder.string(s)
    }

    fn key(&mut self, s: &str) -> bool {
        self.builder.key(s)
    }

    fn start_object(&mut self) -> bool {
        self.builder.start_object()
    }

    fn end_object(&mut self) -> bool {
        self.builder.end_object()
    }

    fn start_array(&mut self) -> bool {
        self.builder.start_array()
    }

    fn end_array(&mut self) -> bool {
        self.builder.end_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::StringWriteStream;
    use crate::parse_error::ErrorKind;
    use crate::value::ValueType;
    use crate::writer::Writer;
    use test_log::test;

    fn parsed(json: &str) -> Document {
        let mut doc = Document::new();
        doc.parse(json).unwrap_or_else(|e| panic!("{json:?}: {e}"));
        doc
    }

    fn to_json(value: &Value) -> String {
        let mut writer = Writer::new(StringWriteStream::new());
        assert!(value.write_to(&mut writer));
        writer.into_inner().into_string()
    }

    #[test]
    fn test_scalar_documents() {
        assert!(parsed("null").is_null());
        assert_eq!(parsed(" 42 ").get_int32(), 42);
        assert_eq!(parsed("42i64").get_type(), ValueType::Int64);
        assert_eq!(parsed("\"s\"").get_string(), "s");
        assert!(parsed("NaN").get_double().is_nan());
    }

    #[test]
    fn test_nested_document() {
        let doc = parsed(r#"{"a": [1, {"b": null}], "c": {}, "d": "e"}"#);
        assert_eq!(doc.get_size(), 3);
        assert_eq!(doc["a"][0].get_int32(), 1);
        assert!(doc["a"][1]["b"].is_null());
        assert_eq!(doc["c"].get_type(), ValueType::Object);
        assert_eq!(doc["d"].get_string(), "e");
        assert_eq!(
            to_json(&doc),
            r#"{"a":[1,{"b":null}],"c":{},"d":"e"}"#
        );
    }

    #[test]
    fn test_duplicate_keys_from_text_are_kept() {
        let doc = parsed(r#"{"k": 1, "k": 2}"#);
        assert_eq!(doc.get_size(), 2);
        assert_eq!(doc["k"].get_int32(), 1);
        assert_eq!(doc.members()[1].value().get_int32(), 2);
    }

    #[test]
    fn test_parse_replaces_previous_contents() {
        let mut doc = parsed("[1, 2, 3]");
        doc.parse(r#"{"x": true}"#).unwrap();
        assert!(doc["x"].get_bool());

        doc.parse_bytes(b"  7").unwrap();
        assert_eq!(doc.get_int32(), 7);
    }

    #[test]
    fn test_failed_parse_leaves_null() {
        let mut doc = parsed("[1]");
        let err = doc.parse("[1, 2,]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);
        assert!(doc.is_null());

        let err = doc.parse("1 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RootNotSingular);
        assert!(doc.is_null());
    }

    #[test]
    fn test_events_build_document() {
        let mut doc = Document::new();
        doc.start_object();
        doc.key("list");
        doc.start_array();
        doc.int64(1 << 33);
        doc.double(0.5);
        doc.end_array();
        doc.key("s");
        doc.string("v");
        doc.end_object();

        assert_eq!(doc["list"][0].get_int64(), 1 << 33);
        assert_eq!(doc["list"][1].get_double(), 0.5);
        assert_eq!(doc["s"].get_string(), "v");
    }

    #[test]
    fn test_document_is_a_value() {
        let mut doc = parsed(r#"{"a": 1}"#);
        doc.add_member("b", "two");
        doc["a"].set_int64(-1);
        let value = doc.into_value();
        assert_eq!(to_json(&value), r#"{"a":-1,"b":"two"}"#);
    }

    const DEEP: usize = 100_000;

    fn depth_of(value: &Value) -> usize {
        let mut depth = 0;
        let mut cur = value;
        loop {
            cur = match cur {
                Value::Array(a) if !a.is_empty() => &a[0],
                Value::Object(o) if !o.is_empty() => o[0].value(),
                _ => return depth,
            };
            depth += 1;
        }
    }

    #[test]
    fn test_deep_array_builds_and_drops() {
        let json = "[".repeat(DEEP) + "0" + &"]".repeat(DEEP);
        let doc = parsed(&json);
        assert_eq!(depth_of(&doc), DEEP);
        drop(doc);
    }

    #[test]
    fn test_deep_object_builds_and_drops() {
        let json = r#"{"k":"#.repeat(DEEP) + "null" + &"}".repeat(DEEP);
        let mut doc = parsed(&json);
        assert_eq!(depth_of(&doc), DEEP);
        doc.parse("[]").unwrap();
        assert_eq!(doc.get_size(), 0);
    }

    #[test]
    fn test_failed_parse_discards_deep_tree() {
        let mut doc = Document::new();
        let json = "[".repeat(DEEP) + &"]".repeat(DEEP) + " x";
        let err = doc.parse(&json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RootNotSingular);
        assert!(doc.is_null());

        let unclosed = "[".repeat(DEEP) + "1,";
        assert!(doc.parse(&unclosed).is_err());
        assert!(doc.is_null());
    }

    #[test]
    fn test_deep_value_outlives_document() {
        let json = "[".repeat(DEEP) + &"]".repeat(DEEP);
        let value = parsed(&json).into_value();
        assert_eq!(depth_of(&value), DEEP - 1);
        drop(value);
    }

    #[test]
    #[should_panic(expected = "root not singular")]
    fn test_second_root_event_panics() {
        let mut doc = Document::new();
        doc.null();
        doc.null();
    }

    #[test]
    #[should_panic(expected = "miss quotation mark")]
    fn test_non_string_key_event_panics() {
        let mut doc = Document::new();
        doc.start_object();
        doc.start_array();
    }

    #[test]
    #[should_panic(expected = "end_array closes an object")]
    fn test_mismatched_end_panics() {
        let mut doc = Document::new();
        doc.start_object();
        doc.end_array();
    }
}
