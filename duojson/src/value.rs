// SPDX-License-Identifier: Apache-2.0

//! The in-memory JSON tree.
//!
//! String, array and object payloads live behind an [`Arc`], so cloning a
//! [`Value`] is cheap whatever its size. Mutating access goes through
//! [`Arc::make_mut`]: a payload that is shared gets copied first, and the
//! other holders keep seeing the old contents.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::handler::Handler;

/// The variant tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Int32,
    Int64,
    Double,
    String,
    Array,
    Object,
}

/// A JSON value.
///
/// Typed accessors such as [`Value::get_int32`] expect the matching variant
/// and panic otherwise; check with the `is_*` predicates or
/// [`Value::get_type`] first when the shape of the tree is not known.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(Arc<str>),
    Array(Arc<Vec<Value>>),
    Object(Arc<Vec<Member>>),
}

/// A key and value pair inside an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Always a `Value::String`
    key: Value,
    value: Value,
}

impl Member {
    pub(crate) fn new(key: Arc<str>, value: Value) -> Self {
        Self {
            key: Value::String(key),
            value,
        }
    }

    pub fn key(&self) -> &str {
        self.key.get_string()
    }

    /// The key as a string value.
    pub fn key_value(&self) -> &Value {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }
}

impl Value {
    /// The empty value of the given type: `null`, `false`, `0`, `0.0`, `""`,
    /// `[]` or `{}`.
    pub fn new(ty: ValueType) -> Self {
        match ty {
            ValueType::Null => Value::Null,
            ValueType::Bool => Value::Bool(false),
            ValueType::Int32 => Value::Int32(0),
            ValueType::Int64 => Value::Int64(0),
            ValueType::Double => Value::Double(0.0),
            ValueType::String => Value::String(Arc::from("")),
            ValueType::Array => Value::Array(Arc::new(Vec::new())),
            ValueType::Object => Value::Object(Arc::new(Vec::new())),
        }
    }

    pub fn get_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int32(_) => ValueType::Int32,
            Value::Int64(_) => ValueType::Int64,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Number of elements or members; `1` for every scalar.
    pub fn get_size(&self) -> usize {
        match self {
            Value::Array(a) => a.len(),
            Value::Object(o) => o.len(),
            _ => 1,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_int32(&self) -> bool {
        matches!(self, Value::Int32(_))
    }

    /// True for both integer widths, since every `int32` is also an `int64`.
    pub fn is_int64(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Int64(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[cold]
    #[track_caller]
    fn type_mismatch(&self, expected: &str) -> ! {
        panic!("expected {expected}, found {:?}", self.get_type())
    }

    /// # Panics
    /// If the value is not a bool.
    #[track_caller]
    pub fn get_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            _ => self.type_mismatch("bool"),
        }
    }

    /// # Panics
    /// If the value is not an `Int32`.
    #[track_caller]
    pub fn get_int32(&self) -> i32 {
        match self {
            Value::Int32(i) => *i,
            _ => self.type_mismatch("int32"),
        }
    }

    /// Either integer width, widened to `i64`.
    ///
    /// # Panics
    /// If the value is not an integer.
    #[track_caller]
    pub fn get_int64(&self) -> i64 {
        match self {
            Value::Int32(i) => i64::from(*i),
            Value::Int64(i) => *i,
            _ => self.type_mismatch("int64"),
        }
    }

    /// # Panics
    /// If the value is not a double.
    #[track_caller]
    pub fn get_double(&self) -> f64 {
        match self {
            Value::Double(d) => *d,
            _ => self.type_mismatch("double"),
        }
    }

    /// # Panics
    /// If the value is not a string.
    #[track_caller]
    pub fn get_string(&self) -> &str {
        match self {
            Value::String(s) => s,
            _ => self.type_mismatch("string"),
        }
    }

    /// An owned copy of the string payload.
    ///
    /// # Panics
    /// If the value is not a string.
    #[track_caller]
    pub fn to_owned_string(&self) -> String {
        String::from(self.get_string())
    }

    /// # Panics
    /// If the value is not an array.
    #[track_caller]
    pub fn get_array(&self) -> &[Value] {
        match self {
            Value::Array(a) => a,
            _ => self.type_mismatch("array"),
        }
    }

    /// Mutable elements, unshared first if another value holds them too.
    ///
    /// # Panics
    /// If the value is not an array.
    #[track_caller]
    pub fn get_array_mut(&mut self) -> &mut Vec<Value> {
        match self {
            Value::Array(a) => Arc::make_mut(a),
            _ => self.type_mismatch("array"),
        }
    }

    /// Object members in insertion order.
    ///
    /// # Panics
    /// If the value is not an object.
    #[track_caller]
    pub fn members(&self) -> &[Member] {
        match self {
            Value::Object(o) => o,
            _ => self.type_mismatch("object"),
        }
    }

    /// # Panics
    /// If the value is not an object.
    #[track_caller]
    pub fn members_mut(&mut self) -> &mut [Member] {
        self.object_mut()
    }

    #[track_caller]
    fn object_mut(&mut self) -> &mut Vec<Member> {
        match self {
            Value::Object(o) => Arc::make_mut(o),
            _ => self.type_mismatch("object"),
        }
    }

    pub fn set_null(&mut self) -> &mut Value {
        self.set(Value::Null)
    }

    pub fn set_bool(&mut self, b: bool) -> &mut Value {
        self.set(Value::Bool(b))
    }

    pub fn set_int32(&mut self, i: i32) -> &mut Value {
        self.set(Value::Int32(i))
    }

    pub fn set_int64(&mut self, i: i64) -> &mut Value {
        self.set(Value::Int64(i))
    }

    pub fn set_double(&mut self, d: f64) -> &mut Value {
        self.set(Value::Double(d))
    }

    pub fn set_string(&mut self, s: &str) -> &mut Value {
        self.set(Value::from(s))
    }

    /// Replaces the value with an empty array.
    pub fn set_array(&mut self) -> &mut Value {
        self.set(Value::new(ValueType::Array))
    }

    /// Replaces the value with an empty object.
    pub fn set_object(&mut self) -> &mut Value {
        self.set(Value::new(ValueType::Object))
    }

    fn set(&mut self, value: Value) -> &mut Value {
        *self = value;
        self
    }

    /// Looks up a member by key, scanning in insertion order.
    ///
    /// # Panics
    /// If the value is not an object.
    #[track_caller]
    pub fn find_member(&self, key: &str) -> Option<&Member> {
        self.members().iter().find(|m| m.key() == key)
    }

    /// # Panics
    /// If the value is not an object.
    #[track_caller]
    pub fn find_member_mut(&mut self, key: &str) -> Option<&mut Member> {
        self.object_mut().iter_mut().find(|m| m.key() == key)
    }

    /// Appends a member and returns its value.
    ///
    /// # Panics
    /// If the value is not an object, the key is not a string, or the object
    /// already has a member with that key.
    #[track_caller]
    pub fn add_member(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> &mut Value {
        let key = match &key.into() {
            Value::String(s) => Arc::clone(s),
            other => panic!("object key must be a string, found {:?}", other.get_type()),
        };
        assert!(
            self.find_member(&key).is_none(),
            "duplicate object key {key:?}"
        );
        let members = self.object_mut();
        members.push(Member::new(key, value.into()));
        let last = members.len() - 1;
        &mut members[last].value
    }

    /// Appends an element and returns it.
    ///
    /// # Panics
    /// If the value is not an array.
    #[track_caller]
    pub fn add_value(&mut self, value: impl Into<Value>) -> &mut Value {
        let elements = self.get_array_mut();
        elements.push(value.into());
        let last = elements.len() - 1;
        &mut elements[last]
    }

    /// How many values share this payload, or `None` for inline scalars.
    pub fn ref_count(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(Arc::strong_count(s)),
            Value::Array(a) => Some(Arc::strong_count(a)),
            Value::Object(o) => Some(Arc::strong_count(o)),
            _ => None,
        }
    }

    /// Replays the tree into `handler` depth first, producing the events a
    /// parse of its serialized form would produce.
    ///
    /// Stops at, and returns `false` from, the first handler call that
    /// returns `false`.
    pub fn write_to<H: Handler + ?Sized>(&self, handler: &mut H) -> bool {
        enum Frame<'a> {
            Array(core::slice::Iter<'a, Value>),
            Object(core::slice::Iter<'a, Member>),
        }

        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut next = Some(self);
        loop {
            if let Some(value) = next.take() {
                let ok = match value {
                    Value::Null => handler.null(),
                    Value::Bool(b) => handler.bool(*b),
                    Value::Int32(i) => handler.int32(*i),
                    Value::Int64(i) => handler.int64(*i),
                    Value::Double(d) => handler.double(*d),
                    Value::String(s) => handler.string(s),
                    Value::Array(a) => {
                        stack.push(Frame::Array(a.iter()));
                        handler.start_array()
                    }
                    Value::Object(o) => {
                        stack.push(Frame::Object(o.iter()));
                        handler.start_object()
                    }
                };
                if !ok {
                    return false;
                }
            }

            let ok = match stack.last_mut() {
                None => return true,
                Some(Frame::Array(elements)) => match elements.next() {
                    Some(element) => {
                        next = Some(element);
                        true
                    }
                    None => {
                        stack.pop();
                        handler.end_array()
                    }
                },
                Some(Frame::Object(members)) => match members.next() {
                    Some(member) => {
                        next = Some(&member.value);
                        handler.key(member.key())
                    }
                    None => {
                        stack.pop();
                        handler.end_object()
                    }
                },
            };
            if !ok {
                return false;
            }
        }
    }
}

/// Moves the children of a uniquely owned container onto `pending`, leaving
/// the container empty. Scalars among them are dropped on the spot.
fn detach_children(value: &mut Value, pending: &mut Vec<Value>) {
    let is_container = |v: &Value| matches!(v, Value::Array(_) | Value::Object(_));
    match value {
        Value::Array(a) => {
            if let Some(elements) = Arc::get_mut(a) {
                pending.extend(elements.drain(..).filter(is_container));
            }
        }
        Value::Object(o) => {
            if let Some(members) = Arc::get_mut(o) {
                pending.extend(members.drain(..).map(|m| m.value).filter(is_container));
            }
        }
        _ => {}
    }
}

// The derived drop glue would recurse once per nesting level. Containers are
// emptied into a work list instead, so each drop below this one sees no
// children. Shared payloads only lose a reference and are left alone.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut value) = pending.pop() {
            detach_children(&mut value, &mut pending);
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::Array(Arc::new(elements))
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// # Panics
    /// If the value is not an object or has no member `key`. Use
    /// [`Value::find_member`] when the key may be absent.
    #[track_caller]
    fn index(&self, key: &str) -> &Value {
        match self.find_member(key) {
            Some(member) => &member.value,
            None => panic!("no member named {key:?}"),
        }
    }
}

impl IndexMut<&str> for Value {
    #[track_caller]
    fn index_mut(&mut self, key: &str) -> &mut Value {
        match self.find_member_mut(key) {
            Some(member) => &mut member.value,
            None => panic!("no member named {key:?}"),
        }
    }
}

impl Index<usize> for Value {
    type Output = Value;

    #[track_caller]
    fn index(&self, i: usize) -> &Value {
        &self.get_array()[i]
    }
}

impl IndexMut<usize> for Value {
    #[track_caller]
    fn index_mut(&mut self, i: usize) -> &mut Value {
        &mut self.get_array_mut()[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::StringWriteStream;
    use crate::writer::Writer;

    fn to_json(value: &Value) -> String {
        let mut writer = Writer::new(StringWriteStream::new());
        assert!(value.write_to(&mut writer));
        writer.into_inner().into_string()
    }

    fn sample() -> Value {
        let mut obj = Value::new(ValueType::Object);
        obj.add_member("n", 1);
        obj.add_member("list", vec![Value::from(true), Value::Null]);
        obj
    }

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
        assert_eq!(Value::default().get_type(), ValueType::Null);
    }

    #[test]
    fn test_new_gives_empty_payloads() {
        assert_eq!(Value::new(ValueType::Bool), Value::Bool(false));
        assert_eq!(Value::new(ValueType::String).get_string(), "");
        assert_eq!(Value::new(ValueType::Array).get_size(), 0);
        assert_eq!(Value::new(ValueType::Object).get_size(), 0);
        assert_eq!(Value::new(ValueType::Double).get_size(), 1);
    }

    #[test]
    fn test_int_widths() {
        let small = Value::from(7);
        assert!(small.is_int32());
        assert!(small.is_int64());
        assert_eq!(small.get_int64(), 7);

        let big = Value::from(1i64 << 40);
        assert!(!big.is_int32());
        assert!(big.is_int64());
        assert_eq!(big.get_int64(), 1 << 40);
    }

    #[test]
    #[should_panic(expected = "expected int32, found String")]
    fn test_wrong_accessor_panics() {
        Value::from("seven").get_int32();
    }

    #[test]
    fn test_setters_retype_in_place() {
        let mut v = Value::from("text");
        v.set_int32(3);
        assert_eq!(v.get_int32(), 3);
        v.set_array().add_value(1.5);
        assert_eq!(v[0].get_double(), 1.5);
        v.set_string("again");
        assert_eq!(v.to_owned_string(), "again");
        assert!(v.set_null().is_null());
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let mut obj = Value::new(ValueType::Object);
        for key in ["z", "a", "m"] {
            obj.add_member(key, key);
        }
        let keys: Vec<&str> = obj.members().iter().map(Member::key).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert!(obj.members()[0].key_value().is_string());
    }

    #[test]
    fn test_find_member_and_index() {
        let mut obj = sample();
        assert_eq!(obj.find_member("n").map(|m| m.value().get_int32()), Some(1));
        assert!(obj.find_member("missing").is_none());

        obj["n"].set_string("x");
        obj["list"].add_value(2);
        assert_eq!(obj["n"].get_string(), "x");
        assert_eq!(obj["list"].get_size(), 3);
        assert_eq!(obj["list"][2].get_int32(), 2);

        if let Some(member) = obj.find_member_mut("n") {
            member.value_mut().set_bool(true);
        }
        assert!(obj["n"].get_bool());
    }

    #[test]
    #[should_panic(expected = "no member named \"missing\"")]
    fn test_index_missing_key_panics() {
        let _ = &sample()["missing"];
    }

    #[test]
    #[should_panic(expected = "duplicate object key")]
    fn test_duplicate_key_panics() {
        let mut obj = sample();
        obj.add_member("n", 2);
    }

    #[test]
    #[should_panic(expected = "object key must be a string")]
    fn test_non_string_key_panics() {
        let mut obj = sample();
        obj.add_member(5, 2);
    }

    #[test]
    fn test_clone_shares_payload() {
        let a = sample();
        assert_eq!(a.ref_count(), Some(1));
        let b = a.clone();
        assert_eq!(a.ref_count(), Some(2));
        drop(b);
        assert_eq!(a.ref_count(), Some(1));
        assert_eq!(Value::from(1).ref_count(), None);
    }

    #[test]
    fn test_clones_released_in_any_order() {
        let original = Value::from("shared");
        let clones: Vec<Value> = (0..16).map(|_| original.clone()).collect();
        assert_eq!(original.ref_count(), Some(17));
        for (i, clone) in clones.into_iter().enumerate().rev() {
            assert_eq!(clone.get_string(), "shared");
            drop(clone);
            assert_eq!(original.ref_count(), Some(i + 1));
        }
    }

    #[test]
    fn test_mutation_unshares() {
        let mut a = sample();
        let b = a.clone();
        a["list"].add_value(3);
        assert_eq!(a["list"].get_size(), 3);
        assert_eq!(b["list"].get_size(), 2);
        assert_eq!(a.ref_count(), Some(1));
        assert_eq!(b.ref_count(), Some(1));
    }

    #[test]
    fn test_deep_tree_drops_without_recursion() {
        let depth = 100_000;
        let mut deep = Value::Null;
        for _ in 0..depth {
            deep = Value::from(vec![deep]);
        }
        let shared = deep.clone();
        drop(deep);

        let mut levels = 0;
        let mut cur = &shared;
        while cur.is_array() {
            assert_eq!(cur.ref_count(), Some(1));
            cur = &cur[0];
            levels += 1;
        }
        assert_eq!(levels, depth);
        drop(shared);
    }

    #[test]
    fn test_write_to_serializes_tree() {
        let mut obj = sample();
        obj.add_member("empty", Value::new(ValueType::Object))
            .add_member("deep", Value::new(ValueType::Array));
        assert_eq!(
            to_json(&obj),
            r#"{"n":1,"list":[true,null],"empty":{"deep":[]}}"#
        );
        assert_eq!(to_json(&Value::from(-0.5)), "-0.5");
    }

    #[test]
    fn test_write_to_stops_when_handler_declines() {
        struct StopAtKey(usize);

        impl Handler for StopAtKey {
            fn null(&mut self) -> bool {
                true
            }
            fn bool(&mut self, _: bool) -> bool {
                true
            }
            fn int32(&mut self, _: i32) -> bool {
                true
            }
            fn int64(&mut self, _: i64) -> bool {
                true
            }
            fn double(&mut self, _: f64) -> bool {
                true
            }
            fn string(&mut self, _: &str) -> bool {
                true
            }
            fn key(&mut self, _: &str) -> bool {
                self.0 += 1;
                self.0 < 2
            }
            fn start_object(&mut self) -> bool {
                true
            }
            fn end_object(&mut self) -> bool {
                panic!("ran past the declined key")
            }
            fn start_array(&mut self) -> bool {
                true
            }
            fn end_array(&mut self) -> bool {
                true
            }
        }

        let mut handler = StopAtKey(0);
        assert!(!sample().write_to(&mut handler));
        assert_eq!(handler.0, 2);
    }
}
