// SPDX-License-Identifier: Apache-2.0

/// A trait for receiving events from the SAX-style [`Parser`](crate::Parser).
///
/// Every method returns `true` to keep going or `false` to stop; a `false`
/// makes the parse fail with [`ErrorKind::UserStopped`](crate::ErrorKind::UserStopped)
/// and no further events are delivered.
///
/// Events arrive balanced and well nested: each `start_object` is closed by an
/// `end_object` (likewise for arrays), and inside an object `key` and value
/// events alternate. [`Writer`](crate::Writer) and [`Document`](crate::Document)
/// both implement this trait, and [`Value::write_to`](crate::Value::write_to)
/// replays a tree into any implementation.
pub trait Handler {
    fn null(&mut self) -> bool;
    fn bool(&mut self, b: bool) -> bool;
    fn int32(&mut self, i: i32) -> bool;
    fn int64(&mut self, i: i64) -> bool;
    fn double(&mut self, d: f64) -> bool;
    fn string(&mut self, s: &str) -> bool;
    fn key(&mut self, s: &str) -> bool;
    fn start_object(&mut self) -> bool;
    fn end_object(&mut self) -> bool;
    fn start_array(&mut self) -> bool;
    fn end_array(&mut self) -> bool;
}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn null(&mut self) -> bool {
        (**self).null()
    }
    fn bool(&mut self, b: bool) -> bool {
        (**self).bool(b)
    }
    fn int32(&mut self, i: i32) -> bool {
        (**self).int32(i)
    }
    fn int64(&mut self, i: i64) -> bool {
        (**self).int64(i)
    }
    fn double(&mut self, d: f64) -> bool {
        (**self).double(d)
    }
    fn string(&mut self, s: &str) -> bool {
        (**self).string(s)
    }
    fn key(&mut self, s: &str) -> bool {
        (**self).key(s)
    }
    fn start_object(&mut self) -> bool {
        (**self).start_object()
    }
    fn end_object(&mut self) -> bool {
        (**self).end_object()
    }
    fn start_array(&mut self) -> bool {
        (**self).start_array()
    }
    fn end_array(&mut self) -> bool {
        (**self).end_array()
    }
}
