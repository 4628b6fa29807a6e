// SPDX-License-Identifier: Apache-2.0

//! A JSON library with a SAX-style streaming core and a reference-counted DOM.
//!
//! Everything is connected through the [`Handler`] trait:
//!
//! - [`Parser`] reads JSON text from a [`ReadStream`] and reports what it sees
//!   as handler events.
//! - [`Writer`] is a handler that turns events back into compact JSON text on
//!   a [`WriteStream`].
//! - [`Document`] is a handler that builds a [`Value`] tree, and
//!   [`Value::write_to`] replays a tree as events into any handler.
//!
//! The accepted grammar is RFC 8259 plus `NaN`, `Infinity` and `-Infinity`
//! as doubles and `i32` / `i64` suffixes on integers.
//!
//! ```
//! use duojson::{Document, StringWriteStream, Writer};
//!
//! let mut doc = Document::new();
//! doc.parse(r#"{"a":1,"b":[true,null]}"#).unwrap();
//! doc["a"].set_string("x");
//! doc["b"].add_value(2);
//!
//! let mut writer = Writer::new(StringWriteStream::new());
//! doc.write_to(&mut writer);
//! assert_eq!(writer.into_inner().as_str(), r#"{"a":"x","b":[true,null,2]}"#);
//! ```
//!
//! Without the default `std` feature the crate is `no_std` and needs only
//! `alloc`; the file-backed streams are unavailable then.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod document;
mod handler;
mod input;
mod int_parser;
mod number_format;
mod output;
mod parse_error;
mod parser;
mod value;
mod writer;

pub use document::Document;
pub use handler::Handler;
#[cfg(feature = "std")]
pub use input::FileReadStream;
pub use input::{ReadStream, StringReadStream};
#[cfg(feature = "std")]
pub use output::FileWriteStream;
pub use output::{StringWriteStream, WriteStream};
pub use parse_error::{parse_error_string, ErrorKind, ParseError};
pub use parser::{parse, parse_str, Parser};
pub use value::{Member, Value, ValueType};
pub use writer::Writer;
