// SPDX-License-Identifier: Apache-2.0

//! Byte sinks for the [`Writer`](crate::Writer).

use alloc::string::String;
use alloc::vec::Vec;

/// Trait for sinks that receive serialized JSON text.
pub trait WriteStream {
    /// Appends a single byte.
    fn put_byte(&mut self, byte: u8);

    /// Appends a run of bytes.
    fn put(&mut self, bytes: &[u8]);
}

impl<W: WriteStream + ?Sized> WriteStream for &mut W {
    fn put_byte(&mut self, byte: u8) {
        (**self).put_byte(byte);
    }

    fn put(&mut self, bytes: &[u8]) {
        (**self).put(bytes);
    }
}

/// An in-memory [`WriteStream`].
#[derive(Debug, Default, Clone)]
pub struct StringWriteStream {
    buffer: Vec<u8>,
}

impl StringWriteStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// The written text.
    ///
    /// # Panics
    /// If the bytes written are not valid UTF-8. Everything the [`Writer`](crate::Writer)
    /// emits is, as long as the strings it was handed were.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.buffer) {
            Ok(s) => s,
            Err(e) => panic!("StringWriteStream holds invalid UTF-8: {e}"),
        }
    }

    pub fn into_string(self) -> String {
        match String::from_utf8(self.buffer) {
            Ok(s) => s,
            Err(e) => panic!("StringWriteStream holds invalid UTF-8: {e}"),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl WriteStream for StringWriteStream {
    fn put_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    fn put(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}

/// A buffered [`WriteStream`] over any [`std::io::Write`].
///
/// Output is flushed when the stream is dropped. I/O errors can't surface
/// through [`WriteStream::put`], so the first one is kept, later writes are
/// skipped, and [`FileWriteStream::finish`] reports it.
#[cfg(feature = "std")]
pub struct FileWriteStream<W: std::io::Write> {
    inner: Option<std::io::BufWriter<W>>,
    error: Option<std::io::Error>,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> FileWriteStream<W> {
    pub fn new(output: W) -> Self {
        Self {
            inner: Some(std::io::BufWriter::new(output)),
            error: None,
        }
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            inner: Some(std::io::BufWriter::with_capacity(capacity, output)),
            error: None,
        }
    }

    fn write_all(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Some(inner) = self.inner.as_mut() {
            if let Err(e) = std::io::Write::write_all(inner, bytes) {
                log::debug!("FileWriteStream write failed: {e}");
                self.error = Some(e);
            }
        }
    }

    /// Flushes and hands back the underlying writer, or the first I/O error
    /// seen since the stream was created.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        match self.inner.take() {
            Some(inner) => inner.into_inner().map_err(|e| e.into_error()),
            None => Err(std::io::Error::other("FileWriteStream already finished")),
        }
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> WriteStream for FileWriteStream<W> {
    fn put_byte(&mut self, byte: u8) {
        self.write_all(&[byte]);
    }

    fn put(&mut self, bytes: &[u8]) {
        self.write_all(bytes);
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Drop for FileWriteStream<W> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            if let Err(e) = std::io::Write::flush(inner) {
                log::debug!("FileWriteStream flush on drop failed: {e}");
            }
        }
    }
}
