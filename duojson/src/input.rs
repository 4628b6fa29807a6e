// SPDX-License-Identifier: Apache-2.0

//! Forward-only byte sources for the [`Parser`](crate::Parser).
//!
//! A [`ReadStream`] hands out bytes one at a time and can give back a slice of
//! bytes it has already consumed. The parser records the position where a
//! number starts, consumes it, and converts straight from that slice.

#[cfg(feature = "std")]
use alloc::vec::Vec;

/// Trait for input sources that can provide data to the parser.
pub trait ReadStream {
    /// Whether at least one more byte is available.
    fn has_next(&self) -> bool;

    /// The next byte without consuming it, or `0` at the end of input.
    fn peek(&self) -> u8;

    /// Consumes and returns the next byte, or `0` at the end of input.
    ///
    /// # Contract
    /// - At the end of input this **MUST** return `0` and leave the position unchanged
    fn next(&mut self) -> u8;

    /// Offset of the next unconsumed byte.
    fn position(&self) -> usize;

    /// Bytes between two previously recorded positions.
    ///
    /// # Panics
    /// If `start..end` does not lie within the consumed part of the input.
    fn slice(&self, start: usize, end: usize) -> &[u8];

    /// Consumes a byte that the caller already knows is `expected`.
    fn assert_next(&mut self, expected: u8) {
        debug_assert_eq!(self.peek(), expected);
        self.next();
    }
}

/// A [`ReadStream`] over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct StringReadStream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StringReadStream<'a> {
    /// Creates a new StringReadStream over the given data.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> From<&'a str> for StringReadStream<'a> {
    fn from(json: &'a str) -> Self {
        Self::new(json.as_bytes())
    }
}

impl ReadStream for StringReadStream<'_> {
    fn has_next(&self) -> bool {
        self.pos < self.data.len()
    }

    fn peek(&self) -> u8 {
        self.data.get(self.pos).copied().unwrap_or(0)
    }

    fn next(&mut self) -> u8 {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                byte
            }
            None => 0,
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.data[start..end]
    }
}

/// A [`ReadStream`] that reads its whole source up front.
///
/// The source is drained in 64 KiB chunks when the stream is constructed;
/// parsing afterwards never touches the source again.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct FileReadStream {
    buffer: Vec<u8>,
    pos: usize,
}

#[cfg(feature = "std")]
impl FileReadStream {
    const CHUNK_SIZE: usize = 64 * 1024;

    /// Drains `input` into memory.
    pub fn new<R: std::io::Read>(mut input: R) -> std::io::Result<Self> {
        let mut buffer = Vec::new();
        let mut chunk = alloc::vec![0u8; Self::CHUNK_SIZE];
        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            buffer.extend_from_slice(&chunk[..n]);
        }
        log::debug!("FileReadStream buffered {} bytes", buffer.len());
        Ok(Self { buffer, pos: 0 })
    }

    /// Opens and drains the file at `path`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        Self::new(std::fs::File::open(path)?)
    }
}

#[cfg(feature = "std")]
impl ReadStream for FileReadStream {
    fn has_next(&self) -> bool {
        self.pos < self.buffer.len()
    }

    fn peek(&self) -> u8 {
        self.buffer.get(self.pos).copied().unwrap_or(0)
    }

    fn next(&mut self) -> u8 {
        match self.buffer.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                byte
            }
            None => 0,
        }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.buffer[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_boundary_behavior() {
        let data = b"abc";
        let mut stream = StringReadStream::new(data);

        assert_eq!(stream.position(), 0);
        assert!(stream.has_next());
        assert_eq!(stream.peek(), b'a');
        assert_eq!(stream.next(), b'a');

        assert_eq!(stream.position(), 1);
        assert_eq!(stream.next(), b'b');
        assert_eq!(stream.next(), b'c');

        // Exactly at end: no more data, position stays put
        assert_eq!(stream.position(), data.len());
        assert!(!stream.has_next());
        assert_eq!(stream.peek(), 0);
        assert_eq!(stream.next(), 0);
        assert_eq!(stream.position(), data.len());
    }

    #[test]
    fn test_slice_over_consumed_bytes() {
        let mut stream = StringReadStream::from("-12.5e3,");
        let start = stream.position();
        while stream.peek() != b',' {
            stream.next();
        }
        assert_eq!(stream.slice(start, stream.position()), b"-12.5e3");
    }

    #[test]
    fn test_assert_next_consumes() {
        let mut stream = StringReadStream::from("[]");
        stream.assert_next(b'[');
        assert_eq!(stream.peek(), b']');
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_stream_reads_everything() {
        // Larger than one chunk so the read loop runs more than once
        let mut data = std::vec::Vec::new();
        data.push(b'"');
        data.resize(FileReadStream::CHUNK_SIZE + 100, b'x');
        data.push(b'"');

        let mut stream = FileReadStream::new(std::io::Cursor::new(data.clone())).unwrap();
        assert_eq!(stream.peek(), b'"');
        let mut count = 0;
        while stream.has_next() {
            stream.next();
            count += 1;
        }
        assert_eq!(count, data.len());
        assert_eq!(stream.slice(0, 3), b"\"xx");
    }
}
