//! Stream abstraction returned by backend opens.
//!
//! Backends differ in what their native streams can do: local files seek,
//! bundle streams are sequential-only. [`Stream`] exposes the common
//! read/write surface plus an explicit seek capability query so the facade
//! can materialize non-seekable streams into memory when a caller needs
//! random access.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// An open stream on a storage backend.
///
/// Streams are single-owner; no internal locking is provided.
///
/// # Object Safety
///
/// This trait is object-safe: backends return `Box<dyn Stream>`.
pub trait Stream: Read + Write + Send {
    /// Whether the underlying stream supports random access.
    ///
    /// When this returns `false`, [`Stream::seek`] fails and the stream must
    /// be materialized into a buffer before it can be repositioned.
    fn supports_seek(&self) -> bool;

    /// Reposition the stream, returning the new offset from the start.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;
}

impl fmt::Debug for dyn Stream + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("supports_seek", &self.supports_seek())
            .finish()
    }
}

impl<T: Stream + ?Sized> Stream for Box<T> {
    fn supports_seek(&self) -> bool {
        self.as_ref().supports_seek()
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.as_mut().seek(pos)
    }
}

/// A seekable stream over a native file.
#[derive(Debug)]
pub struct FileStream {
    file: File,
}

impl FileStream {
    pub fn new(file: File) -> Self {
        FileStream { file }
    }
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Stream for FileStream {
    fn supports_seek(&self) -> bool {
        true
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.file, pos)
    }
}

/// A fully buffered, seekable stream.
///
/// This is the result of materializing a non-seekable stream, and is also
/// useful as a test double.
#[derive(Debug, Default)]
pub struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryStream {
    /// Wrap a buffer, positioned at offset 0.
    pub fn new(content: Vec<u8>) -> Self {
        MemoryStream {
            cursor: Cursor::new(content),
        }
    }

    /// Drain `inner` from its current position into a new buffer positioned
    /// at offset 0. The source stream is consumed and released.
    pub fn materialize(mut inner: Box<dyn Stream>) -> io::Result<Self> {
        let mut content = Vec::new();
        inner.read_to_end(&mut content)?;
        drop(inner);
        Ok(MemoryStream::new(content))
    }

    pub fn content(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.cursor.flush()
    }
}

impl Stream for MemoryStream {
    fn supports_seek(&self) -> bool {
        true
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.cursor, pos)
    }
}
